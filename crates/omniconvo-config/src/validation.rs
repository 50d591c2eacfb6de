// SPDX-FileCopyrightText: 2026 OmniConvo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as URL schemes, bind addresses and safe key prefixes.

use crate::diagnostic::ConfigError;
use crate::model::OmniConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// every collected validation error (does not fail fast).
pub fn validate_config(config: &OmniConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    let base_url = config.base_url.trim();
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        fail(format!(
            "base_url `{base_url}` must start with http:// or https://"
        ));
    }

    let host = config.server.host.trim();
    if host.is_empty() {
        fail("server.host must not be empty".to_string());
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            fail(format!(
                "server.host `{host}` is not a valid IP address or hostname"
            ));
        }
    }

    if config.server.port == 0 {
        fail("server.port must be non-zero".to_string());
    }

    for (key, value) in [
        ("server.name", &config.server.name),
        ("database.path", &config.database.path),
        ("storage.root", &config.storage.root),
        ("storage.key_prefix", &config.storage.key_prefix),
    ] {
        if value.trim().is_empty() {
            fail(format!("{key} must not be empty"));
        }
    }

    let prefix = &config.storage.key_prefix;
    if prefix.contains("..") || prefix.starts_with('/') || prefix.contains('\\') {
        fail(format!(
            "storage.key_prefix `{prefix}` must be a relative path without `..`"
        ));
    }

    if !LOG_LEVELS.contains(&config.logging.level.as_str()) {
        fail(format!(
            "logging.level `{}` must be one of {}",
            config.logging.level,
            LOG_LEVELS.join(", ")
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
