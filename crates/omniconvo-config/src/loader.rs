// SPDX-FileCopyrightText: 2026 OmniConvo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./omniconvo.toml` > `~/.config/omniconvo/omniconvo.toml`
//! > `/etc/omniconvo/omniconvo.toml`, with environment variable overrides via the
//! `OMNICONVO_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::OmniConfig;

/// Config sections that own a `[section]` table. Env keys starting with one of
/// these (plus `_`) are routed into that table.
const SECTIONS: &[&str] = &["server", "database", "storage", "logging"];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/omniconvo/omniconvo.toml` (system-wide)
/// 3. `~/.config/omniconvo/omniconvo.toml` (user XDG config)
/// 4. `./omniconvo.toml` (local directory)
/// 5. `OMNICONVO_*` environment variables
pub fn load_config() -> Result<OmniConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<OmniConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(OmniConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<OmniConfig, figment::Error> {
    tracing::debug!(path = %path.display(), "loading configuration file");
    Figment::new()
        .merge(Serialized::defaults(OmniConfig::default()))
        .merge(Toml::file_exact(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for hierarchy loading (exposed for diagnostic use).
pub fn build_figment() -> Figment {
    let mut figment = Figment::new().merge(Serialized::defaults(OmniConfig::default()));
    for path in config_file_paths() {
        figment = figment.merge(Toml::file(path));
    }
    figment.merge(env_provider())
}

/// Config file locations in increasing priority order.
pub fn config_file_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("/etc/omniconvo/omniconvo.toml")];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("omniconvo/omniconvo.toml"));
    }
    paths.push(PathBuf::from("omniconvo.toml"));
    paths
}

/// Create the environment variable provider with explicit section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `OMNICONVO_STORAGE_KEY_PREFIX` must map to `storage.key_prefix`,
/// not `storage.key.prefix`. Keys outside a section (`OMNICONVO_BASE_URL`) stay
/// top-level.
fn env_provider() -> Env {
    Env::prefixed("OMNICONVO_").map(|key| map_env_key(key.as_str()).into())
}

/// Maps a prefix-stripped env key such as `DATABASE_WAL_MODE` to its config
/// path. figment hands the key over in its original case.
fn map_env_key(key: &str) -> String {
    let key = key.to_ascii_lowercase();
    for section in SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_keys_map_to_dotted_paths() {
        assert_eq!(map_env_key("server_port"), "server.port");
        assert_eq!(map_env_key("database_wal_mode"), "database.wal_mode");
        assert_eq!(map_env_key("storage_key_prefix"), "storage.key_prefix");
        assert_eq!(map_env_key("logging_level"), "logging.level");
    }

    #[test]
    fn uppercase_env_keys_are_lowercased() {
        assert_eq!(map_env_key("DATABASE_WAL_MODE"), "database.wal_mode");
        assert_eq!(map_env_key("STORAGE_KEY_PREFIX"), "storage.key_prefix");
        assert_eq!(map_env_key("BASE_URL"), "base_url");
    }

    #[test]
    fn top_level_keys_are_untouched() {
        assert_eq!(map_env_key("base_url"), "base_url");
    }

    #[test]
    fn env_overrides_file_values() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "omniconvo.toml",
                "base_url = \"https://file.example\"\n[server]\nport = 4000\n",
            )?;
            jail.set_env("OMNICONVO_SERVER_PORT", "5000");
            jail.set_env("OMNICONVO_BASE_URL", "https://env.example");

            let config = load_config()?;
            assert_eq!(config.server.port, 5000);
            assert_eq!(config.base_url, "https://env.example");
            Ok(())
        });
    }

    #[test]
    fn env_sets_every_section() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("OMNICONVO_STORAGE_KEY_PREFIX", "chats");
            jail.set_env("OMNICONVO_DATABASE_WAL_MODE", "false");
            jail.set_env("OMNICONVO_SERVER_NAME", "share-bot");
            jail.set_env("OMNICONVO_LOGGING_LEVEL", "debug");

            let config = load_config()?;
            assert_eq!(config.storage.key_prefix, "chats");
            assert!(!config.database.wal_mode);
            assert_eq!(config.server.name, "share-bot");
            assert_eq!(config.logging.level, "debug");
            Ok(())
        });
    }

    #[test]
    fn env_applies_on_top_of_explicit_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("custom.toml", "[storage]\nkey_prefix = \"file\"\n")?;
            jail.set_env("OMNICONVO_STORAGE_KEY_PREFIX", "env");
            let config = load_config_from_path(Path::new("custom.toml"))?;
            assert_eq!(config.storage.key_prefix, "env");
            Ok(())
        });
    }

    #[test]
    fn bad_env_value_is_reported_against_the_environment() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("custom.toml", "[database]\nwal_mode = true\n")?;
            jail.set_env("OMNICONVO_DATABASE_WAL_MODE", "[1, 2]");
            let err = load_config_from_path(Path::new("custom.toml")).unwrap_err();
            let errors = crate::diagnostic::figment_to_config_errors(err, &[]);
            match &errors[0] {
                crate::ConfigError::InvalidType { key, origin, .. } => {
                    assert_eq!(key, "database.wal_mode");
                    assert!(origin.contains("OMNICONVO_"), "origin was {origin}");
                }
                other => panic!("expected InvalidType, got {other:?}"),
            }
            Ok(())
        });
    }

    #[test]
    fn local_file_is_picked_up() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("omniconvo.toml", "[logging]\nlevel = \"debug\"\n")?;
            let config = load_config()?;
            assert_eq!(config.logging.level, "debug");
            Ok(())
        });
    }
}
