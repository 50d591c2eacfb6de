// SPDX-FileCopyrightText: 2026 OmniConvo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for OmniConvo.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level OmniConvo configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// Every section is optional and defaults to values suitable for local development.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OmniConfig {
    /// Public base address used when composing permalinks.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// HTTP listener and server identity settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Record store (SQLite) settings.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Content store settings.
    #[serde(default)]
    pub storage: ContentStorageConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for OmniConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            storage: ContentStorageConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind the HTTP listener to.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Server name reported by `initialize` and the health endpoints.
    #[serde(default = "default_server_name")]
    pub name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            name: default_server_name(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_server_name() -> String {
    "omniconvo-mcp".to_string()
}

/// SQLite record store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    data_dir()
        .join("omniconvo.db")
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Content store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ContentStorageConfig {
    /// Root directory that holds transcript blobs.
    #[serde(default = "default_content_root")]
    pub root: String,

    /// Prefix prepended to every content key.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl Default for ContentStorageConfig {
    fn default() -> Self {
        Self {
            root: default_content_root(),
            key_prefix: default_key_prefix(),
        }
    }
}

fn default_content_root() -> String {
    data_dir().join("content").to_string_lossy().into_owned()
}

fn default_key_prefix() -> String {
    "conversations".to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn data_dir() -> std::path::PathBuf {
    dirs::data_dir()
        .map(|p| p.join("omniconvo"))
        .unwrap_or_else(|| std::path::PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_development() {
        let config = OmniConfig::default();
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.name, "omniconvo-mcp");
        assert!(config.database.wal_mode);
        assert!(config.database.path.ends_with("omniconvo.db"));
        assert_eq!(config.storage.key_prefix, "conversations");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn partial_section_fills_remaining_defaults() {
        let config: OmniConfig = toml::from_str("[server]\nport = 8080\n").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.base_url, "http://localhost:3000");
    }

    #[test]
    fn unknown_server_key_is_rejected() {
        let result: Result<OmniConfig, _> = toml::from_str("[server]\nprot = 8080\n");
        assert!(result.is_err());
    }
}
