//! Configuration module
//!
//! Reads a TOML file (default: `~/.config/parking-service/config.toml`,
//! overridable via the `PARKING_CONFIG` env var). Every section falls back
//! to defaults so the service also starts with no config file at all.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub sweeper: SweeperConfig,
    pub storage: StorageConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default tracing filter, overridable via `RUST_LOG`
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Expiry sweeper configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SweeperConfig {
    /// Poll interval in seconds
    pub check_interval_secs: u64,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            check_interval_secs: 60,
        }
    }
}

/// Snapshot persistence configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Snapshot file path; in-memory only when unset
    pub snapshot_path: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(path.into(), e))?;
        toml::from_str(&raw).map_err(|e| ConfigError::Parse(path.into(), e))
    }
}

/// Configuration load errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to parse {0}: {1}")]
    Parse(PathBuf, #[source] toml::de::Error),
}

/// Default config file location under the user config directory.
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("parking-service")
        .join("config.toml")
}

// ── Tests ──────────────────────────────────────────────────────
