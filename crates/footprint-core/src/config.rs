//! Configuration management for Footprint.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Main application configuration.
///
/// This is loaded from `~/.config/footprint/config.toml` (or platform
/// equivalent). If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Scanning behavior settings
    pub scanning: ScanningConfig,
    /// Database settings
    pub database: DatabaseConfig,
    /// Search provider settings
    pub search: SearchConfig,
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            tracing::debug!("Loading config from {}", config_path.display());
            let contents = fs::read_to_string(&config_path)?;
            let config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `FOOTPRINT_BATCH_SIZE`: Override probe batch size
    /// - `FOOTPRINT_HTTP_TIMEOUT_SECS`: Override HTTP probe timeout
    /// - `FOOTPRINT_SEARCH_ENDPOINT`: Override search API endpoint
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;

        // Override from environment
        if let Ok(val) = std::env::var("FOOTPRINT_BATCH_SIZE") {
            if let Ok(size) = val.parse() {
                config.scanning.batch_size = size;
                tracing::debug!("Override scanning.batch_size from env: {}", size);
            }
        }

        if let Ok(val) = std::env::var("FOOTPRINT_HTTP_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse() {
                config.scanning.http_timeout_secs = secs;
                tracing::debug!("Override scanning.http_timeout_secs from env: {}", secs);
            }
        }

        if let Ok(val) = std::env::var("FOOTPRINT_SEARCH_ENDPOINT") {
            config.search.endpoint = val.clone();
            tracing::debug!("Override search.endpoint from env: {}", val);
        }

        Ok(config)
    }

    /// Save configuration to disk.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> ConfigResult<()> {
        let config_path = Self::config_path()?;
        let config_dir = config_path
            .parent()
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "config_path".to_string(),
                reason: "no parent directory".to_string(),
            })?;

        fs::create_dir_all(config_dir)?;
        tracing::debug!("Saving config to {}", config_path.display());

        let contents = toml::to_string_pretty(self)?;
        fs::write(config_path, contents)?;
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/footprint/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("com", "footprint", "footprint").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Get the data directory path.
    ///
    /// Uses XDG base directories: `~/.local/share/footprint`
    pub fn data_dir() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("com", "footprint", "footprint").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.data_dir().to_path_buf())
    }
}

/// Scanning behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanningConfig {
    /// Number of surfaces probed concurrently per batch
    pub batch_size: usize,
    /// Pause between batches in milliseconds (third-party rate-limit courtesy)
    pub batch_pause_ms: u64,
    /// HTTP probe timeout in seconds
    pub http_timeout_secs: u64,
    /// DNS probe timeout in seconds
    pub dns_timeout_secs: u64,
    /// Search probe timeout in seconds
    pub search_timeout_secs: u64,
    /// Maximum redirects followed by the HTTP probe
    pub max_redirects: usize,
    /// Maximum queries issued per surface
    pub max_queries_per_surface: usize,
    /// Size cap for the raw byte sample kept for auditing
    pub byte_sample_limit: usize,
    /// User agent string
    pub user_agent: String,
}

impl Default for ScanningConfig {
    fn default() -> Self {
        Self {
            batch_size: 3,
            batch_pause_ms: 1500,
            http_timeout_secs: 12,
            dns_timeout_secs: 5,
            search_timeout_secs: 10,
            max_redirects: 5,
            max_queries_per_surface: 3,
            byte_sample_limit: 2048,
            user_agent: "FootprintAudit/0.1 (+https://github.com/footprint-audit/footprint)"
                .to_string(),
        }
    }
}

/// Database settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "footprint.db".to_string(),
        }
    }
}

/// Search provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Organic search API endpoint
    pub endpoint: String,
    /// Results requested per query
    pub results_per_query: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://google.serper.dev/search".to_string(),
            results_per_query: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.scanning.batch_size, 3);
        assert_eq!(config.scanning.http_timeout_secs, 12);
        assert_eq!(config.scanning.dns_timeout_secs, 5);
        assert_eq!(config.scanning.max_queries_per_surface, 3);
        assert_eq!(config.search.results_per_query, 10);
        assert!(config.search.endpoint.starts_with("https://"));
    }

    #[test]
    fn test_config_toml_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize config");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("parse config");
        assert_eq!(parsed.scanning.batch_size, config.scanning.batch_size);
        assert_eq!(parsed.search.endpoint, config.search.endpoint);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let toml_str = r"
            [scanning]
            batch_size = 5
        ";
        let config: AppConfig = toml::from_str(toml_str).expect("parse partial config");
        assert_eq!(config.scanning.batch_size, 5);
        // Unspecified fields fall back to defaults
        assert_eq!(config.scanning.http_timeout_secs, 12);
        assert_eq!(config.database.path, "footprint.db");
    }

    #[test]
    fn test_env_override() {
        std::env::set_var("FOOTPRINT_BATCH_SIZE", "7");
        let config = AppConfig::load_with_env().expect("load config with env");
        assert_eq!(config.scanning.batch_size, 7);
        std::env::remove_var("FOOTPRINT_BATCH_SIZE");
    }
}
