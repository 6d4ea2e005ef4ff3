//! Configuration management for pointsboard
//!
//! This module provides a layered configuration system that loads settings from:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use pointsboard::config::Config;
//!
//! let config = Config::load().expect("Failed to load configuration");
//! println!("Server listening on: {}", config.server.bind_addr);
//! ```
//!
//! # Environment Variables
//!
//! Configuration can be overridden using environment variables with the pattern:
//! `POINTSBOARD__<section>__<key>`
//!
//! Examples:
//! - `POINTSBOARD__SERVER__BIND_ADDR=0.0.0.0:9000`
//! - `POINTSBOARD__STORAGE__BACKEND=memory`
//! - `POINTSBOARD__STORAGE__DATA_PATH=/var/lib/pointsboard`
//!
//! The slash-command token is a secret and is only read from
//! `POINTSBOARD_COMMAND_TOKEN` (or `SLACK_VERIFICATION_TOKEN`).
//!
//! # Configuration File
//!
//! By default, the configuration is loaded from `config/pointsboard.toml`.
//! This can be overridden using the `POINTSBOARD_CONFIG` environment variable.

mod models;
mod sources;
mod validation;

pub use models::{
    CommandsConfig, Config, ServerConfig, StorageBackend, StorageConfig, TelemetryConfig,
};
pub use validation::{MAX_BODY_LIMIT, ValidationError};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl Config {
    /// Load configuration from all sources (file + environment)
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file is malformed or validation
    /// fails. A missing command token is not an error here; the server checks
    /// it with [`CommandsConfig::require_token`] before it starts.
    pub fn load() -> Result<Self, ConfigError> {
        let config = sources::load()?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific path
    ///
    /// Useful for testing with custom configuration files. Secrets are not
    /// read from the environment.
    pub fn load_from_path(path: std::path::PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_from_sources(path)?;
        validation::validate(&config)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_minimal_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        fs::write(&config_path, "[storage]\nbackend = \"memory\"\n").unwrap();

        let config = Config::load_from_path(config_path).unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Memory);
    }

    #[test]
    fn test_validation_runs_on_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        fs::write(&config_path, "[server]\nmax_body_bytes = 0\n").unwrap();

        let result = Config::load_from_path(config_path);
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::ValidationError(ValidationError::ZeroBodyLimit)
        ));
    }

    #[test]
    fn test_malformed_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        fs::write(&config_path, "[storage]\nbackend = \"cassandra\"\n").unwrap();

        let result = Config::load_from_path(config_path);
        assert!(matches!(result.unwrap_err(), ConfigError::LoadError(_)));
    }
}
