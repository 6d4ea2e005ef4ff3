use super::models::{CommandsConfig, Config, StorageBackend};
use thiserror::Error;

/// Upper bound for `server.max_body_bytes`
pub const MAX_BODY_LIMIT: usize = 1024 * 1024;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("max_body_bytes must be positive")]
    ZeroBodyLimit,

    #[error("max_body_bytes ({actual}) exceeds limit of 1MB ({limit})")]
    BodyLimitTooLarge { actual: usize, limit: usize },

    #[error("Storage backend is fjall but data_path is empty")]
    EmptyDataPath,

    #[error("telemetry.log_filter must not be empty")]
    EmptyLogFilter,

    #[error("Command token missing (set POINTSBOARD_COMMAND_TOKEN or SLACK_VERIFICATION_TOKEN)")]
    MissingCommandToken,
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_server(config)?;
    validate_storage(config)?;
    validate_telemetry(config)?;
    Ok(())
}

fn validate_server(config: &Config) -> Result<(), ValidationError> {
    let actual = config.server.max_body_bytes;

    if actual == 0 {
        return Err(ValidationError::ZeroBodyLimit);
    }

    if actual > MAX_BODY_LIMIT {
        return Err(ValidationError::BodyLimitTooLarge {
            actual,
            limit: MAX_BODY_LIMIT,
        });
    }

    Ok(())
}

fn validate_storage(config: &Config) -> Result<(), ValidationError> {
    if config.storage.backend == StorageBackend::Fjall
        && config.storage.data_path.as_os_str().is_empty()
    {
        return Err(ValidationError::EmptyDataPath);
    }

    Ok(())
}

fn validate_telemetry(config: &Config) -> Result<(), ValidationError> {
    if config.telemetry.log_filter.trim().is_empty() {
        return Err(ValidationError::EmptyLogFilter);
    }

    Ok(())
}

impl CommandsConfig {
    /// The shared secret, required before serving commands
    pub fn require_token(&self) -> Result<&str, ValidationError> {
        self.token
            .as_deref()
            .ok_or(ValidationError::MissingCommandToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_valid_config() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_zero_body_limit() {
        let mut config = Config::default();
        config.server.max_body_bytes = 0;

        let result = validate(&config);
        assert!(matches!(result, Err(ValidationError::ZeroBodyLimit)));
    }

    #[test]
    fn test_body_limit_too_large() {
        let mut config = Config::default();
        config.server.max_body_bytes = 10 * 1024 * 1024;

        let result = validate(&config);
        assert!(matches!(
            result,
            Err(ValidationError::BodyLimitTooLarge { .. })
        ));
    }

    #[test]
    fn test_empty_data_path() {
        let mut config = Config::default();
        config.storage.data_path = PathBuf::new();
        assert!(matches!(validate(&config), Err(ValidationError::EmptyDataPath)));

        // Irrelevant for the memory backend
        config.storage.backend = StorageBackend::Memory;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_empty_log_filter() {
        let mut config = Config::default();
        config.telemetry.log_filter = "  ".to_string();

        let result = validate(&config);
        assert!(matches!(result, Err(ValidationError::EmptyLogFilter)));
    }

    #[test]
    fn test_require_token() {
        let mut commands = CommandsConfig::default();
        assert!(matches!(
            commands.require_token(),
            Err(ValidationError::MissingCommandToken)
        ));

        commands.token = Some("abc".to_string());
        assert_eq!(commands.require_token().unwrap(), "abc");
    }
}
