use super::models::Config;
use config::{ConfigError, Environment, File};
use std::env;
use std::path::PathBuf;

const CONFIG_ENV_VAR: &str = "POINTSBOARD_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/pointsboard.toml";
const ENV_PREFIX: &str = "POINTSBOARD";
const ENV_SEPARATOR: &str = "__";

const TOKEN_ENV_VAR: &str = "POINTSBOARD_COMMAND_TOKEN";
const SLACK_TOKEN_ENV_VAR: &str = "SLACK_VERIFICATION_TOKEN";

/// Load configuration from multiple sources with priority:
/// 1. Defaults (embedded in structs)
/// 2. TOML file (if exists)
/// 3. Environment variables from .env file (via dotenvy)
/// 4. System environment variables (highest priority)
pub fn load() -> Result<Config, ConfigError> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let config_path = env::var(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

    let mut config = load_from_sources(config_path)?;
    load_secrets(&mut config);

    Ok(config)
}

/// Secrets come from the environment only, never from TOML files
fn load_secrets(config: &mut Config) {
    config.commands.token = env::var(TOKEN_ENV_VAR)
        .or_else(|_| env::var(SLACK_TOKEN_ENV_VAR))
        .ok()
        .filter(|token| !token.is_empty());
}

/// Load configuration from a specific path and environment
pub fn load_from_sources(config_path: PathBuf) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();

    if config_path.exists() {
        tracing::info!("Loading configuration from: {}", config_path.display());
        builder = builder.add_source(File::from(config_path).required(false));
    } else {
        tracing::warn!(
            "Configuration file not found at {}, using defaults and environment overrides",
            config_path.display()
        );
    }

    // POINTSBOARD__SERVER__BIND_ADDR -> server.bind_addr
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator(ENV_SEPARATOR)
            .try_parsing(true),
    );

    let config = builder.build()?;
    config.try_deserialize()
}
