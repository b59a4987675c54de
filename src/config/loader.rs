//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::{Environment, LogFormat, ServerConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Value of `PORT` that explicitly disables startup.
pub const PORT_DISABLED: &str = "null";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("PORT '{0}' is not a valid port number")]
    InvalidPort(String),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration: defaults, then the optional TOML file, then the
/// process environment. The result is validated.
pub fn load_config(path: Option<&Path>) -> Result<ServerConfig, ConfigError> {
    load_config_with(path, |key| std::env::var(key).ok())
}

/// [`load_config`] with the environment supplied by `lookup`.
pub fn load_config_with<F>(path: Option<&Path>, lookup: F) -> Result<ServerConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => ServerConfig::default(),
    };

    let config = apply_env(config, lookup)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Overlay environment variables onto `config`.
///
/// `lookup` abstracts over the process environment so callers can supply
/// any source of variables.
pub fn apply_env<F>(mut config: ServerConfig, lookup: F) -> Result<ServerConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup("PORT") {
        config.listener.port = parse_port(&raw)?;
    }
    if let Some(env) = lookup("NODE_ENV") {
        config.environment = Environment::from_name(&env);
    }
    if let Some(level) = lookup("LOG_LEVEL") {
        config.observability.log_level = level.trim().to_ascii_lowercase();
    }
    if let Some(format) = lookup("LOG_FORMAT") {
        config.observability.log_format = match format.trim().to_ascii_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        };
    }
    Ok(config)
}

/// Parse a `PORT` value. Empty and `"null"` mean "no server".
pub fn parse_port(raw: &str) -> Result<Option<u16>, ConfigError> {
    let raw = raw.trim();
    if raw.is_empty() || raw == PORT_DISABLED {
        return Ok(None);
    }
    raw.parse::<u16>()
        .map(Some)
        .map_err(|_| ConfigError::InvalidPort(raw.to_string()))
}
