//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::SyncConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding `api.base_url`.
pub const ENV_API_BASE_URL: &str = "PORTFOLIO_API_BASE_URL";
/// Environment variable overriding `observability.log_level`.
pub const ENV_LOG_LEVEL: &str = "PORTFOLIO_LOG_LEVEL";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

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

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<SyncConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse, apply environment overrides, and validate.
pub fn parse_config(content: &str) -> Result<SyncConfig, ConfigError> {
    let mut config: SyncConfig = toml::from_str(content)?;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Defaults plus environment overrides, validated. Used when no file is given.
pub fn default_config() -> Result<SyncConfig, ConfigError> {
    parse_config("")
}

/// Apply overrides from a variable lookup. Empty values are ignored.
pub fn apply_env_overrides<F>(config: &mut SyncConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(base_url) = lookup(ENV_API_BASE_URL).filter(|v| !v.is_empty()) {
        config.api.base_url = base_url;
    }
    if let Some(level) = lookup(ENV_LOG_LEVEL).filter(|v| !v.is_empty()) {
        config.observability.log_level = level;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_overrides_apply() {
        let mut config = SyncConfig::default();
        apply_env_overrides(&mut config, |key| match key {
            ENV_API_BASE_URL => Some("https://api.example.com".into()),
            ENV_LOG_LEVEL => Some(String::new()),
            _ => None,
        });
        assert_eq!(config.api.base_url, "https://api.example.com");
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_invalid_file_reports_validation() {
        let err = toml::from_str::<SyncConfig>("[api]\nmax_attempts = 0\n")
            .map_err(ConfigError::from)
            .and_then(|c| validate_config(&c).map_err(ConfigError::Validation))
            .unwrap_err();
        assert!(err.to_string().contains("api.max_attempts"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sync.toml");
        std::fs::write(&path, "[realtime]\nenabled = false\n").unwrap();

        let config = load_config(&path).unwrap();
        assert!(!config.realtime.enabled);
    }
}
