//! Configuration validation.
//!
//! Serde handles syntax; this module checks values. Every problem is
//! reported, not just the first one.

use thiserror::Error;
use url::Url;

use crate::config::schema::SyncConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &SyncConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match Url::parse(&config.api.base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ValidationError::new(
            "api.base_url",
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new(
            "api.base_url",
            format!("invalid URL '{}': {}", config.api.base_url, e),
        )),
    }

    if config.api.timeout_secs == 0 {
        errors.push(ValidationError::new("api.timeout_secs", "must be greater than 0"));
    }
    if config.api.max_attempts == 0 {
        errors.push(ValidationError::new("api.max_attempts", "must be at least 1"));
    }
    if config.api.retry_max_delay_ms < config.api.retry_base_delay_ms {
        errors.push(ValidationError::new(
            "api.retry_max_delay_ms",
            "must not be smaller than retry_base_delay_ms",
        ));
    }
    if !config.api.config_path.starts_with('/') {
        errors.push(ValidationError::new("api.config_path", "must start with '/'"));
    }
    if !config.realtime.socket_path.starts_with('/') {
        errors.push(ValidationError::new("realtime.socket_path", "must start with '/'"));
    }
    if config.realtime.signal_key.trim().is_empty() {
        errors.push(ValidationError::new("realtime.signal_key", "must not be empty"));
    }
    if config.auth.token_key.trim().is_empty() {
        errors.push(ValidationError::new("auth.token_key", "must not be empty"));
    }
    if config.auth.token_key == config.realtime.signal_key {
        errors.push(ValidationError::new(
            "auth.token_key",
            "must differ from realtime.signal_key",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&SyncConfig::default()).is_ok());
    }

    #[test]
    fn test_reports_every_problem() {
        let mut config = SyncConfig::default();
        config.api.base_url = "ftp://example.com".into();
        config.api.max_attempts = 0;
        config.realtime.socket_path = "ws".into();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec!["api.base_url", "api.max_attempts", "realtime.socket_path"]
        );
    }

    #[test]
    fn test_rejects_missing_base_url() {
        let mut config = SyncConfig::default();
        config.api.base_url = String::new();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "api.base_url");
    }
}
