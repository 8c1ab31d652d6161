//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.
//! Every section defaults, so an empty file yields a usable configuration.

use serde::{Deserialize, Serialize};

/// Root configuration for a sync client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SyncConfig {
    /// REST API settings (base URL, timeouts, retries).
    pub api: ApiConfig,

    /// Credential storage settings.
    pub auth: AuthConfig,

    /// Real-time channel settings (socket + cross-view signal).
    pub realtime: RealtimeConfig,

    /// Shared key/value store location.
    pub storage: StorageConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// REST API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the content API (e.g., "http://localhost:8000").
    pub base_url: String,

    /// Deadline for a single request attempt in seconds.
    pub timeout_secs: u64,

    /// Total attempts per request, including the first one.
    pub max_attempts: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub retry_base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub retry_max_delay_ms: u64,

    /// Path of the canonical section configuration.
    pub config_path: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 30,
            max_attempts: 3,
            retry_base_delay_ms: 1000,
            retry_max_delay_ms: 8000,
            config_path: "/api/section-titles".to_string(),
        }
    }
}

/// Credential storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Key under which the bearer token is kept in the shared store.
    pub token_key: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_key: "adminToken".to_string(),
        }
    }
}

/// Real-time synchronization configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RealtimeConfig {
    /// Connect the server-push socket on open.
    pub enabled: bool,

    /// Socket path appended to the ws-scheme base URL.
    pub socket_path: String,

    /// Reconnect delay unit; attempt `n` waits `n * base`.
    pub reconnect_base_delay_ms: u64,

    /// Reconnects scheduled in a row before real-time updates are disabled.
    pub max_reconnect_attempts: u32,

    /// Shared store key carrying the last-change timestamp.
    pub signal_key: String,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            socket_path: "/ws".to_string(),
            reconnect_base_delay_ms: 1000,
            max_reconnect_attempts: 5,
            signal_key: "sectionConfigUpdate".to_string(),
        }
    }
}

/// Shared key/value store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory shared by every process acting as a view.
    pub dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: ".portfolio-sync".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: SyncConfig = toml::from_str("").unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.api.max_attempts, 3);
        assert_eq!(config.realtime.max_reconnect_attempts, 5);
        assert_eq!(config.realtime.signal_key, "sectionConfigUpdate");
        assert_eq!(config.auth.token_key, "adminToken");
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: SyncConfig = toml::from_str(
            r#"
            [realtime]
            max_reconnect_attempts = 2
            "#,
        )
        .unwrap();
        assert_eq!(config.realtime.max_reconnect_attempts, 2);
        assert_eq!(config.realtime.reconnect_base_delay_ms, 1000);
        assert!(config.realtime.enabled);
    }
}
