//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize, env overrides)
//!     → validation.rs (semantic checks)
//!     → SyncConfig (validated, immutable)
//!     → handed to ApiClient / SyncClient at construction
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Environment wins over file for the base URL and log level

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{default_config, load_config, ConfigError};
pub use schema::{
    ApiConfig, AuthConfig, ObservabilityConfig, RealtimeConfig, StorageConfig, SyncConfig,
};
pub use validation::ValidationError;
