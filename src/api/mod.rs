//! Content API access.
//!
//! # Data Flow
//! ```text
//! caller → ApiClient::request_json
//!     → token from Credentials (shared store)
//!     → attempt under deadline (resilience::timeouts)
//!     → status mapping (401 clears token)
//!     → retry decision (resilience::retries) + backoff
//!     → parsed JSON or ApiError
//! ```

pub mod auth;
pub mod client;
pub mod credentials;
pub mod error;
pub mod resources;
pub mod section_config;

pub use client::ApiClient;
pub use credentials::Credentials;
pub use error::{ApiError, ApiResult};
pub use resources::ResourceApi;
pub use section_config::SectionConfigApi;
