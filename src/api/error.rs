//! Resource client error taxonomy.

use thiserror::Error;

/// Errors returned by [`ApiClient`](crate::api::ApiClient) calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// An attempt exceeded its deadline.
    #[error("Request timeout")]
    Timeout,

    /// The server rejected the stored credential (401). The credential has
    /// already been cleared; the caller should route to login.
    #[error("Authentication failed. Please log in again.")]
    AuthExpired,

    /// 4xx other than 401. Never retried.
    #[error("{detail}")]
    Client { status: u16, detail: String },

    /// 5xx. Retried by the client.
    #[error("Server error: {status}")]
    Server { status: u16 },

    /// Transport failure. `connect` is true when the request never left the
    /// client (DNS, refused connection).
    #[error("Network error: {message}")]
    Network { message: String, connect: bool },

    /// The response body was not the expected JSON.
    #[error("Invalid response body: {0}")]
    Decode(String),

    /// The request path could not be joined onto the base URL.
    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),

    /// The credential could not be persisted.
    #[error("Credential storage error: {0}")]
    Storage(String),
}

impl ApiError {
    /// True for 404 client errors.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Client { status: 404, .. })
    }

    /// Short label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Timeout => "timeout",
            ApiError::AuthExpired => "auth_expired",
            ApiError::Client { .. } => "client_error",
            ApiError::Server { .. } => "server_error",
            ApiError::Network { .. } => "network",
            ApiError::Decode(_) => "decode",
            ApiError::InvalidUrl(_) => "invalid_url",
            ApiError::Storage(_) => "storage",
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::Timeout
        } else if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Network {
                message: e.to_string(),
                connect: e.is_connect(),
            }
        }
    }
}

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;
