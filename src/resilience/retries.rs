//! Retry classification.
//!
//! - Idempotent methods (GET, PUT, DELETE) retry on timeouts, transport
//!   failures and 5xx
//! - POST retries only when the connection was never established, so a
//!   retried create cannot produce a duplicate record
//! - 4xx, 401 and decode failures are final

use reqwest::Method;

use crate::api::ApiError;

/// Decide whether a failed attempt may be repeated.
pub fn is_retryable(method: &Method, error: &ApiError) -> bool {
    match error {
        ApiError::Network { connect: true, .. } => true,
        ApiError::Timeout | ApiError::Server { .. } | ApiError::Network { .. } => {
            method.is_idempotent()
        }
        ApiError::AuthExpired
        | ApiError::Client { .. }
        | ApiError::Decode(_)
        | ApiError::InvalidUrl(_)
        | ApiError::Storage(_) => false,
    }
}
