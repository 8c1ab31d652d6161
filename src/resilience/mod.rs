//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! API call:
//!     → timeouts.rs (every attempt has a deadline)
//!     → On failure: retries.rs (check if retryable for this method)
//!     → backoff.rs (exponential delay with jitter before the next attempt)
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - 4xx and 401 are never retried
//! - POST is only retried when the request never left the client

pub mod backoff;
pub mod retries;
pub mod timeouts;
