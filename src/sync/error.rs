//! Sync subsystem errors.

use thiserror::Error;

use crate::api::ApiError;
use crate::storage::StorageError;

/// Errors raised inside the sync subsystem. Only [`SyncError::Api`] and
/// [`SyncError::Storage`] ever reach callers; socket problems are logged.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Socket unavailable: {0}")]
    SocketUnavailable(String),

    #[error("Malformed socket message: {0}")]
    MalformedMessage(String),
}

pub type SyncResult<T> = Result<T, SyncError>;
