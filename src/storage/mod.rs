//! Shared key/value stores.
//!
//! # Data Flow
//! ```text
//! view A: store.set(key, value)
//!     → value persisted (memory map or file)
//!     → StorageChange fanned out with A's handle id
//!     → every other handle's StorageEvents yields it
//!     → A's own StorageEvents skips it
//! ```
//!
//! # Design Decisions
//! - Writers never observe their own changes; callers that need local
//!   delivery use the in-process bus alongside the store
//! - Events are best-effort: a lagging receiver drops old changes, which is
//!   harmless because consumers re-read the canonical state anyway
//! - The same store holds the bearer token (see `api::Credentials`)

pub mod file;
pub mod memory;

use thiserror::Error;
use tokio::sync::broadcast;
use uuid::Uuid;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Capacity of the per-store change channel.
pub(crate) const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// Errors raised by store writes.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid storage key '{0}'")]
    InvalidKey(String),

    #[error("Storage IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage watcher error: {0}")]
    Watch(#[from] notify::Error),
}

/// A change to one key, as seen by other views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageChange {
    pub key: String,
    /// `None` when the key was removed.
    pub new_value: Option<String>,
}

/// A change tagged with the handle that produced it.
#[derive(Debug, Clone)]
pub(crate) struct TaggedChange {
    pub origin: Uuid,
    pub change: StorageChange,
}

/// Key/value store visible to every view of the same origin.
pub trait SignalStore: Send + Sync {
    /// Current value of `key`.
    fn get(&self, key: &str) -> Option<String>;

    /// Write `value` under `key` and notify other views.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key` and notify other views.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Stream of changes made by other views.
    fn subscribe(&self) -> StorageEvents;
}

/// Receiver of changes made by other handles.
pub struct StorageEvents {
    rx: broadcast::Receiver<TaggedChange>,
    own: Uuid,
}

impl StorageEvents {
    pub(crate) fn new(rx: broadcast::Receiver<TaggedChange>, own: Uuid) -> Self {
        Self { rx, own }
    }

    /// Next foreign change, or `None` once the store is gone.
    pub async fn recv(&mut self) -> Option<StorageChange> {
        loop {
            match self.rx.recv().await {
                Ok(tagged) if tagged.origin == self.own => continue,
                Ok(tagged) => return Some(tagged.change),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Storage events lagged");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

/// Keys become file names, so only a conservative character set is allowed.
pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}
