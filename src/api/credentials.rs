//! Bearer token persisted in the shared store.

use std::sync::Arc;

use crate::storage::{SignalStore, StorageError};

/// Handle to the admin token stored under a fixed key.
#[derive(Clone)]
pub struct Credentials {
    store: Arc<dyn SignalStore>,
    key: String,
}

impl Credentials {
    pub fn new(store: Arc<dyn SignalStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Current token, if a non-empty one is stored.
    pub fn token(&self) -> Option<String> {
        self.store.get(&self.key).filter(|t| !t.is_empty())
    }

    pub fn set(&self, token: &str) -> Result<(), StorageError> {
        self.store.set(&self.key, token)
    }

    /// Forget the token. Failures are logged; a stale token is rejected by
    /// the server anyway.
    pub fn clear(&self) {
        if let Err(e) = self.store.remove(&self.key) {
            tracing::warn!(error = %e, "Failed to clear stored credential");
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &self.key)
            .field("present", &self.token().is_some())
            .finish()
    }
}
