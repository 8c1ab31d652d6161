//! In-process shared store.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::storage::{
    validate_key, SignalStore, StorageChange, StorageError, StorageEvents, TaggedChange,
    CHANGE_CHANNEL_CAPACITY,
};

/// A store shared by every handle created from the same root.
///
/// Cloning keeps the handle identity (same view); [`MemoryStore::handle`]
/// creates a new view onto the same data.
#[derive(Clone)]
pub struct MemoryStore {
    id: Uuid,
    shared: Arc<Shared>,
}

struct Shared {
    values: DashMap<String, String>,
    tx: broadcast::Sender<TaggedChange>,
}

impl MemoryStore {
    /// Create an empty store and its first handle.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            id: Uuid::new_v4(),
            shared: Arc::new(Shared {
                values: DashMap::new(),
                tx,
            }),
        }
    }

    /// A new view onto the same data.
    pub fn handle(&self) -> Self {
        Self {
            id: Uuid::new_v4(),
            shared: self.shared.clone(),
        }
    }

    /// Number of live change subscriptions across all handles.
    pub fn watcher_count(&self) -> usize {
        self.shared.tx.receiver_count()
    }

    fn notify(&self, key: &str, new_value: Option<String>) {
        // No receivers is fine: nobody else is watching.
        let _ = self.shared.tx.send(TaggedChange {
            origin: self.id,
            change: StorageChange {
                key: key.to_string(),
                new_value,
            },
        });
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.shared.values.get(key).map(|v| v.value().clone())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        self.shared.values.insert(key.to_string(), value.to_string());
        self.notify(key, Some(value.to_string()));
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        if self.shared.values.remove(key).is_some() {
            self.notify(key, None);
        }
        Ok(())
    }

    fn subscribe(&self) -> StorageEvents {
        StorageEvents::new(self.shared.tx.subscribe(), self.id)
    }
}
