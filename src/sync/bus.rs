//! Same-process notification bus.
//!
//! Listeners are invoked synchronously, in registration order, on the
//! thread that calls [`LocalBus::emit`]. The registry lock is released
//! before any listener runs, so a listener may subscribe, unsubscribe or
//! emit again.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use dashmap::DashMap;

use crate::sync::event::ChangeNotification;

type Listener = Arc<dyn Fn(&ChangeNotification) + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: AtomicU64,
    listeners: DashMap<u64, Listener>,
}

/// Cheaply cloneable handle to one bus.
#[derive(Clone, Default)]
pub struct LocalBus {
    registry: Arc<Registry>,
}

impl LocalBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` until the returned guard is dropped.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&ChangeNotification) + Send + Sync + 'static,
    {
        let id = self.registry.next_id.fetch_add(1, Ordering::Relaxed);
        self.registry.listeners.insert(id, Arc::new(listener));
        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Deliver `event` to every current listener. Returns how many ran.
    pub fn emit(&self, event: &ChangeNotification) -> usize {
        let mut snapshot: Vec<(u64, Listener)> = self
            .registry
            .listeners
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();
        snapshot.sort_by_key(|(id, _)| *id);

        for (_, listener) in &snapshot {
            listener(event);
        }
        snapshot.len()
    }

    pub fn listener_count(&self) -> usize {
        self.registry.listeners.len()
    }
}

impl std::fmt::Debug for LocalBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalBus")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Registration guard; dropping it removes the listener.
#[must_use = "dropping the subscription unregisters the listener"]
pub struct Subscription {
    id: u64,
    registry: Weak<Registry>,
}

impl Subscription {
    /// Remove the listener now.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.listeners.remove(&self.id);
        }
    }
}
