//! The per-view sync client.
//!
//! # Data Flow
//! ```text
//! publish()            ──▶ shared store signal ──▶ other views' storage task ─┐
//!     └──▶ local bus ◀──────────────────────────────────────────────────────────┤
//! socket task (push) ───────────────────────────────────────────────────────────┘
//! local bus listener ──▶ spawn refresh ──▶ fetch ──▶ ArcSwap store ──▶ changes()
//! ```
//!
//! # Design Decisions
//! - Every notification triggers a full-snapshot fetch; overlapping fetches
//!   are not cancelled and the last one to complete wins
//! - A failed fetch keeps the last-known-good config
//! - Background tasks hold weak references, so dropping the last client
//!   handle tears everything down

use std::sync::{Arc, Mutex, MutexGuard, Weak};

use arc_swap::ArcSwap;
use serde_json::Value;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use url::Url;

use crate::api::{ApiClient, Credentials, SectionConfigApi};
use crate::config::{RealtimeConfig, SyncConfig};
use crate::content::{Field, SectionConfig};
use crate::observability::metrics;
use crate::storage::SignalStore;
use crate::sync::bus::{LocalBus, Subscription};
use crate::sync::error::{SyncError, SyncResult};
use crate::sync::event::{ChangeNotification, Origin};
use crate::sync::machine::ReconnectPolicy;
use crate::sync::message::ServerMessage;
use crate::sync::socket::{socket_url, SocketChannel, SocketStatus};

/// Keeps one view's section config in step with the canonical one.
///
/// Cloning yields another handle to the same view.
#[derive(Clone)]
pub struct SyncClient {
    inner: Arc<Inner>,
}

struct Inner {
    api: SectionConfigApi,
    store: Arc<dyn SignalStore>,
    signal_key: String,
    socket: Option<(Url, ReconnectPolicy)>,
    bus: LocalBus,
    current: ArcSwap<SectionConfig>,
    generation: watch::Sender<u64>,
    running: Mutex<Running>,
}

#[derive(Default)]
struct Running {
    open: bool,
    listener: Option<Subscription>,
    storage_task: Option<JoinHandle<()>>,
    socket: Option<SocketChannel>,
}

impl Drop for Running {
    fn drop(&mut self) {
        if let Some(task) = self.storage_task.take() {
            task.abort();
        }
    }
}

impl SyncClient {
    /// Build a client (and its API client) from configuration.
    pub fn new(config: &SyncConfig, store: Arc<dyn SignalStore>) -> SyncResult<Self> {
        let credentials = Credentials::new(store.clone(), config.auth.token_key.clone());
        let api = ApiClient::new(&config.api, credentials)?;
        Self::from_parts(
            SectionConfigApi::new(api, config.api.config_path.clone()),
            store,
            &config.realtime,
        )
    }

    /// Build a client around an existing API client.
    pub fn from_parts(
        api: SectionConfigApi,
        store: Arc<dyn SignalStore>,
        realtime: &RealtimeConfig,
    ) -> SyncResult<Self> {
        let socket = if realtime.enabled {
            let url = socket_url(api.client().base_url(), &realtime.socket_path)?;
            Some((url, ReconnectPolicy::from_config(realtime)))
        } else {
            None
        };
        let (generation, _) = watch::channel(0);

        Ok(Self {
            inner: Arc::new(Inner {
                api,
                store,
                signal_key: realtime.signal_key.clone(),
                socket,
                bus: LocalBus::new(),
                current: ArcSwap::from_pointee(SectionConfig::new()),
                generation,
                running: Mutex::new(Running::default()),
            }),
        })
    }

    /// Start listening on all three channels and load the config once.
    /// Opening an open client does nothing.
    pub async fn open(&self) -> SyncResult<()> {
        {
            let mut running = self.inner.running();
            if running.open {
                return Ok(());
            }
            running.open = true;

            running.listener = Some(self.listen_local());
            running.storage_task = Some(self.watch_storage());
            running.socket = self.connect_socket();
        }

        tracing::info!(signal_key = %self.inner.signal_key, "Sync client opened");
        self.inner.refresh().await;
        Ok(())
    }

    /// Stop every channel. The socket is closed with code 1000 and any
    /// pending reconnect is cancelled.
    pub async fn close(&self) {
        let (listener, storage_task, socket) = {
            let mut running = self.inner.running();
            if !running.open {
                return;
            }
            running.open = false;
            (
                running.listener.take(),
                running.storage_task.take(),
                running.socket.take(),
            )
        };

        drop(listener);
        if let Some(task) = storage_task {
            task.abort();
        }
        if let Some(mut socket) = socket {
            socket.close().await;
        }
        tracing::info!("Sync client closed");
    }

    pub fn is_open(&self) -> bool {
        self.inner.running().open
    }

    /// Fetch the canonical config now. On failure the current config is
    /// kept and the error returned.
    pub async fn refresh(&self) -> SyncResult<Arc<SectionConfig>> {
        self.inner.try_refresh().await?;
        Ok(self.current())
    }

    /// Tell every view that the config changed: writes the shared store
    /// signal (seen by other views) and emits on the local bus (seen by
    /// this view). The bus is notified even when the store write fails.
    pub fn publish(&self) -> SyncResult<ChangeNotification> {
        let event = ChangeNotification::new(Origin::Local);
        let stored = self
            .inner
            .store
            .set(&self.inner.signal_key, &event.timestamp_ms.to_string());
        self.inner.bus.emit(&event);

        stored?;
        Ok(event)
    }

    /// Persist `config`, reload the canonical one, then publish.
    /// Returns the sections saved. Only the API calls can fail the save; a
    /// failed reload or signal write is logged.
    pub async fn save(&self, config: &SectionConfig) -> SyncResult<Vec<String>> {
        let saved = self.inner.api.save(config).await?;
        tracing::info!(sections = ?saved, "Section config saved");

        if let Err(e) = self.inner.try_refresh().await {
            tracing::warn!(error = %e, "Reload after save failed");
        }
        if let Err(e) = self.publish() {
            metrics::record_publish_failure();
            tracing::warn!(error = %e, "Change notification failed");
        }
        Ok(saved)
    }

    /// Register a same-process listener.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&ChangeNotification) + Send + Sync + 'static,
    {
        self.inner.bus.subscribe(listener)
    }

    /// The config this view currently displays.
    pub fn current(&self) -> Arc<SectionConfig> {
        self.inner.current.load_full()
    }

    /// Resolved text for one field of one section.
    pub fn text(&self, section: &str, field: Field) -> String {
        self.inner.current.load().text(section, field).to_string()
    }

    /// Counter bumped after every successful refresh.
    pub fn changes(&self) -> watch::Receiver<u64> {
        self.inner.generation.subscribe()
    }

    /// Socket status, or `None` when real-time updates are off or the client
    /// is not open.
    pub fn socket_status(&self) -> Option<SocketStatus> {
        self.inner.running().socket.as_ref().map(SocketChannel::status)
    }

    pub fn api(&self) -> &SectionConfigApi {
        &self.inner.api
    }

    /// Ask the server to send a `test` push.
    pub async fn trigger_test_push(&self) -> SyncResult<Value> {
        Ok(self.inner.api.trigger_test_push().await?)
    }

    fn listen_local(&self) -> Subscription {
        let weak = Arc::downgrade(&self.inner);
        let runtime = tokio::runtime::Handle::current();
        self.inner.bus.subscribe(move |event| {
            let Some(inner) = weak.upgrade() else { return };
            metrics::record_notification(event.origin.as_str());
            tracing::debug!(origin = event.origin.as_str(), timestamp = event.timestamp_ms, "Config change notified");
            runtime.spawn(async move {
                inner.refresh().await;
            });
        })
    }

    fn watch_storage(&self) -> JoinHandle<()> {
        let mut events = self.inner.store.subscribe();
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let key = self.inner.signal_key.clone();

        tokio::spawn(async move {
            while let Some(change) = events.recv().await {
                if change.key != key {
                    continue;
                }
                // A removed signal carries no change.
                let Some(value) = change.new_value else { continue };
                let Some(inner) = weak.upgrade() else { break };
                let event = match value.parse::<u64>() {
                    Ok(ts) => ChangeNotification::at(ts, Origin::Storage),
                    Err(_) => ChangeNotification::new(Origin::Storage),
                };
                inner.bus.emit(&event);
            }
        })
    }

    fn connect_socket(&self) -> Option<SocketChannel> {
        let (url, policy) = self.inner.socket.clone()?;
        let weak = Arc::downgrade(&self.inner);
        Some(SocketChannel::spawn(url, policy, move |message| {
            if message != ServerMessage::SectionConfigUpdated {
                return;
            }
            if let Some(inner) = weak.upgrade() {
                inner.bus.emit(&ChangeNotification::new(Origin::Server));
            }
        }))
    }
}

impl Inner {
    fn running(&self) -> MutexGuard<'_, Running> {
        // Poisoning only follows a panic in a listener; the state is still
        // consistent.
        self.running.lock().unwrap_or_else(|e| e.into_inner())
    }

    async fn try_refresh(&self) -> SyncResult<()> {
        match self.api.fetch().await {
            Ok(config) => {
                self.current.store(Arc::new(config));
                self.generation.send_modify(|g| *g += 1);
                metrics::record_refresh("success");
                tracing::debug!("Section config refreshed");
                Ok(())
            }
            Err(e) => {
                metrics::record_refresh("failure");
                tracing::warn!(error = %e, "Section config refresh failed, keeping last known config");
                Err(e.into())
            }
        }
    }

    async fn refresh(&self) {
        let _ = self.try_refresh().await;
    }
}

impl std::fmt::Debug for SyncClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncClient")
            .field("signal_key", &self.inner.signal_key)
            .field("open", &self.is_open())
            .field("bus", &self.inner.bus)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn offline_client(store: &MemoryStore) -> SyncClient {
        let mut config = SyncConfig::default();
        config.realtime.enabled = false;
        config.api.base_url = "http://127.0.0.1:9".into();
        config.api.max_attempts = 1;
        SyncClient::new(&config, Arc::new(store.handle())).unwrap()
    }

    async fn settle<F: Fn() -> bool>(condition: F) -> bool {
        for _ in 0..200 {
            if condition() {
                return true;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        condition()
    }

    #[test]
    fn test_starts_from_defaults() {
        let client = offline_client(&MemoryStore::new());
        assert_eq!(client.text("about", Field::Title), "Get to Know Me");
        assert!(client.socket_status().is_none());
    }

    #[test]
    fn test_publish_writes_signal_and_emits_locally() {
        let store = MemoryStore::new();
        let client = offline_client(&store);
        let (tx, rx) = std::sync::mpsc::channel();
        let _sub = client.subscribe(move |event| {
            let _ = tx.send(*event);
        });

        let event = client.publish().unwrap();
        assert_eq!(rx.try_recv().unwrap(), event);
        assert_eq!(event.origin, Origin::Local);
        assert_eq!(
            store.get("sectionConfigUpdate"),
            Some(event.timestamp_ms.to_string())
        );
    }

    #[tokio::test]
    async fn test_removed_signal_is_not_a_change() {
        let store = MemoryStore::new();
        let client = offline_client(&store);
        client.open().await.unwrap();

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let _sub = client.subscribe(move |event| sink.lock().unwrap().push(*event));

        store.set("sectionConfigUpdate", "1700000000000").unwrap();
        store.remove("sectionConfigUpdate").unwrap();
        store.set("sectionConfigUpdate", "1700000000001").unwrap();

        assert!(settle(|| seen.lock().unwrap().len() >= 2).await);
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        let stamps: Vec<u64> = seen.lock().unwrap().iter().map(|e| e.timestamp_ms).collect();
        assert_eq!(stamps, vec![1700000000000, 1700000000001]);
        assert!(seen.lock().unwrap().iter().all(|e| e.origin == Origin::Storage));
        client.close().await;
    }

    #[tokio::test]
    async fn test_dropping_open_client_stops_storage_watch() {
        let store = MemoryStore::new();
        let client = offline_client(&store);
        client.open().await.unwrap();
        assert_eq!(store.watcher_count(), 1);

        drop(client);
        assert!(settle(|| store.watcher_count() == 0).await);
    }

    #[tokio::test]
    async fn test_close_stops_storage_watch() {
        let store = MemoryStore::new();
        let client = offline_client(&store);
        client.open().await.unwrap();

        client.close().await;
        assert!(settle(|| store.watcher_count() == 0).await);
        assert!(!client.is_open());
    }
}
