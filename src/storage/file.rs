//! Directory-backed store shared between processes.
//!
//! One file per key. Writes go through a hidden temp file and a rename so a
//! reader never sees a half-written value. A `notify` watcher turns file
//! changes into [`StorageChange`] events; changes whose content matches this
//! handle's last write are tagged as its own and skipped by its receivers.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::storage::{
    validate_key, SignalStore, StorageChange, StorageError, StorageEvents, TaggedChange,
    CHANGE_CHANNEL_CAPACITY,
};

/// A store living in a directory.
#[derive(Clone)]
pub struct FileStore {
    inner: Arc<FileInner>,
}

struct FileInner {
    id: Uuid,
    dir: PathBuf,
    /// Last value this handle wrote per key (`None` = removed).
    own_writes: Arc<DashMap<String, Option<String>>>,
    tx: broadcast::Sender<TaggedChange>,
    _watcher: RecommendedWatcher,
}

impl FileStore {
    /// Open (creating if needed) the store rooted at `dir` and start watching it.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;

        let id = Uuid::new_v4();
        let (tx, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        let own_writes: Arc<DashMap<String, Option<String>>> = Arc::new(DashMap::new());

        let watcher_tx = tx.clone();
        let watcher_writes = own_writes.clone();
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if !(event.kind.is_create() || event.kind.is_modify() || event.kind.is_remove()) {
                        return;
                    }
                    for path in &event.paths {
                        if let Some(tagged) = change_for_path(path, id, &watcher_writes) {
                            let _ = watcher_tx.send(tagged);
                        }
                    }
                }
                Err(e) => tracing::error!(error = ?e, "Storage watch error"),
            },
            Config::default(),
        )?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        tracing::debug!(dir = ?dir, "File store opened");
        Ok(Self {
            inner: Arc::new(FileInner {
                id,
                dir,
                own_writes,
                tx,
                _watcher: watcher,
            }),
        })
    }

    /// Directory backing this store.
    pub fn dir(&self) -> &Path {
        &self.inner.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.inner.dir.join(key)
    }
}

/// Build the event for a changed file, or `None` for temp/foreign files.
fn change_for_path(
    path: &Path,
    own_id: Uuid,
    own_writes: &DashMap<String, Option<String>>,
) -> Option<TaggedChange> {
    let key = path.file_name()?.to_str()?;
    if validate_key(key).is_err() {
        return None;
    }

    let new_value = fs::read_to_string(path).ok();
    let is_own = own_writes
        .get(key)
        .map(|written| *written == new_value)
        .unwrap_or(false);

    Some(TaggedChange {
        origin: if is_own { own_id } else { Uuid::nil() },
        change: StorageChange {
            key: key.to_string(),
            new_value,
        },
    })
}

impl SignalStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        validate_key(key).ok()?;
        fs::read_to_string(self.path_for(key)).ok()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        self.inner
            .own_writes
            .insert(key.to_string(), Some(value.to_string()));

        let tmp = self.inner.dir.join(format!(".{}.{}.tmp", key, Uuid::new_v4()));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, self.path_for(key))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        self.inner.own_writes.insert(key.to_string(), None);
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn subscribe(&self) -> StorageEvents {
        StorageEvents::new(self.inner.tx.subscribe(), self.inner.id)
    }
}
