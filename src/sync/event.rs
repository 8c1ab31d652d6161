//! Change notifications.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

/// Channel a notification arrived through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Same-process bus.
    Local,
    /// Shared store signal written by another view.
    Storage,
    /// Server push over the socket.
    Server,
}

impl Origin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Origin::Local => "local",
            Origin::Storage => "storage",
            Origin::Server => "server",
        }
    }
}

/// "The canonical config changed." Carries no payload; receivers refetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChangeNotification {
    #[serde(rename = "timestamp")]
    pub timestamp_ms: u64,
    #[serde(skip)]
    pub origin: Origin,
}

impl ChangeNotification {
    pub fn new(origin: Origin) -> Self {
        Self {
            timestamp_ms: now_millis(),
            origin,
        }
    }

    pub fn at(timestamp_ms: u64, origin: Origin) -> Self {
        Self {
            timestamp_ms,
            origin,
        }
    }
}

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
