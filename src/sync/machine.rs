//! Socket connection lifecycle.
//!
//! ```text
//! Disconnected ──connect──▶ Connecting ──opened──▶ Connected
//!      ▲                        │                      │
//!      └────────── closed ──────┴──────────────────────┘
//! ```
//!
//! A non-clean close schedules a reconnect after `base * attempt`. At most
//! `max_attempts` reconnects are scheduled in a row; a successful handshake
//! resets the count. Running out disables real-time updates for good, as
//! does an intentional or clean close.

use std::time::Duration;

use serde::Serialize;

use crate::config::RealtimeConfig;
use crate::resilience::backoff::linear_delay;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// Why the connection ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseKind {
    /// The client closed it.
    Intentional,
    /// The server sent a normal (1000) close frame.
    Clean,
    /// Anything else: error, abnormal close code, failed handshake.
    Abnormal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub base_delay_ms: u64,
    pub max_attempts: u32,
}

impl ReconnectPolicy {
    pub fn from_config(config: &RealtimeConfig) -> Self {
        Self {
            base_delay_ms: config.reconnect_base_delay_ms,
            max_attempts: config.max_reconnect_attempts,
        }
    }
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self::from_config(&RealtimeConfig::default())
    }
}

#[derive(Debug, Clone)]
pub struct ConnectionMachine {
    policy: ReconnectPolicy,
    state: ConnectionState,
    attempts: u32,
    stopped: bool,
    disabled: bool,
}

impl ConnectionMachine {
    pub fn new(policy: ReconnectPolicy) -> Self {
        Self {
            policy,
            state: ConnectionState::Disconnected,
            attempts: 0,
            stopped: false,
            disabled: false,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Reconnects scheduled since the last successful handshake.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// True once the reconnect budget ran out.
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// True when no further connection will be attempted.
    pub fn is_finished(&self) -> bool {
        self.stopped || self.disabled
    }

    /// Begin a connection attempt. Returns `false` when finished.
    pub fn connect(&mut self) -> bool {
        if self.is_finished() {
            return false;
        }
        self.state = ConnectionState::Connecting;
        true
    }

    /// Handshake succeeded.
    pub fn opened(&mut self) {
        self.state = ConnectionState::Connected;
        self.attempts = 0;
    }

    /// The connection (or attempt) ended. Returns the delay before the next
    /// attempt, or `None` when no reconnect will happen.
    pub fn closed(&mut self, kind: CloseKind) -> Option<Duration> {
        self.state = ConnectionState::Disconnected;
        match kind {
            CloseKind::Intentional | CloseKind::Clean => {
                self.stopped = true;
                None
            }
            CloseKind::Abnormal if self.stopped => None,
            CloseKind::Abnormal if self.attempts < self.policy.max_attempts => {
                self.attempts += 1;
                Some(linear_delay(self.attempts, self.policy.base_delay_ms))
            }
            CloseKind::Abnormal => {
                self.disabled = true;
                None
            }
        }
    }

    /// Client-side close; cancels any pending reconnect.
    pub fn stop(&mut self) {
        self.stopped = true;
        self.state = ConnectionState::Disconnected;
    }
}
