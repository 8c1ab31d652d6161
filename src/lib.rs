//! Portfolio content client with real-time section-config sync.
//!
//! # Architecture Overview
//!
//! ```text
//!   admin panels ──mutate──▶ api::ApiClient ──HTTP──▶ content API
//!        │                        ▲
//!        │ publish                │ fetch (full snapshot)
//!        ▼                        │
//!   sync::SyncClient ─────────────┘
//!     ├─ local bus          (same process)
//!     ├─ storage signal     (other views via storage::SignalStore)
//!     └─ socket task        (server push, reconnect state machine)
//!        │
//!        ▼
//!   display sections read headings from the current SectionConfig
//! ```

pub mod admin;
pub mod api;
pub mod config;
pub mod content;
pub mod display;
pub mod observability;
pub mod resilience;
pub mod storage;
pub mod sync;

pub use api::{ApiClient, ApiError};
pub use config::SyncConfig;
pub use content::SectionConfig;
pub use sync::SyncClient;
