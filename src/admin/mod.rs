//! Admin editing building blocks.
//!
//! # Data Flow
//! ```text
//! form input → validate (sync) → optimistic patch → API mutation
//!     ├─ success → authoritative refetch → publish (SyncClient)
//!     └─ failure → roll back to pre-edit snapshot → PanelError
//! ```

pub mod panel;
pub mod section_config;

use thiserror::Error;

use crate::api::ApiError;
use crate::content::FieldError;
use crate::sync::SyncError;

pub use panel::CrudPanel;
pub use section_config::SectionConfigEditor;

/// Errors surfaced to the admin user.
#[derive(Debug, Error)]
pub enum PanelError {
    #[error("Please fix: {}", join_fields(.0))]
    Invalid(Vec<FieldError>),

    /// The edit targets text the backend does not store.
    #[error("'{0}' is display-only and cannot be saved")]
    DisplayOnly(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Sync(#[from] SyncError),
}

impl PanelError {
    /// True when the caller should route to login.
    pub fn is_auth_expired(&self) -> bool {
        matches!(
            self,
            PanelError::Api(ApiError::AuthExpired) | PanelError::Sync(SyncError::Api(ApiError::AuthExpired))
        )
    }
}

fn join_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
