//! Server push frames.
//!
//! Frames are JSON objects with a `type` discriminator, plus optional
//! `message` and `timestamp` fields.

use serde_json::Value;

use crate::sync::error::SyncError;

/// A parsed server push.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    /// The canonical config changed; refetch.
    SectionConfigUpdated,
    /// Diagnostic echo from the test trigger.
    Test { message: Option<String> },
    /// Any other `type`; ignored.
    Unknown(String),
}

impl ServerMessage {
    /// Parse one text frame. Fails when the frame is not a JSON object with
    /// a string `type`.
    pub fn parse(text: &str) -> Result<Self, SyncError> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| SyncError::MalformedMessage(format!("not JSON: {}", e)))?;
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| SyncError::MalformedMessage("missing 'type'".to_string()))?;

        Ok(match kind {
            "section_config_updated" => ServerMessage::SectionConfigUpdated,
            "test" => ServerMessage::Test {
                message: value
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            },
            other => ServerMessage::Unknown(other.to_string()),
        })
    }
}
