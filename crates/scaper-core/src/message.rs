//! Recorded interaction messages

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One recorded interaction, replayable against a scene.
///
/// The bridge never interprets `kind` or `payload`; only the engine's
/// message handler does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "type")]
    pub kind: String,

    /// Scene element the message applies to, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    #[serde(default)]
    pub payload: Value,
}

impl Message {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            target: None,
            payload: Value::Null,
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }
}
