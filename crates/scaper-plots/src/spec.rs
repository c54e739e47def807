use scaper_core::Encoding;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Declarative description of one plot layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotSpec {
    /// Plot kind, as named by the engine
    #[serde(rename = "type")]
    pub kind: String,

    /// Visual channel -> field name
    #[serde(default)]
    pub encoding: Encoding,

    /// Engine-specific plot options, forwarded untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
}

impl PlotSpec {
    pub fn new(kind: impl Into<String>, encoding: Encoding) -> Self {
        Self {
            kind: kind.into(),
            encoding,
            options: None,
        }
    }

    pub fn with_options(mut self, options: Value) -> Self {
        self.options = Some(options);
        self
    }
}
