//! The specification payload sent by the host on every render
//!
//! The payload grew field by field across bridge versions: a bare
//! `message`, then `plots`, then `layout`, then `options`, and finally a
//! replayable `queue`. Every field is optional here and the shape is
//! derived from what is present.

use scaper_core::Message;
use scaper_data::{RawColumns, TypeTags};
use scaper_plots::PlotSpec;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One render's worth of input from the host
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Specification {
    /// Raw columns: name -> values
    pub data: RawColumns,

    /// Declared column types: name -> type tag
    pub types: TypeTags,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub plots: Option<Vec<PlotSpec>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue: Option<Vec<Message>>,

    /// Layout descriptor, forwarded verbatim
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<Value>,

    /// Global scene options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,

    /// Free text carried by the earliest payloads
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Which optional parts a specification carries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    pub plots: bool,
    pub queue: bool,
    pub layout: bool,
    pub options: bool,
    pub message: bool,
}

/// Recognised payload shapes, oldest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpecShape {
    /// Nothing to build
    Empty,
    /// Only a `message`
    Legacy,
    Plots,
    PlotsLayout,
    PlotsLayoutOptions,
    /// Scene rebuilt from a message queue
    Queue,
    /// Both plots and a queue; plots are added first
    PlotsAndQueue,
}

impl Specification {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            plots: self.plots.is_some(),
            queue: self.queue.is_some(),
            layout: self.layout.is_some(),
            options: self.options.is_some(),
            message: self.message.is_some(),
        }
    }

    pub fn shape(&self) -> SpecShape {
        let caps = self.capabilities();
        match (caps.plots, caps.queue) {
            (true, true) => SpecShape::PlotsAndQueue,
            (false, true) => SpecShape::Queue,
            (true, false) => match (caps.layout, caps.options) {
                (true, true) => SpecShape::PlotsLayoutOptions,
                (true, false) => SpecShape::PlotsLayout,
                _ => SpecShape::Plots,
            },
            (false, false) if caps.message => SpecShape::Legacy,
            (false, false) => SpecShape::Empty,
        }
    }

    pub fn plots(&self) -> &[PlotSpec] {
        self.plots.as_deref().unwrap_or_default()
    }

    pub fn queue(&self) -> &[Message] {
        self.queue.as_deref().unwrap_or_default()
    }
}
