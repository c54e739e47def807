//! Capability surface of the rendering engine
//!
//! The bridge does not render anything itself. It drives an [`Engine`],
//! which builds [`Scene`]s bound to host containers, and talks to each scene
//! only through the methods below.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use scaper_data::TypedColumnSet;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::container::Container;
use crate::encoding::Projection;
use crate::message::Message;

/// Unique identifier for a scene
pub type SceneId = Uuid;

/// Shared, lockable scene as held by a widget and the live registry
pub type SceneHandle = Arc<Mutex<Box<dyn Scene>>>;

/// Identifier the engine assigns to a plot within a scene
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlotId(String);

impl PlotId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Errors reported by engine calls
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Unsupported plot type: {0}")]
    UnsupportedPlotType(String),

    #[error("Message target '{0}' does not exist in this scene")]
    StaleMessageTarget(String),

    #[error("Unknown message type: {0}")]
    UnknownMessage(String),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Engine error: {0}")]
    Other(String),
}

/// A rendering engine able to build scenes
pub trait Engine: Send + Sync {
    /// Engine name, for logs
    fn name(&self) -> &str;

    /// Build a scene over `data` with global `options` applied.
    /// The scene is not attached to `container` yet.
    fn create_scene(
        &self,
        container: &Container,
        data: Arc<TypedColumnSet>,
        options: Option<&Value>,
    ) -> Result<Box<dyn Scene>, EngineError>;
}

/// A live scene owned by one widget instance
pub trait Scene: Send {
    fn id(&self) -> SceneId;

    /// Add a plot layer on top of the existing ones
    fn add_plot(
        &mut self,
        kind: &str,
        projection: Projection,
        options: Option<&Value>,
    ) -> Result<PlotId, EngineError>;

    /// Plot ids in stacking order
    fn plot_ids(&self) -> Vec<PlotId>;

    /// Apply a layout descriptor verbatim
    fn set_layout(&mut self, layout: &Value) -> Result<(), EngineError>;

    /// Apply one recorded interaction
    fn handle_message(&mut self, message: &Message) -> Result<(), EngineError>;

    /// Attach the scene's visual root to a container
    fn attach(&mut self, container: &Container) -> Result<(), EngineError>;

    /// Detach from the container and drop rendering resources
    fn detach(&mut self);

    fn is_attached(&self) -> bool;

    /// React to a container size change
    fn resize(&mut self, _width: f32, _height: f32) {}

    /// Observable state, for tooling and comparisons
    fn snapshot(&self) -> Value;

    /// Get as any for downcasting
    fn as_any(&self) -> &dyn std::any::Any;
}
