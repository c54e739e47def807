//! Core abstractions for the widget bridge
//!
//! This crate defines the capability surface the bridge expects from a
//! rendering engine, the encoding resolver that feeds it, and the shared
//! state external tooling uses to reach live scenes.

pub mod container;
pub mod encoding;
pub mod engine;
pub mod events;
pub mod message;
pub mod registry;
pub mod settings;

// Re-export commonly used types
pub use container::{Container, ContainerId};
pub use encoding::{resolve, ChannelValues, Encoding, Projection};
pub use engine::{Engine, EngineError, PlotId, Scene, SceneHandle, SceneId};
pub use events::{handler_from_fn, Event, EventBus, EventHandler};
pub use message::Message;
pub use registry::{LiveRegistry, RegistryError};
pub use settings::{BridgeSettings, SettingsError};
