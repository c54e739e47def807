//! Widget bridge between host specifications and a rendering engine
//!
//! A [`Widget`] is bound to one host container. Each call to
//! [`Widget::render_value`] coerces the specification's columns, builds a
//! scene through the engine, adds its plots, replays its message queue,
//! applies its layout and publishes the result to the live registry.

mod error;
pub mod headless;
pub mod replay;
pub mod spec;
mod widget;

pub use error::BridgeError;
pub use headless::{HeadlessEngine, HeadlessScene};
pub use replay::{replay, MessageFailure, ReplayReport};
pub use spec::{Capabilities, SpecShape, Specification};
pub use widget::{RenderReport, Widget};
