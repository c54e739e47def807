//! Plot specifications and their translation into scene plots

pub mod kind;
pub mod spec;
pub mod translate;

// Re-exports
pub use kind::PlotKind;
pub use spec::PlotSpec;
pub use translate::{translate, PlotFailure, TranslateReport};
