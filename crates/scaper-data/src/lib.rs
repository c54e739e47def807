//! Column handling for the widget bridge
//!
//! Turns the loosely typed columnar payload sent by the host environment
//! into an Arrow-backed [`TypedColumnSet`], and exposes rows of that set as
//! [`Record`]s with named-field lookup.

pub mod coerce;
pub mod column_set;
pub mod null_handling;
pub mod record;
pub mod types;

use arrow::error::ArrowError;
use thiserror::Error;

// Re-exports
pub use coerce::{coerce, coerce_with_defaults, RawColumns, TypeTags};
pub use column_set::TypedColumnSet;
pub use null_handling::NullConfig;
pub use record::{Datum, Fields, Record};
pub use types::TypeTag;

/// Errors that can occur while building a typed column set
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Unknown type tag '{tag}' for column '{column}'")]
    UnknownTypeTag { column: String, tag: String },

    #[error("Column '{column}' is declared in types but missing from data")]
    MissingColumn { column: String },

    #[error("Column '{column}' has {actual} rows, expected {expected}")]
    ColumnLengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("Arrow error: {0}")]
    Arrow(ArrowError),
}

impl From<ArrowError> for DataError {
    fn from(error: ArrowError) -> Self {
        DataError::Arrow(error)
    }
}
