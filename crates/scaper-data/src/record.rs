//! Row access with named-field lookup

use chrono::{NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashMap;
use std::hash::BuildHasher;

use crate::column_set::TypedColumnSet;

/// One non-missing cell value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Datum {
    Number(f64),
    Category(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Boolean(bool),
}

impl Datum {
    /// Numeric view of the value, if it has one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Datum::Number(v) => Some(*v),
            Datum::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Datum::Category(s) => Some(s),
            _ => None,
        }
    }
}

impl From<f64> for Datum {
    fn from(value: f64) -> Self {
        Datum::Number(value)
    }
}

impl From<&str> for Datum {
    fn from(value: &str) -> Self {
        Datum::Category(value.to_string())
    }
}

impl From<bool> for Datum {
    fn from(value: bool) -> Self {
        Datum::Boolean(value)
    }
}

/// Anything that can look up a value by field name.
///
/// `None` means the field is absent or its value is missing; callers treat
/// both the same way.
pub trait Fields {
    fn field(&self, name: &str) -> Option<Datum>;
}

impl<S: BuildHasher> Fields for HashMap<String, Datum, S> {
    fn field(&self, name: &str) -> Option<Datum> {
        self.get(name).cloned()
    }
}

impl Fields for IndexMap<String, Datum> {
    fn field(&self, name: &str) -> Option<Datum> {
        self.get(name).cloned()
    }
}

/// A borrowed view of one row of a [`TypedColumnSet`]
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    columns: &'a TypedColumnSet,
    row: usize,
}

impl<'a> Record<'a> {
    pub(crate) fn new(columns: &'a TypedColumnSet, row: usize) -> Self {
        Self { columns, row }
    }

    /// Row index within the column set
    pub fn row(&self) -> usize {
        self.row
    }

    /// Copy the row into an owned map, skipping missing values
    pub fn to_map(&self) -> IndexMap<String, Datum> {
        self.columns
            .column_names()
            .filter_map(|name| self.field(name).map(|value| (name.to_string(), value)))
            .collect()
    }
}

impl Fields for Record<'_> {
    fn field(&self, name: &str) -> Option<Datum> {
        self.columns.value(name, self.row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_fields() {
        let mut record: HashMap<String, Datum> = HashMap::new();
        record.insert("x".to_string(), Datum::Number(2.0));

        assert_eq!(record.field("x"), Some(Datum::Number(2.0)));
        assert_eq!(record.field("y"), None);
    }

    #[test]
    fn test_numeric_view() {
        assert_eq!(Datum::from(true).as_f64(), Some(1.0));
        assert_eq!(Datum::from("a").as_f64(), None);
        assert_eq!(Datum::from("a").as_str(), Some("a"));
    }
}
