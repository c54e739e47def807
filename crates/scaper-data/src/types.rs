//! Declared column types

use arrow::datatypes::{DataType, TimeUnit};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic type declared by the host for one column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    /// Continuous numbers, stored as `Float64`
    Numeric,
    /// Factors and character vectors, dictionary encoded
    Categorical,
    /// Calendar dates, stored as days since epoch
    Date,
    /// Date-times, stored as milliseconds since epoch
    DateTime,
    /// Booleans
    Logical,
}

impl TypeTag {
    /// Resolve a tag string as sent by the host, including its aliases.
    /// Returns `None` when there is no coercion rule for the tag.
    pub fn parse(tag: &str) -> Option<Self> {
        let tag = tag.trim().to_ascii_lowercase();
        match tag.as_str() {
            "number" | "numeric" | "continuous" | "double" | "integer" | "int" => {
                Some(TypeTag::Numeric)
            }
            "factor" | "categorical" | "discrete" | "character" | "string" => {
                Some(TypeTag::Categorical)
            }
            "date" => Some(TypeTag::Date),
            "datetime" | "posixct" | "timestamp" => Some(TypeTag::DateTime),
            "logical" | "boolean" | "bool" => Some(TypeTag::Logical),
            _ => None,
        }
    }

    /// Arrow type the column is stored as
    pub fn data_type(&self) -> DataType {
        match self {
            TypeTag::Numeric => DataType::Float64,
            TypeTag::Categorical => {
                DataType::Dictionary(Box::new(DataType::Int32), Box::new(DataType::Utf8))
            }
            TypeTag::Date => DataType::Date32,
            TypeTag::DateTime => DataType::Timestamp(TimeUnit::Millisecond, None),
            TypeTag::Logical => DataType::Boolean,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TypeTag::Numeric => "numeric",
            TypeTag::Categorical => "categorical",
            TypeTag::Date => "date",
            TypeTag::DateTime => "datetime",
            TypeTag::Logical => "logical",
        }
    }
}

impl From<TypeTag> for DataType {
    fn from(tag: TypeTag) -> Self {
        tag.data_type()
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases() {
        assert_eq!(TypeTag::parse("number"), Some(TypeTag::Numeric));
        assert_eq!(TypeTag::parse("Continuous"), Some(TypeTag::Numeric));
        assert_eq!(TypeTag::parse("factor"), Some(TypeTag::Categorical));
        assert_eq!(TypeTag::parse("POSIXct"), Some(TypeTag::DateTime));
        assert_eq!(TypeTag::parse(" date "), Some(TypeTag::Date));
        assert_eq!(TypeTag::parse("logical"), Some(TypeTag::Logical));
        assert_eq!(TypeTag::parse("complex"), None);
    }

    #[test]
    fn test_arrow_types() {
        assert_eq!(DataType::from(TypeTag::Numeric), DataType::Float64);
        assert_eq!(TypeTag::Date.data_type(), DataType::Date32);
        assert!(matches!(TypeTag::Categorical.data_type(), DataType::Dictionary(_, _)));
    }
}
