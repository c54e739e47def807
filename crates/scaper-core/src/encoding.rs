//! Encoding resolution
//!
//! An [`Encoding`] maps visual channels (`x`, `y`, `value`, ...) to field
//! names. Resolving it yields a [`Projection`], which turns any record with
//! named fields into the channel values a plot consumes.

use std::sync::Arc;

use indexmap::IndexMap;
use scaper_data::{Datum, Fields};
use serde::{Deserialize, Serialize};

/// Channel values produced for one record, in encoding order.
/// `None` marks a channel whose field was absent or missing.
pub type ChannelValues = IndexMap<String, Option<Datum>>;

/// Mapping from visual channel to data field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Encoding(IndexMap<String, String>);

impl Encoding {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style channel assignment
    pub fn with(mut self, channel: impl Into<String>, field: impl Into<String>) -> Self {
        self.0.insert(channel.into(), field.into());
        self
    }

    /// Field mapped to `channel`
    pub fn field(&self, channel: &str) -> Option<&str> {
        self.0.get(channel).map(String::as_str)
    }

    pub fn channels(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.0.iter().map(|(c, f)| (c.as_str(), f.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<C: Into<String>, F: Into<String>> FromIterator<(C, F)> for Encoding {
    fn from_iter<I: IntoIterator<Item = (C, F)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(c, f)| (c.into(), f.into())).collect())
    }
}

/// Per-record projection derived from an encoding.
///
/// Holds nothing but the encoding, so it can be cloned freely and applied
/// from any thread.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    encoding: Arc<Encoding>,
}

impl Projection {
    /// Project one record onto the encoded channels
    pub fn apply<R: Fields + ?Sized>(&self, record: &R) -> ChannelValues {
        self.encoding
            .iter()
            .map(|(channel, field)| (channel.to_string(), record.field(field)))
            .collect()
    }

    pub fn encoding(&self) -> &Encoding {
        &self.encoding
    }
}

/// Resolve an encoding into its projection
pub fn resolve(encoding: &Encoding) -> Projection {
    Projection {
        encoding: Arc::new(encoding.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn record(pairs: &[(&str, Datum)]) -> HashMap<String, Datum> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_projection_uses_encoding_keys() {
        let encoding = Encoding::new().with("x", "wt").with("y", "mpg");
        let projection = resolve(&encoding);

        let values = projection.apply(&record(&[
            ("wt", Datum::Number(2.5)),
            ("mpg", Datum::Number(21.0)),
            ("cyl", Datum::Number(6.0)),
        ]));

        let channels: Vec<&str> = values.keys().map(String::as_str).collect();
        assert_eq!(channels, vec!["x", "y"]);
        assert_eq!(values["x"], Some(Datum::Number(2.5)));
        assert_eq!(values["y"], Some(Datum::Number(21.0)));
    }

    #[test]
    fn test_missing_field_yields_none() {
        let projection = resolve(&Encoding::new().with("x", "a").with("color", "group"));
        let values = projection.apply(&record(&[("a", Datum::Number(1.0))]));

        assert_eq!(values["x"], Some(Datum::Number(1.0)));
        assert_eq!(values["color"], None);
    }

    #[test]
    fn test_projection_is_pure() {
        let encoding: Encoding = [("value", "x")].into_iter().collect();
        let projection = resolve(&encoding);
        let input = record(&[("x", Datum::Category("a".into()))]);

        assert_eq!(projection.apply(&input), projection.apply(&input));
        assert_eq!(resolve(&encoding), projection);
    }

    #[test]
    fn test_encoding_deserializes_in_order() {
        let encoding: Encoding = serde_json::from_str(r#"{"y": "b", "x": "a"}"#).unwrap();
        let channels: Vec<&str> = encoding.channels().collect();
        assert_eq!(channels, vec!["y", "x"]);
        assert_eq!(encoding.field("x"), Some("a"));
    }
}
