//! Column type coercion
//!
//! The host sends every column as a plain JSON array and declares the
//! intended type of each column separately. Coercion applies the rule for
//! each declared type to every element and assembles the result into a
//! row-aligned [`TypedColumnSet`].

use std::sync::Arc;

use arrow::array::{
    ArrayRef, BooleanBuilder, Date32Builder, Float64Builder, StringDictionaryBuilder,
    TimestampMillisecondBuilder,
};
use arrow::datatypes::{Field, Int32Type, Schema};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use serde_json::Value;

use crate::column_set::{days_since_epoch, TypedColumnSet, EPOCH_DAYS_FROM_CE};
use crate::null_handling::NullConfig;
use crate::types::TypeTag;
use crate::DataError;

/// Raw columns as received: name -> values
pub type RawColumns = IndexMap<String, Vec<Value>>;

/// Declared types as received: name -> type tag
pub type TypeTags = IndexMap<String, String>;

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Coerce raw columns to the types declared in `types`.
///
/// Only the columns named in `types` are kept, in the order `types` lists
/// them. Values that cannot be coerced become nulls.
pub fn coerce(
    raw: &RawColumns,
    types: &TypeTags,
    nulls: &NullConfig,
) -> Result<TypedColumnSet, DataError> {
    let mut resolved = Vec::with_capacity(types.len());
    let mut row_count = None;

    for (name, tag) in types {
        let tag = TypeTag::parse(tag).ok_or_else(|| DataError::UnknownTypeTag {
            column: name.clone(),
            tag: tag.clone(),
        })?;
        let values = raw.get(name).ok_or_else(|| DataError::MissingColumn {
            column: name.clone(),
        })?;

        match row_count {
            None => row_count = Some(values.len()),
            Some(expected) if expected != values.len() => {
                return Err(DataError::ColumnLengthMismatch {
                    column: name.clone(),
                    expected,
                    actual: values.len(),
                });
            }
            Some(_) => {}
        }

        resolved.push((name.as_str(), tag, values.as_slice()));
    }

    for name in raw.keys().filter(|name| !types.contains_key(*name)) {
        tracing::debug!("Dropping column '{}' with no declared type", name);
    }

    let mut fields = Vec::with_capacity(resolved.len());
    let mut columns = Vec::with_capacity(resolved.len());
    let mut tags = Vec::with_capacity(resolved.len());

    for (name, tag, values) in resolved {
        let (array, rejected) = coerce_column(tag, values, nulls)?;
        if rejected > 0 {
            tracing::warn!(
                "Column '{}': {} of {} values could not be read as {} and were set to null",
                name,
                rejected,
                values.len(),
                tag
            );
        }
        fields.push(Field::new(name, tag.data_type(), true));
        columns.push(array);
        tags.push(tag);
    }

    let row_count = row_count.unwrap_or(0);
    tracing::debug!("Coerced {} columns with {} rows", columns.len(), row_count);

    TypedColumnSet::try_new(Schema::new(fields), columns, tags, row_count)
}

/// [`coerce`] with the default null patterns
pub fn coerce_with_defaults(raw: &RawColumns, types: &TypeTags) -> Result<TypedColumnSet, DataError> {
    coerce(raw, types, &NullConfig::default())
}

/// Coerce one column. Returns the array and how many non-null inputs had
/// to be discarded.
fn coerce_column(
    tag: TypeTag,
    values: &[Value],
    nulls: &NullConfig,
) -> Result<(ArrayRef, usize), DataError> {
    let mut rejected = 0;

    // Counts a value that was present but unreadable
    let mut check = |value: &Value, parsed: bool| {
        if !parsed && !is_missing(value, nulls) {
            rejected += 1;
        }
    };

    let array: ArrayRef = match tag {
        TypeTag::Numeric => {
            let mut builder = Float64Builder::with_capacity(values.len());
            for value in values {
                let parsed = to_number(value, nulls);
                check(value, parsed.is_some());
                builder.append_option(parsed);
            }
            Arc::new(builder.finish())
        }
        TypeTag::Categorical => {
            let mut builder = StringDictionaryBuilder::<Int32Type>::new();
            for value in values {
                match to_category(value, nulls) {
                    Some(category) => {
                        builder.append(category)?;
                    }
                    None => {
                        check(value, false);
                        builder.append_null();
                    }
                }
            }
            Arc::new(builder.finish())
        }
        TypeTag::Date => {
            let mut builder = Date32Builder::with_capacity(values.len());
            for value in values {
                let parsed = to_date(value, nulls);
                check(value, parsed.is_some());
                builder.append_option(parsed);
            }
            Arc::new(builder.finish())
        }
        TypeTag::DateTime => {
            let mut builder = TimestampMillisecondBuilder::with_capacity(values.len());
            for value in values {
                let parsed = to_millis(value, nulls);
                check(value, parsed.is_some());
                builder.append_option(parsed);
            }
            Arc::new(builder.finish())
        }
        TypeTag::Logical => {
            let mut builder = BooleanBuilder::with_capacity(values.len());
            for value in values {
                let parsed = to_bool(value, nulls);
                check(value, parsed.is_some());
                builder.append_option(parsed);
            }
            Arc::new(builder.finish())
        }
    };

    Ok((array, rejected))
}

fn is_missing(value: &Value, nulls: &NullConfig) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => nulls.is_null(s),
        _ => false,
    }
}

/// The string content of a value, unless it matches a null pattern
fn present_str<'a>(value: &'a Value, nulls: &NullConfig) -> Option<&'a str> {
    match value {
        Value::String(s) if !nulls.is_null(s) => Some(s.trim()),
        _ => None,
    }
}

fn to_number(value: &Value, nulls: &NullConfig) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => present_str(value, nulls)?
            .parse::<f64>()
            .ok()
            .filter(|v| !v.is_nan()),
    }
}

fn to_category(value: &Value, nulls: &NullConfig) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => present_str(value, nulls).map(str::to_string),
    }
}

fn to_date(value: &Value, nulls: &NullConfig) -> Option<i32> {
    match value {
        Value::Number(n) => n.as_f64().and_then(days_from_number),
        _ => {
            let s = present_str(value, nulls)?;
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .map(days_since_epoch)
        }
    }
}

fn to_millis(value: &Value, nulls: &NullConfig) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_f64().and_then(millis_from_seconds),
        _ => {
            let s = present_str(value, nulls)?;
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.timestamp_millis());
            }
            if let Some(dt) = DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
            {
                return Some(dt.and_utc().timestamp_millis());
            }
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc().timestamp_millis())
        }
    }
}

/// Whole days since epoch, if they land on a representable date
fn days_from_number(days: f64) -> Option<i32> {
    let days = days.floor();
    if !(f64::from(i32::MIN)..=f64::from(i32::MAX)).contains(&days) {
        return None;
    }
    let days = days as i32;
    days.checked_add(EPOCH_DAYS_FROM_CE)
        .and_then(NaiveDate::from_num_days_from_ce_opt)
        .map(|_| days)
}

/// Milliseconds for `secs` seconds since epoch, if representable
fn millis_from_seconds(secs: f64) -> Option<i64> {
    let millis = (secs * 1000.0).round();
    if !millis.is_finite() || millis.abs() >= 2f64.powi(63) {
        return None;
    }
    DateTime::from_timestamp_millis(millis as i64).map(|dt| dt.timestamp_millis())
}

fn to_bool(value: &Value, nulls: &NullConfig) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|v| v != 0.0),
        _ => match present_str(value, nulls)?.to_ascii_lowercase().as_str() {
            "true" | "t" | "1" | "yes" => Some(true),
            "false" | "f" | "0" | "no" => Some(false),
            _ => None,
        },
    }
}
