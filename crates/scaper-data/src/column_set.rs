//! Typed, row-aligned columns backed by an Arrow record batch

use std::sync::Arc;

use arrow::array::{
    Array, ArrayRef, BooleanArray, Date32Array, DictionaryArray, Float64Array, StringArray,
    TimestampMillisecondArray,
};
use arrow::datatypes::{Int32Type, Schema, SchemaRef};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use chrono::{DateTime, NaiveDate};

use crate::record::{Datum, Record};
use crate::types::TypeTag;
use crate::DataError;

/// Days between 0001-01-01 and 1970-01-01
pub(crate) const EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Columns coerced to their declared types. All columns share one row count.
#[derive(Debug, Clone)]
pub struct TypedColumnSet {
    batch: RecordBatch,
    tags: Vec<TypeTag>,
}

impl TypedColumnSet {
    /// Assemble a column set. Arrow rejects columns of differing lengths.
    pub(crate) fn try_new(
        schema: Schema,
        columns: Vec<ArrayRef>,
        tags: Vec<TypeTag>,
        row_count: usize,
    ) -> Result<Self, DataError> {
        let options = RecordBatchOptions::new().with_row_count(Some(row_count));
        let batch = RecordBatch::try_new_with_options(Arc::new(schema), columns, &options)?;
        Ok(Self { batch, tags })
    }

    /// A set with no columns and no rows
    pub fn empty() -> Self {
        Self {
            batch: RecordBatch::new_empty(Arc::new(Schema::empty())),
            tags: Vec::new(),
        }
    }

    pub fn schema(&self) -> SchemaRef {
        self.batch.schema()
    }

    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    pub fn num_columns(&self) -> usize {
        self.batch.num_columns()
    }

    /// Column names in declaration order
    pub fn column_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.batch
            .schema_ref()
            .fields()
            .iter()
            .map(|field| field.name().as_str())
    }

    pub fn column(&self, name: &str) -> Option<&ArrayRef> {
        self.batch.column_by_name(name)
    }

    pub fn type_tag(&self, name: &str) -> Option<TypeTag> {
        let index = self.batch.schema_ref().index_of(name).ok()?;
        self.tags.get(index).copied()
    }

    /// Row `row` as a record, or `None` past the end
    pub fn record(&self, row: usize) -> Option<Record<'_>> {
        (row < self.num_rows()).then(|| Record::new(self, row))
    }

    pub fn records(&self) -> impl Iterator<Item = Record<'_>> + '_ {
        (0..self.num_rows()).map(move |row| Record::new(self, row))
    }

    /// Value of column `name` at `row`. `None` for unknown columns, rows
    /// out of range, and null cells.
    pub fn value(&self, name: &str, row: usize) -> Option<Datum> {
        let index = self.batch.schema_ref().index_of(name).ok()?;
        let column = self.batch.column(index);
        if row >= column.len() || column.is_null(row) {
            return None;
        }

        match self.tags.get(index)? {
            TypeTag::Numeric => {
                let array = column.as_any().downcast_ref::<Float64Array>()?;
                Some(Datum::Number(array.value(row)))
            }
            TypeTag::Categorical => {
                let array = column.as_any().downcast_ref::<DictionaryArray<Int32Type>>()?;
                let values = array.values().as_any().downcast_ref::<StringArray>()?;
                let key = usize::try_from(array.keys().value(row)).ok()?;
                Some(Datum::Category(values.value(key).to_string()))
            }
            TypeTag::Date => {
                let array = column.as_any().downcast_ref::<Date32Array>()?;
                let days = array.value(row).checked_add(EPOCH_DAYS_FROM_CE)?;
                NaiveDate::from_num_days_from_ce_opt(days).map(Datum::Date)
            }
            TypeTag::DateTime => {
                let array = column.as_any().downcast_ref::<TimestampMillisecondArray>()?;
                DateTime::from_timestamp_millis(array.value(row))
                    .map(|dt| Datum::DateTime(dt.naive_utc()))
            }
            TypeTag::Logical => {
                let array = column.as_any().downcast_ref::<BooleanArray>()?;
                Some(Datum::Boolean(array.value(row)))
            }
        }
    }

    /// Distinct categories of a categorical column in first-seen order
    pub fn categories(&self, name: &str) -> Option<Vec<String>> {
        if self.type_tag(name)? != TypeTag::Categorical {
            return None;
        }
        let array = self
            .column(name)?
            .as_any()
            .downcast_ref::<DictionaryArray<Int32Type>>()?;
        let values = array.values().as_any().downcast_ref::<StringArray>()?;
        Some(values.iter().flatten().map(str::to_string).collect())
    }
}

pub(crate) fn days_since_epoch(date: NaiveDate) -> i32 {
    use chrono::Datelike;
    date.num_days_from_ce() - EPOCH_DAYS_FROM_CE
}
