//! Rows handed out by a row source.

use crate::error::{Error, Result};
use crate::schema::Schema;
use std::sync::Arc;

/// Raw value of one field in a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Text bytes as stored, padding already stripped.
    Text(Vec<u8>),
    /// Null.
    Absent,
}

impl FieldValue {
    /// Build a text value from a string's bytes.
    pub fn text(value: impl Into<Vec<u8>>) -> Self {
        FieldValue::Text(value.into())
    }

    /// The raw bytes, or `None` for a null value.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            FieldValue::Text(bytes) => Some(bytes),
            FieldValue::Absent => None,
        }
    }

    /// Whether the value is null.
    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Absent)
    }
}

impl From<Option<&str>> for FieldValue {
    fn from(value: Option<&str>) -> Self {
        match value {
            Some(text) => FieldValue::text(text),
            None => FieldValue::Absent,
        }
    }
}

/// One record: a value per schema column, in schema order.
///
/// Rows are immutable. A cursor replaces its current row wholesale on each
/// advance and never patches individual fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    schema: Arc<Schema>,
    values: Vec<FieldValue>,
}

impl Row {
    /// Create a row. Missing trailing values are filled with nulls and
    /// surplus values are dropped, so the row always matches its schema.
    pub fn new(schema: Arc<Schema>, mut values: Vec<FieldValue>) -> Self {
        values.resize(schema.column_count(), FieldValue::Absent);
        Self { schema, values }
    }

    /// The schema this row was read with.
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Value of `column`. Fails `NoSuchField` if the column is unknown, so
    /// a null value is never mistaken for a missing column.
    pub fn get(&self, column: &str) -> Result<&FieldValue> {
        self.schema
            .position(column)
            .map(|i| &self.values[i])
            .ok_or_else(|| Error::NoSuchField {
                column: column.to_string(),
                table: self.schema.table().to_string(),
            })
    }

    /// All values in schema order.
    pub fn values(&self) -> &[FieldValue] {
        &self.values
    }
}
