//! The row source a cursor reads from.

use crate::error::{Error, Result};
use crate::row::{FieldValue, Row};
use crate::schema::Schema;
use encoding_rs::Encoding;
use std::sync::Arc;

/// A sequential supplier of rows with a shared, monotonically advancing
/// row counter.
///
/// `current_row_number` counts the rows read so far, so
/// `record_count() - current_row_number()` is the number of rows left.
/// Only `read_next_row` may advance the counter.
pub trait RowSource {
    /// Columns of every row this source yields.
    fn schema(&self) -> &Arc<Schema>;

    /// Read the next row and advance the row counter by one.
    fn read_next_row(&mut self) -> Result<Row>;

    /// Total number of records.
    fn record_count(&self) -> u64;

    /// Number of records already read.
    fn current_row_number(&self) -> u64;

    /// Identity of the underlying table, for error messages.
    fn identity(&self) -> &str;

    /// The legacy charset text fields were written with.
    fn declared_charset(&self) -> &'static Encoding {
        self.schema().charset()
    }

    /// Records not yet read.
    fn remaining(&self) -> u64 {
        self.record_count().saturating_sub(self.current_row_number())
    }
}

impl<S: RowSource + ?Sized> RowSource for Box<S> {
    fn schema(&self) -> &Arc<Schema> {
        (**self).schema()
    }

    fn read_next_row(&mut self) -> Result<Row> {
        (**self).read_next_row()
    }

    fn record_count(&self) -> u64 {
        (**self).record_count()
    }

    fn current_row_number(&self) -> u64 {
        (**self).current_row_number()
    }

    fn identity(&self) -> &str {
        (**self).identity()
    }

    fn declared_charset(&self) -> &'static Encoding {
        (**self).declared_charset()
    }
}

/// A row source over rows held in memory.
#[derive(Debug, Clone)]
pub struct MemorySource {
    schema: Arc<Schema>,
    rows: Vec<Vec<FieldValue>>,
    position: usize,
}

impl MemorySource {
    /// Create a source over raw values, one inner vector per record.
    pub fn new(schema: Schema, rows: Vec<Vec<FieldValue>>) -> Self {
        Self {
            schema: Arc::new(schema),
            rows,
            position: 0,
        }
    }

    /// Create a source from optional text values (`None` is null).
    pub fn from_text(schema: Schema, rows: &[&[Option<&str>]]) -> Self {
        let rows = rows
            .iter()
            .map(|row| row.iter().map(|v| FieldValue::from(*v)).collect())
            .collect();
        Self::new(schema, rows)
    }
}

impl RowSource for MemorySource {
    fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    fn read_next_row(&mut self) -> Result<Row> {
        let values = self.rows.get(self.position).cloned().ok_or_else(|| Error::NoResult {
            sql: String::new(),
            identity: self.schema.table().to_string(),
        })?;
        self.position += 1;
        Ok(Row::new(self.schema.clone(), values))
    }

    fn record_count(&self) -> u64 {
        self.rows.len() as u64
    }

    fn current_row_number(&self) -> u64 {
        self.position as u64
    }

    fn identity(&self) -> &str {
        self.schema.table()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldDescriptor, FieldType};

    fn source() -> MemorySource {
        let schema = Schema::new(
            "ids",
            vec![FieldDescriptor::new("ID", FieldType::Numeric, 4, 0)],
            encoding_rs::WINDOWS_1252,
        );
        MemorySource::from_text(schema, &[&[Some("1")], &[None]])
    }

    #[test]
    fn test_counter_advances_with_reads() {
        let mut source = source();
        assert_eq!(source.record_count(), 2);
        assert_eq!(source.remaining(), 2);

        let row = source.read_next_row().unwrap();
        assert_eq!(row.get("ID").unwrap().as_bytes(), Some(&b"1"[..]));
        assert_eq!(source.current_row_number(), 1);

        let row = source.read_next_row().unwrap();
        assert!(row.get("ID").unwrap().is_absent());
        assert_eq!(source.remaining(), 0);
    }

    #[test]
    fn test_read_past_end_fails() {
        let mut source = source();
        source.read_next_row().unwrap();
        source.read_next_row().unwrap();
        assert!(matches!(source.read_next_row(), Err(Error::NoResult { .. })));
        assert_eq!(source.current_row_number(), 2);
    }

    #[test]
    fn test_declared_charset_defaults_to_schema() {
        assert_eq!(source().declared_charset(), encoding_rs::WINDOWS_1252);
    }
}
