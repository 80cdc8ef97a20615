//! Column metadata of a result set, with 1-based column indexes.

use crate::error::Result;
use crate::schema::{FieldDescriptor, FieldType, Schema};

/// A read-only view of the columns a cursor exposes.
#[derive(Debug, Clone, Copy)]
pub struct ResultSetMetadata<'a> {
    schema: &'a Schema,
}

impl<'a> ResultSetMetadata<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self { schema }
    }

    pub fn column_count(&self) -> usize {
        self.schema.column_count()
    }

    pub fn table_name(&self) -> &'a str {
        self.schema.table()
    }

    pub fn field(&self, column: usize) -> Result<&'a FieldDescriptor> {
        self.schema.field_at(column)
    }

    pub fn column_name(&self, column: usize) -> Result<&'a str> {
        self.field(column).map(|f| f.name())
    }

    pub fn column_type(&self, column: usize) -> Result<FieldType> {
        self.field(column).map(|f| f.field_type())
    }

    /// SQL-ish name of the column type.
    pub fn column_type_name(&self, column: usize) -> Result<&'static str> {
        self.column_type(column).map(|t| match t {
            FieldType::Character => "CHAR",
            FieldType::Numeric => "NUMERIC",
            FieldType::Float => "FLOAT",
            FieldType::Date => "DATE",
            FieldType::Logical => "BOOLEAN",
            FieldType::Memo => "MEMO",
            FieldType::Other(_) => "OTHER",
        })
    }

    /// Declared field width.
    pub fn precision(&self, column: usize) -> Result<u32> {
        self.field(column).map(|f| f.length() as u32)
    }

    /// Declared number of decimals.
    pub fn scale(&self, column: usize) -> Result<u32> {
        self.field(column).map(|f| f.decimal_count() as u32)
    }

    pub fn column_display_size(&self, column: usize) -> Result<u32> {
        self.precision(column)
    }

    pub fn is_signed(&self, column: usize) -> Result<bool> {
        self.column_type(column).map(|t| t.is_numeric())
    }
}
