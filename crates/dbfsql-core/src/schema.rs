//! Table schema: field descriptors and the table's declared charset.

use crate::error::{Error, Result};
use encoding_rs::Encoding;
use std::fmt;

/// Declared type of a DBF field, by its one-letter type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// `C`: fixed-width text
    Character,
    /// `N`: number stored as text
    Numeric,
    /// `F`: floating point number stored as text
    Float,
    /// `D`: `YYYYMMDD` date
    Date,
    /// `L`: `T`/`F`/`?` flag
    Logical,
    /// `M`: block number in a memo file
    Memo,
    /// Any other type code.
    Other(u8),
}

impl FieldType {
    /// Map a DBF type code byte to its field type.
    pub fn from_code(code: u8) -> Self {
        match code.to_ascii_uppercase() {
            b'C' => FieldType::Character,
            b'N' => FieldType::Numeric,
            b'F' => FieldType::Float,
            b'D' => FieldType::Date,
            b'L' => FieldType::Logical,
            b'M' => FieldType::Memo,
            other => FieldType::Other(other),
        }
    }

    /// The DBF type code byte.
    pub fn code(&self) -> u8 {
        match self {
            FieldType::Character => b'C',
            FieldType::Numeric => b'N',
            FieldType::Float => b'F',
            FieldType::Date => b'D',
            FieldType::Logical => b'L',
            FieldType::Memo => b'M',
            FieldType::Other(code) => *code,
        }
    }

    /// Whether values of this type compare as numbers.
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldType::Numeric | FieldType::Float)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code() as char)
    }
}

/// Description of one column, as declared in the table header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    name: String,
    field_type: FieldType,
    length: u8,
    decimal_count: u8,
}

impl FieldDescriptor {
    /// Create a field descriptor.
    pub fn new(name: impl Into<String>, field_type: FieldType, length: u8, decimal_count: u8) -> Self {
        Self {
            name: name.into(),
            field_type,
            length,
            decimal_count,
        }
    }

    /// Column name, case-sensitive as declared.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type.
    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// Width of the field in the record, in bytes.
    pub fn length(&self) -> u8 {
        self.length
    }

    /// Number of digits after the decimal point for numeric fields.
    pub fn decimal_count(&self) -> u8 {
        self.decimal_count
    }
}

/// The columns of a table and the charset its text was written with.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    table: String,
    fields: Vec<FieldDescriptor>,
    charset: &'static Encoding,
}

impl Schema {
    /// Create a schema for `table`. Text fields are decoded with `charset`.
    pub fn new(
        table: impl Into<String>,
        fields: Vec<FieldDescriptor>,
        charset: &'static Encoding,
    ) -> Self {
        Self {
            table: table.into(),
            fields,
            charset,
        }
    }

    /// Table name, used in error messages.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// All field descriptors in declaration order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.fields.len()
    }

    /// The legacy charset declared for the table.
    pub fn charset(&self) -> &'static Encoding {
        self.charset
    }

    /// Position of `name` in the field list.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Look a field up by name.
    pub fn field(&self, name: &str) -> Result<&FieldDescriptor> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| Error::NoSuchField {
                column: name.to_string(),
                table: self.table.clone(),
            })
    }

    /// Look a field up by its 1-based index.
    pub fn field_at(&self, index: usize) -> Result<&FieldDescriptor> {
        index
            .checked_sub(1)
            .and_then(|i| self.fields.get(i))
            .ok_or(Error::IllegalColumnIndex {
                index,
                column_count: self.fields.len(),
            })
    }
}
