//! Error types for dbfsql.

use thiserror::Error;

/// The main error type for dbfsql operations.
///
/// Every failure is reported at the call that triggered it. Nothing in the
/// cursor, parser or resolver retries or swallows an error.
#[derive(Debug, Error)]
pub enum Error {
    /// The connection, statement or result set has been closed.
    #[error("{identity} is closed")]
    ConnectionClosed {
        /// Identity of the closed table or file.
        identity: String,
    },

    /// A column name is not part of the table schema.
    #[error("no field '{column}' in table {table}")]
    NoSuchField {
        /// Requested column name
        column: String,
        /// Table the column was looked up in
        table: String,
    },

    /// A 1-based column index is outside `1..=column_count`.
    #[error("illegal column index {index}: the table has {column_count} columns")]
    IllegalColumnIndex {
        /// Requested index
        index: usize,
        /// Number of columns in the table
        column_count: usize,
    },

    /// A field value could not be parsed as a number.
    #[error("field '{column}' of type {field_type} is not numeric: '{value}'")]
    NotNumeric {
        /// Column name
        column: String,
        /// Declared dBase type code
        field_type: String,
        /// Raw, untrimmed text
        value: String,
    },

    /// A field value is not a `YYYYMMDD` date.
    #[error("field '{column}' of type {field_type} is not a date: '{value}'")]
    NotDate {
        /// Column name
        column: String,
        /// Declared dBase type code
        field_type: String,
        /// Raw text
        value: String,
    },

    /// A condition literal cannot be compared with the column's type.
    #[error("illegal parameter '{literal}' for field '{column}' of type {field_type}: {reason}")]
    IllegalParameter {
        /// Column the condition compares
        column: String,
        /// Declared dBase type code
        field_type: String,
        /// Literal as written in the query
        literal: String,
        /// Why the literal does not fit
        reason: String,
    },

    /// The query does not match the supported grammar.
    #[error("invalid statement '{sql}': {reason}")]
    InvalidStatement {
        /// Query text
        sql: String,
        /// What failed to parse
        reason: String,
    },

    /// The query uses a construct the engine recognizes but does not support.
    #[error("unsupported feature {feature} in '{sql}'")]
    UnsupportedParsingFeature {
        /// Query text
        sql: String,
        /// Name of the construct, such as `ORDER BY` or `sub-query`
        feature: String,
    },

    /// No more records are available.
    #[error("no more results for '{sql}' in {identity}")]
    NoResult {
        /// Query the cursor runs
        sql: String,
        /// Identity of the row source
        identity: String,
    },

    /// The table bytes do not follow the dBase III layout.
    #[error("invalid DBF format in {identity}: {reason}")]
    InvalidFormat {
        /// Identity of the table or file
        identity: String,
        /// What is wrong with the bytes
        reason: String,
    },

    /// Invalid configuration, such as a malformed log filter
    #[error("invalid configuration: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized `Result` type for dbfsql operations.
pub type Result<T> = std::result::Result<T, Error>;
