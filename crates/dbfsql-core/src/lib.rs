//! # dbfsql Core
//!
//! A read-only, SQL-filtered cursor over dBase III records: a parser for
//! `SELECT ... FROM ... [WHERE <column> <op> <literal>]`, an evaluator for
//! that single condition, and a [`Cursor`] with typed getters and null
//! tracking. Rows come from any [`RowSource`].

#![warn(missing_docs)]
#![warn(clippy::all)]

#[allow(missing_docs)]
pub mod charset;
#[allow(missing_docs)]
pub mod coerce;
pub mod config;
#[allow(missing_docs)]
pub mod cursor;
pub mod error;
#[allow(missing_docs)]
pub mod metadata;
#[allow(missing_docs)]
pub mod query;
#[allow(missing_docs)]
pub mod row;
#[allow(missing_docs)]
pub mod schema;
pub mod source;

pub use config::{CursorConfig, RowBoundary};
pub use cursor::{CloseSignal, ColumnRef, Cursor, CursorState};
pub use error::{Error, Result};
pub use metadata::ResultSetMetadata;
pub use row::{FieldValue, Row};
pub use schema::{FieldDescriptor, FieldType, Schema};
pub use source::{MemorySource, RowSource};
