//! The row cursor: a filtered, forward-only walk over a row source with
//! JDBC-style typed getters.
//!
//! A cursor starts before the first row. Each successful [`Cursor::next`]
//! replaces the current row wholesale. Getters read the current row and
//! record in [`Cursor::was_null`] whether the value they found was null.
//! A getter that fails leaves that flag alone.

use crate::charset::{decode_field_text, decode_legacy};
use crate::coerce::{parse_dbf_date, parse_numeric, to_decimal};
use crate::config::{CursorConfig, RowBoundary};
use crate::error::{Error, Result};
use crate::metadata::ResultSetMetadata;
use crate::query::ast::Condition;
use crate::query::parser::parse_condition;
use crate::row::Row;
use crate::schema::FieldDescriptor;
use crate::source::RowSource;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

/// Position of a cursor relative to its rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    BeforeFirst,
    OnRow,
    Exhausted,
}

/// A column, by name or by 1-based index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRef<'a> {
    Name(&'a str),
    Index(usize),
}

impl<'a> From<&'a str> for ColumnRef<'a> {
    fn from(name: &'a str) -> Self {
        ColumnRef::Name(name)
    }
}

impl<'a> From<&'a String> for ColumnRef<'a> {
    fn from(name: &'a String) -> Self {
        ColumnRef::Name(name)
    }
}

impl From<usize> for ColumnRef<'_> {
    fn from(index: usize) -> Self {
        ColumnRef::Index(index)
    }
}

impl fmt::Display for ColumnRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnRef::Name(name) => write!(f, "{}", name),
            ColumnRef::Index(index) => write!(f, "#{}", index),
        }
    }
}

/// A shared "closed" switch.
///
/// Owners such as a connection or a statement hand a clone to every cursor
/// they create; closing the owner then closes all of them.
#[derive(Debug, Clone, Default)]
pub struct CloseSignal(Arc<AtomicBool>);

impl CloseSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn close(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_closed(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// A forward-only cursor over the rows of `S` matching a query.
pub struct Cursor<S: RowSource> {
    source: S,
    sql: String,
    condition: Option<Condition>,
    config: CursorConfig,
    state: CursorState,
    current: Option<Row>,
    was_null: bool,
    closed: bool,
    owners: Vec<CloseSignal>,
}

impl<S: RowSource> Cursor<S> {
    /// Create a cursor running `sql` over `source` with the default
    /// configuration.
    ///
    /// The query is parsed and its columns checked against the source's
    /// schema here; a bad query never yields a cursor.
    pub fn new(source: S, sql: impl Into<String>) -> Result<Self> {
        Self::with_config(source, sql, CursorConfig::default())
    }

    /// Create a cursor with an explicit configuration.
    pub fn with_config(source: S, sql: impl Into<String>, config: CursorConfig) -> Result<Self> {
        let sql = sql.into();
        let condition = parse_condition(&sql, source.schema())?;

        debug!(
            sql = %sql,
            table = source.identity(),
            records = source.record_count(),
            boundary = ?config.boundary,
            "cursor created"
        );

        Ok(Self {
            source,
            sql,
            condition,
            config,
            state: CursorState::BeforeFirst,
            current: None,
            was_null: false,
            closed: false,
            owners: Vec::new(),
        })
    }

    /// Tie this cursor to an owner: once `signal` is closed, so is the
    /// cursor.
    pub fn closed_by(mut self, signal: CloseSignal) -> Self {
        self.owners.push(signal);
        self
    }

    /// Move to the next row satisfying the query's condition.
    ///
    /// Fails `NoResult` when the source has no record left to read. Rows
    /// are read until one matches or the source runs out. Whether a match
    /// on the final record counts depends on the configured
    /// [`RowBoundary`]. An evaluation error aborts the call and leaves the
    /// current row in place.
    pub fn next(&mut self) -> Result<bool> {
        trace!(sql = %self.sql, state = ?self.state, "next");
        self.assert_not_closed()?;

        if self.state == CursorState::Exhausted || self.source.remaining() == 0 {
            return Err(self.no_result());
        }

        let mut matched = None;
        while matched.is_none() && self.source.remaining() > 0 {
            let row = self.source.read_next_row()?;
            let verified = match self.condition {
                Some(ref condition) => condition.is_verified(&row)?,
                None => true,
            };
            if verified {
                matched = Some(row);
            }
        }

        let found = match self.config.boundary {
            RowBoundary::IncludeLast => matched.is_some(),
            RowBoundary::ExcludeLast => matched.is_some() && self.source.remaining() > 0,
        };

        if found {
            self.current = matched;
            self.state = CursorState::OnRow;
        } else {
            self.current = None;
            self.state = CursorState::Exhausted;
        }

        debug!(
            sql = %self.sql,
            row_number = self.source.current_row_number(),
            found,
            "cursor advanced"
        );
        Ok(found)
    }

    /// Whether the last successful getter read a null value.
    pub fn was_null(&self) -> bool {
        self.was_null
    }

    /// Read a text column, picking UTF-8 or the table charset per value.
    pub fn get_string<'c>(&mut self, column: impl Into<ColumnRef<'c>>) -> Result<Option<String>> {
        let column = column.into();
        trace!(%column, "get_string");
        self.assert_not_closed()?;

        let value = {
            let (_, raw) = self.raw_value(column)?;
            raw.map(|bytes| decode_field_text(bytes, self.source.declared_charset()).text)
        };
        self.was_null = value.is_none();
        Ok(value)
    }

    /// Read an `i32`; a null reads as `0`.
    pub fn get_int<'c>(&mut self, column: impl Into<ColumnRef<'c>>) -> Result<i32> {
        self.get_number(column.into(), "get_int")
    }

    /// Read an `i64`; a null reads as `0`.
    pub fn get_long<'c>(&mut self, column: impl Into<ColumnRef<'c>>) -> Result<i64> {
        self.get_number(column.into(), "get_long")
    }

    /// Read an `i16`; a null reads as `0`.
    pub fn get_short<'c>(&mut self, column: impl Into<ColumnRef<'c>>) -> Result<i16> {
        self.get_number(column.into(), "get_short")
    }

    /// Read an `f32`; a null reads as `0.0`.
    pub fn get_float<'c>(&mut self, column: impl Into<ColumnRef<'c>>) -> Result<f32> {
        self.get_number(column.into(), "get_float")
    }

    /// Read an `f64`; a null reads as `0.0`.
    pub fn get_double<'c>(&mut self, column: impl Into<ColumnRef<'c>>) -> Result<f64> {
        self.get_number(column.into(), "get_double")
    }

    /// Read a decimal rounded half-to-even to the field's declared number
    /// of decimals. A null reads as `None`.
    pub fn get_big_decimal<'c>(&mut self, column: impl Into<ColumnRef<'c>>) -> Result<Option<Decimal>> {
        let column = column.into();
        trace!(%column, "get_big_decimal");
        self.assert_not_closed()?;

        let scale = self.field(column)?.decimal_count() as u32;
        self.decimal(column, scale)
    }

    /// Read a decimal rounded half-to-even to `scale` decimals.
    #[deprecated(note = "the scale comes from the field; use `get_big_decimal`")]
    pub fn get_big_decimal_with_scale<'c>(
        &mut self,
        column: impl Into<ColumnRef<'c>>,
        scale: u32,
    ) -> Result<Option<Decimal>> {
        let column = column.into();
        trace!(%column, scale, "get_big_decimal_with_scale");
        self.assert_not_closed()?;

        self.decimal(column, scale)
    }

    /// Read a `YYYYMMDD` date. Both a null value and `00000000` read as
    /// `None`.
    pub fn get_date<'c>(&mut self, column: impl Into<ColumnRef<'c>>) -> Result<Option<NaiveDate>> {
        let column = column.into();
        trace!(%column, "get_date");
        self.assert_not_closed()?;

        let value = {
            let (field, raw) = self.raw_value(column)?;
            let text = raw.map(|bytes| decode_field_text(bytes, self.source.declared_charset()).text);
            parse_dbf_date(text.as_deref(), field)?
        };
        self.was_null = value.is_none();
        Ok(value)
    }

    /// Columns of this cursor's rows.
    pub fn metadata(&self) -> ResultSetMetadata<'_> {
        ResultSetMetadata::new(self.source.schema())
    }

    /// Release the cursor. Every later call fails `ConnectionClosed`.
    pub fn close(&mut self) {
        if !self.closed {
            debug!(sql = %self.sql, table = self.source.identity(), "cursor closed");
        }
        self.closed = true;
        self.current = None;
    }

    /// Whether the cursor, or one of its owners, was closed.
    pub fn is_closed(&self) -> bool {
        self.closed || self.owners.iter().any(CloseSignal::is_closed)
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// The parsed WHERE condition, `None` when every row matches.
    pub fn condition(&self) -> Option<&Condition> {
        self.condition.as_ref()
    }

    /// Number of records the source has read so far.
    pub fn row_number(&self) -> u64 {
        self.source.current_row_number()
    }

    fn get_number<T: FromStr + Default>(&mut self, column: ColumnRef<'_>, getter: &str) -> Result<T> {
        trace!(%column, getter, "get number");
        self.assert_not_closed()?;

        let value = self.parsed::<T>(column)?;
        self.was_null = value.is_none();
        Ok(value.unwrap_or_default())
    }

    fn decimal(&mut self, column: ColumnRef<'_>, scale: u32) -> Result<Option<Decimal>> {
        let value = match self.parsed::<f64>(column)? {
            Some(double) => Some(to_decimal(double, scale, self.field(column)?)?),
            None => None,
        };
        self.was_null = value.is_none();
        Ok(value)
    }

    fn parsed<T: FromStr>(&self, column: ColumnRef<'_>) -> Result<Option<T>> {
        let (field, raw) = self.raw_value(column)?;
        let text = raw.map(|bytes| decode_legacy(bytes, self.source.declared_charset()));
        parse_numeric(text.as_deref(), field)
    }

    /// Resolve `column` against the schema, then fetch its raw bytes from
    /// the current row.
    fn raw_value(&self, column: ColumnRef<'_>) -> Result<(&FieldDescriptor, Option<&[u8]>)> {
        let field = self.field(column)?;
        let row = self.current.as_ref().ok_or_else(|| self.no_result())?;
        Ok((field, row.get(field.name())?.as_bytes()))
    }

    fn field(&self, column: ColumnRef<'_>) -> Result<&FieldDescriptor> {
        let schema = self.source.schema();
        match column {
            ColumnRef::Name(name) => schema.field(name),
            ColumnRef::Index(index) => schema.field_at(index),
        }
    }

    fn assert_not_closed(&self) -> Result<()> {
        if self.is_closed() {
            return Err(Error::ConnectionClosed {
                identity: self.source.identity().to_string(),
            });
        }
        Ok(())
    }

    fn no_result(&self) -> Error {
        Error::NoResult {
            sql: self.sql.clone(),
            identity: self.source.identity().to_string(),
        }
    }
}

impl<S: RowSource> fmt::Debug for Cursor<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("sql", &self.sql)
            .field("table", &self.source.identity())
            .field("state", &self.state)
            .field("row_number", &self.source.current_row_number())
            .field("was_null", &self.was_null)
            .field("closed", &self.is_closed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldType, Schema};
    use crate::source::MemorySource;

    fn ids(values: &[&[Option<&str>]]) -> MemorySource {
        let schema = Schema::new(
            "ids",
            vec![
                FieldDescriptor::new("ID", FieldType::Numeric, 4, 0),
                FieldDescriptor::new("LABEL", FieldType::Character, 10, 0),
            ],
            encoding_rs::WINDOWS_1252,
        );
        MemorySource::from_text(schema, values)
    }

    fn three() -> MemorySource {
        ids(&[
            &[Some("1"), Some("one")],
            &[Some("2"), Some("two")],
            &[Some("3"), Some("three")],
        ])
    }

    #[test]
    fn test_state_transitions() {
        let mut cursor = Cursor::new(three(), "SELECT * FROM ids").unwrap();
        assert_eq!(cursor.state(), CursorState::BeforeFirst);
        assert!(cursor.condition().is_none());

        assert!(cursor.next().unwrap());
        assert_eq!(cursor.state(), CursorState::OnRow);
        assert_eq!(cursor.row_number(), 1);
    }

    #[test]
    fn test_failed_getter_keeps_was_null() {
        let mut cursor = Cursor::new(
            ids(&[&[None, Some("x")], &[Some("1"), None]]),
            "SELECT * FROM ids",
        )
        .unwrap();
        cursor.next().unwrap();

        assert_eq!(cursor.get_int("ID").unwrap(), 0);
        assert!(cursor.was_null());
        assert!(cursor.get_int("LABEL").is_err());
        assert!(cursor.was_null());
        assert!(cursor.get_int("MISSING").is_err());
        assert!(cursor.was_null());
    }

    #[test]
    fn test_evaluation_error_keeps_current_row() {
        let source = ids(&[&[Some("1"), Some("a")], &[Some("x"), Some("b")], &[Some("3"), Some("c")]]);
        let mut cursor = Cursor::new(source, "SELECT * FROM ids WHERE ID >= 1").unwrap();

        assert!(cursor.next().unwrap());
        assert!(matches!(cursor.next(), Err(Error::NotNumeric { .. })));
        assert_eq!(cursor.state(), CursorState::OnRow);
        assert_eq!(cursor.get_int("ID").unwrap(), 1);
    }

    #[test]
    fn test_close_signal_closes_cursor() {
        let signal = CloseSignal::new();
        let mut cursor = Cursor::new(three(), "SELECT * FROM ids")
            .unwrap()
            .closed_by(signal.clone());
        assert!(cursor.next().unwrap());

        signal.close();
        assert!(cursor.is_closed());
        assert!(matches!(cursor.next(), Err(Error::ConnectionClosed { .. })));
        assert!(matches!(cursor.get_int("ID"), Err(Error::ConnectionClosed { .. })));
    }

    #[test]
    fn test_column_ref_display() {
        assert_eq!(ColumnRef::from("ID").to_string(), "ID");
        assert_eq!(ColumnRef::from(2usize).to_string(), "#2");
    }
}
