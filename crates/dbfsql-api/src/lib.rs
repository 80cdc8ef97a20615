//! # dbfsql
//!
//! Read-only SQL over dBase III (`.dbf`) tables, with ResultSet-style typed
//! getters.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dbfsql::{Connection, Error};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let connection = Connection::open("./communes.dbf")?;
//!     let statement = connection.create_statement()?;
//!
//!     let mut rs = statement.execute_query("SELECT * FROM communes WHERE POP > 1000")?;
//!     loop {
//!         match rs.next() {
//!             Ok(true) => {
//!                 let name = rs.get_string("NAME")?;
//!                 let population = rs.get_long("POP")?;
//!                 println!("{:?}: {}", name, population);
//!             }
//!             Ok(false) | Err(Error::NoResult { .. }) => break,
//!             Err(e) => return Err(e.into()),
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! `next()` fails with [`Error::NoResult`] once the table has no record
//! left to read, so a walk ends either on `Ok(false)` or on that error
//! when the last record matched.
//!
//! ## Supported queries
//!
//! `SELECT <columns> FROM <table> [WHERE <column> <op> <literal>]` with one
//! of `=`, `!=`, `<>`, `<`, `<=`, `>`, `>=`. Anything beyond that (AND, OR,
//! joins, ORDER BY, ...) is rejected with
//! [`Error::UnsupportedParsingFeature`].

pub mod logging;

use dbfsql_core::CloseSignal;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

// Re-export core types
pub use dbfsql_core::{
    query, ColumnRef, Cursor, CursorConfig, CursorState, Error, FieldDescriptor, FieldType,
    FieldValue, MemorySource, Result, ResultSetMetadata, Row, RowBoundary, RowSource, Schema,
};

// DBF components
pub use dbfsql_dbf::{DbfHeader, DbfOptions, DbfReader, EncodingOrigin};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Rows returned by [`Statement::execute_query`]
pub type ResultSet = Cursor<DbfReader<BufReader<File>>>;

/// Options for opening a connection
#[derive(Debug, Clone, Default)]
pub struct ConnectionOptions {
    /// How the table file is read
    pub dbf: DbfOptions,
    /// How result sets iterate
    pub cursor: CursorConfig,
}

impl ConnectionOptions {
    /// Set the table reading options
    pub fn with_dbf(mut self, dbf: DbfOptions) -> Self {
        self.dbf = dbf;
        self
    }

    /// Set the result set options
    pub fn with_cursor(mut self, cursor: CursorConfig) -> Self {
        self.cursor = cursor;
        self
    }
}

/// A connection to one dBase table.
///
/// Opening a connection checks the table header. Every query then reads
/// the file afresh through its own reader, so result sets are independent
/// of each other.
///
/// # Examples
///
/// ```rust,no_run
/// use dbfsql::{Connection, ConnectionOptions, CursorConfig};
///
/// let options = ConnectionOptions::default().with_cursor(CursorConfig::legacy());
/// let connection = Connection::open_with_options("./communes.dbf", options)?;
/// println!("{} columns", connection.metadata().column_count());
/// connection.close();
/// # Ok::<(), dbfsql::Error>(())
/// ```
#[derive(Debug)]
pub struct Connection {
    path: PathBuf,
    options: ConnectionOptions,
    header: DbfHeader,
    schema: Arc<Schema>,
    closed: CloseSignal,
}

impl Connection {
    /// Opens the table at `path` with default options.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ConnectionOptions::default())
    }

    /// Opens the table at `path`.
    ///
    /// Fails if the file cannot be read or its header is not a valid
    /// dBase III header.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ConnectionOptions) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let reader = DbfReader::open(&path, &options.dbf)?;

        debug!(
            path = %path.display(),
            records = reader.record_count(),
            encoding = reader.encoding().name(),
            "connection opened"
        );

        Ok(Self {
            header: reader.header().clone(),
            schema: reader.schema().clone(),
            path,
            options,
            closed: CloseSignal::new(),
        })
    }

    /// Creates a statement for running queries on this table.
    pub fn create_statement(&self) -> Result<Statement> {
        self.assert_open()?;
        Ok(Statement {
            path: self.path.clone(),
            options: self.options.clone(),
            connection: self.closed.clone(),
            closed: CloseSignal::new(),
        })
    }

    /// Columns of the table
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Column metadata with 1-based indexes
    pub fn metadata(&self) -> ResultSetMetadata<'_> {
        ResultSetMetadata::new(&self.schema)
    }

    /// The table header as read when the connection was opened
    pub fn header(&self) -> &DbfHeader {
        &self.header
    }

    /// Path of the table file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Closes the connection, its statements and their result sets.
    pub fn close(&self) {
        debug!(path = %self.path.display(), "connection closed");
        self.closed.close();
    }

    /// Whether the connection is closed
    pub fn is_closed(&self) -> bool {
        self.closed.is_closed()
    }

    fn assert_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(Error::ConnectionClosed {
                identity: self.path.display().to_string(),
            });
        }
        Ok(())
    }
}

/// A statement running queries against a connection's table
#[derive(Debug)]
pub struct Statement {
    path: PathBuf,
    options: ConnectionOptions,
    connection: CloseSignal,
    closed: CloseSignal,
}

impl Statement {
    /// Runs `sql` and returns a result set positioned before the first
    /// matching row.
    ///
    /// The query is parsed and checked against the table schema before any
    /// record is read; a query that does not parse returns no result set.
    pub fn execute_query(&self, sql: &str) -> Result<ResultSet> {
        self.assert_open()?;

        let reader = DbfReader::open(&self.path, &self.options.dbf)?;
        let cursor = Cursor::with_config(reader, sql, self.options.cursor.clone())?
            .closed_by(self.connection.clone())
            .closed_by(self.closed.clone());
        Ok(cursor)
    }

    /// Closes the statement and its result sets.
    pub fn close(&self) {
        self.closed.close();
    }

    /// Whether the statement or its connection is closed
    pub fn is_closed(&self) -> bool {
        self.closed.is_closed() || self.connection.is_closed()
    }

    fn assert_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(Error::ConnectionClosed {
                identity: self.path.display().to_string(),
            });
        }
        Ok(())
    }
}
