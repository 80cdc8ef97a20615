//! # dbfsql DBF
//!
//! Reader for dBase III (`.dbf`) tables, the attribute tables of
//! shapefiles. A [`DbfReader`] decodes the header and hands out one record
//! at a time as a [`dbfsql_core::Row`] through the
//! [`dbfsql_core::RowSource`] trait.
//!
//! ## ⚠️ Internal Implementation Detail
//!
//! **This crate is an internal implementation detail of dbfsql.**
//!
//! Users should depend on the main `dbfsql` crate instead, which provides
//! the stable public API.

use encoding_rs::Encoding;

pub mod codepage;
pub mod header;
pub mod reader;

pub use codepage::EncodingOrigin;
pub use header::DbfHeader;
pub use reader::DbfReader;

/// Options for opening a table
#[derive(Debug, Clone)]
pub struct DbfOptions {
    /// Force the text encoding, ignoring whatever the table declares
    pub encoding: Option<&'static Encoding>,
    /// Honour a `.cpg` file next to the table
    pub read_code_page_file: bool,
}

impl Default for DbfOptions {
    fn default() -> Self {
        Self {
            encoding: None,
            read_code_page_file: true,
        }
    }
}

impl DbfOptions {
    /// Force the text encoding
    pub fn with_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.encoding = Some(encoding);
        self
    }

    /// Enable or disable reading the `.cpg` side file
    pub fn with_code_page_file(mut self, enabled: bool) -> Self {
        self.read_code_page_file = enabled;
        self
    }
}
