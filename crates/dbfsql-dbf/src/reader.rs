// DBF reader module - reads fixed-length records from a dBase III table
//
// The reader handles:
// 1. Header decoding - fixed block, field descriptors, encoding
// 2. Record reading - one fixed-length record per call, in file order
// 3. Padding removal - per field type, blank values become nulls

use crate::codepage::{resolve_encoding, EncodingOrigin};
use crate::header::{decode_descriptors, invalid, DbfHeader, DELETED_FLAG, HEADER_SIZE};
use crate::DbfOptions;
use chrono::NaiveDate;
use dbfsql_core::{Error, FieldType, FieldValue, Result, Row, RowSource, Schema};
use encoding_rs::Encoding;
use std::fs::{self, File};
use std::io::{BufReader, ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, trace};

/// Reader over the records of one dBase table
pub struct DbfReader<R> {
    input: R,
    header: DbfHeader,
    schema: Arc<Schema>,
    encoding_origin: EncodingOrigin,
    identity: String,
    /// Records read so far
    row_number: u64,
    /// Buffer for the current record
    record: Vec<u8>,
    deleted: bool,
}

impl DbfReader<BufReader<File>> {
    /// Open the table stored at `path`.
    ///
    /// The table is named after the file stem. Unless an encoding is forced,
    /// a `.cpg` file next to the table may declare its encoding.
    pub fn open(path: impl AsRef<Path>, options: &DbfOptions) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;

        let code_page = if options.encoding.is_none() && options.read_code_page_file {
            read_code_page_file(path)?
        } else {
            None
        };

        let table = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self::with_code_page(
            BufReader::new(file),
            table,
            path.display().to_string(),
            options,
            code_page.as_deref(),
        )
    }
}

impl<R: Read + Seek> DbfReader<R> {
    /// Read the table held by `input`, naming it `table`.
    pub fn new(input: R, table: impl Into<String>, options: &DbfOptions) -> Result<Self> {
        let table = table.into();
        let identity = table.clone();
        Self::with_code_page(input, table, identity, options, None)
    }

    fn with_code_page(
        mut input: R,
        table: String,
        identity: String,
        options: &DbfOptions,
        code_page: Option<&str>,
    ) -> Result<Self> {
        input.seek(SeekFrom::Start(0))?;

        let mut fixed = [0u8; HEADER_SIZE];
        read_header_bytes(&mut input, &mut fixed, &identity)?;
        let header = DbfHeader::decode(&fixed, &identity)?;

        let (encoding, encoding_origin) =
            resolve_encoding(options.encoding, code_page, header.language_driver);

        let mut area = vec![0u8; header.descriptor_area_len()];
        read_header_bytes(&mut input, &mut area, &identity)?;
        let fields = decode_descriptors(&area, &header, encoding, &identity)?;

        debug!(
            table = %identity,
            version = header.version,
            records = header.record_count,
            fields = fields.len(),
            encoding = encoding.name(),
            origin = ?encoding_origin,
            "opened dBase table"
        );

        let record = vec![0u8; header.record_length as usize];
        let mut reader = Self {
            input,
            schema: Arc::new(Schema::new(table, fields, encoding)),
            header,
            encoding_origin,
            identity,
            row_number: 0,
            record,
            deleted: false,
        };
        reader.seek_first_record()?;
        Ok(reader)
    }

    /// The decoded header
    pub fn header(&self) -> &DbfHeader {
        &self.header
    }

    /// Version byte of the file
    pub fn dbase_version(&self) -> u8 {
        self.header.version
    }

    /// Date of the last update recorded in the header
    pub fn last_update(&self) -> Option<NaiveDate> {
        self.header.last_update
    }

    /// Text encoding of the table
    pub fn encoding(&self) -> &'static Encoding {
        self.schema.charset()
    }

    /// Where the text encoding came from
    pub fn encoding_origin(&self) -> EncodingOrigin {
        self.encoding_origin
    }

    /// Whether the record read last carries the deletion flag
    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// Reset the reader to the first record
    pub fn reset(&mut self) -> Result<()> {
        self.seek_first_record()?;
        self.row_number = 0;
        self.deleted = false;
        Ok(())
    }

    fn seek_first_record(&mut self) -> Result<()> {
        self.input
            .seek(SeekFrom::Start(self.header.header_length as u64))?;
        Ok(())
    }

    /// Split the current record buffer into field values.
    fn decode_record(&self) -> Vec<FieldValue> {
        let mut offset = 1;
        self.schema
            .fields()
            .iter()
            .map(|field| {
                let end = offset + field.length() as usize;
                let raw = &self.record[offset..end];
                offset = end;
                field_value(field.field_type(), raw)
            })
            .collect()
    }
}

impl<R: Read + Seek> RowSource for DbfReader<R> {
    fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    fn read_next_row(&mut self) -> Result<Row> {
        if self.row_number >= self.header.record_count as u64 {
            return Err(Error::NoResult {
                sql: String::new(),
                identity: self.identity.clone(),
            });
        }

        self.input.read_exact(&mut self.record).map_err(|e| {
            if e.kind() == ErrorKind::UnexpectedEof {
                invalid(
                    &self.identity,
                    format!(
                        "record {} of {} is truncated",
                        self.row_number + 1,
                        self.header.record_count
                    ),
                )
            } else {
                Error::Io(e)
            }
        })?;

        self.row_number += 1;
        self.deleted = self.record[0] == DELETED_FLAG;

        let values = self.decode_record();
        trace!(table = %self.identity, row_number = self.row_number, deleted = self.deleted, "read record");
        Ok(Row::new(self.schema.clone(), values))
    }

    fn record_count(&self) -> u64 {
        self.header.record_count as u64
    }

    fn current_row_number(&self) -> u64 {
        self.row_number
    }

    fn identity(&self) -> &str {
        &self.identity
    }
}

/// Strip the padding of a raw field.
///
/// Character fields lose trailing blanks and NULs only; a field made only
/// of NULs was never written and reads as null. Other fields are trimmed on
/// both sides and read as null when blank. `?` is the unset logical.
fn field_value(field_type: FieldType, raw: &[u8]) -> FieldValue {
    let is_padding = |b: &u8| *b == b' ' || *b == 0;
    let end = raw.iter().rposition(|b| !is_padding(b)).map_or(0, |p| p + 1);
    let trimmed = &raw[..end];

    match field_type {
        FieldType::Character => {
            if raw.iter().all(|b| *b == 0) {
                FieldValue::Absent
            } else {
                FieldValue::text(trimmed)
            }
        }
        _ => {
            let start = trimmed.iter().position(|b| !is_padding(b)).unwrap_or(end);
            let value = &trimmed[start..];
            if value.is_empty() || (field_type == FieldType::Logical && value == b"?") {
                FieldValue::Absent
            } else {
                FieldValue::text(value)
            }
        }
    }
}

fn read_header_bytes<R: Read>(input: &mut R, buf: &mut [u8], identity: &str) -> Result<()> {
    input.read_exact(buf).map_err(|e| {
        if e.kind() == ErrorKind::UnexpectedEof {
            invalid(identity, "the header is truncated")
        } else {
            Error::Io(e)
        }
    })
}

/// Content of the `.cpg` file next to `path`, if there is one.
fn read_code_page_file(path: &Path) -> Result<Option<String>> {
    for extension in ["cpg", "CPG"] {
        let candidate = path.with_extension(extension);
        if candidate.is_file() {
            let label = fs::read_to_string(&candidate)?;
            debug!(file = %candidate.display(), label = label.trim(), "read code page file");
            return Ok(Some(label));
        }
    }
    Ok(None)
}
