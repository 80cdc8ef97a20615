// dBase III file header
//
// Layout (little endian):
//
// ┌─────────┬──────────────┬──────────────┬────────────┬────────────┬─────┬──────────┐
// │ version │ last update  │ record count │ header len │ record len │ ... │ language │
// │ 1 byte  │ 3 bytes YMD  │ u32          │ u16        │ u16        │     │ byte 29  │
// └─────────┴──────────────┴──────────────┴────────────┴────────────┴─────┴──────────┘
//
// followed by one 32-byte descriptor per field and a 0x0D terminator:
//
// ┌───────────────────┬──────┬──────────┬────────┬──────────┬─────┐
// │ name (11, NUL pad)│ type │ reserved │ length │ decimals │ ... │
// └───────────────────┴──────┴──────────┴────────┴──────────┴─────┘
//
// Each record starts with a deletion flag byte followed by the fields in
// declaration order, padded to their declared length.

use chrono::NaiveDate;
use dbfsql_core::charset::decode_legacy;
use dbfsql_core::{Error, FieldDescriptor, FieldType, Result};
use encoding_rs::Encoding;

/// Size of the fixed header block
pub const HEADER_SIZE: usize = 32;
/// Size of one field descriptor
pub const DESCRIPTOR_SIZE: usize = 32;
/// Marks the end of the field descriptors
pub const HEADER_TERMINATOR: u8 = 0x0D;
/// First byte of a record deleted with `DELETE`
pub const DELETED_FLAG: u8 = b'*';

/// The fixed part of a dBase header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbfHeader {
    /// Version byte (0x03 for plain dBase III)
    pub version: u8,
    /// Date of last update, if the header holds a real one
    pub last_update: Option<NaiveDate>,
    /// Number of records in the file
    pub record_count: u32,
    /// Bytes before the first record
    pub header_length: u16,
    /// Bytes per record, deletion flag included
    pub record_length: u16,
    /// Language driver id
    pub language_driver: u8,
}

impl DbfHeader {
    /// Decode the fixed 32-byte block.
    pub fn decode(bytes: &[u8; HEADER_SIZE], identity: &str) -> Result<Self> {
        let header = Self {
            version: bytes[0],
            last_update: NaiveDate::from_ymd_opt(
                1900 + bytes[1] as i32,
                bytes[2] as u32,
                bytes[3] as u32,
            ),
            record_count: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
            header_length: u16::from_le_bytes([bytes[8], bytes[9]]),
            record_length: u16::from_le_bytes([bytes[10], bytes[11]]),
            language_driver: bytes[29],
        };

        if (header.header_length as usize) < HEADER_SIZE + 1 {
            return Err(invalid(
                identity,
                format!("header length {} is too short", header.header_length),
            ));
        }
        if header.record_length < 2 {
            return Err(invalid(
                identity,
                format!("record length {} is too short", header.record_length),
            ));
        }

        Ok(header)
    }

    /// Bytes of field descriptors and terminator following the fixed block.
    pub fn descriptor_area_len(&self) -> usize {
        self.header_length as usize - HEADER_SIZE
    }
}

/// Decode the field descriptors that follow the fixed header block.
///
/// `bytes` holds everything from offset 32 up to the header length. The
/// declared field lengths must add up to the record length.
pub fn decode_descriptors(
    bytes: &[u8],
    header: &DbfHeader,
    encoding: &'static Encoding,
    identity: &str,
) -> Result<Vec<FieldDescriptor>> {
    let mut fields = Vec::new();
    let mut offset = 0;

    loop {
        match bytes.get(offset) {
            Some(&HEADER_TERMINATOR) => break,
            Some(_) if offset + DESCRIPTOR_SIZE <= bytes.len() => {}
            _ => return Err(invalid(identity, "field descriptors are not terminated")),
        }

        let descriptor = &bytes[offset..offset + DESCRIPTOR_SIZE];
        let name_end = descriptor[..11].iter().position(|b| *b == 0).unwrap_or(11);
        let name = decode_legacy(&descriptor[..name_end], encoding).trim().to_string();
        if name.is_empty() {
            return Err(invalid(identity, format!("field #{} has no name", fields.len() + 1)));
        }

        fields.push(FieldDescriptor::new(
            name,
            FieldType::from_code(descriptor[11]),
            descriptor[16],
            descriptor[17],
        ));
        offset += DESCRIPTOR_SIZE;
    }

    if fields.is_empty() {
        return Err(invalid(identity, "the table declares no field"));
    }

    let declared: usize = 1 + fields.iter().map(|f| f.length() as usize).sum::<usize>();
    if declared != header.record_length as usize {
        return Err(invalid(
            identity,
            format!(
                "fields take {} bytes per record but the header declares {}",
                declared, header.record_length
            ),
        ));
    }

    Ok(fields)
}

pub(crate) fn invalid(identity: &str, reason: impl Into<String>) -> Error {
    Error::InvalidFormat {
        identity: identity.to_string(),
        reason: reason.into(),
    }
}
