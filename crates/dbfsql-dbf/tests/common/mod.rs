// Common test utilities for DBF reader integration tests

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Builds dBase III file bytes
#[derive(Debug, Clone)]
pub struct DbfBuilder {
    fields: Vec<(String, u8, u8, u8)>,
    records: Vec<(bool, Vec<Vec<u8>>)>,
    language_driver: u8,
}

#[allow(dead_code)]
impl DbfBuilder {
    pub fn new() -> Self {
        Self {
            fields: Vec::new(),
            records: Vec::new(),
            language_driver: 0x57,
        }
    }

    pub fn field(mut self, name: &str, code: u8, length: u8, decimals: u8) -> Self {
        self.fields.push((name.to_string(), code, length, decimals));
        self
    }

    pub fn language_driver(mut self, id: u8) -> Self {
        self.language_driver = id;
        self
    }

    /// Add a record; each value is padded the way dBase pads its type.
    pub fn record(mut self, values: &[&[u8]]) -> Self {
        self.records.push((false, self.pad(values)));
        self
    }

    pub fn deleted_record(mut self, values: &[&[u8]]) -> Self {
        self.records.push((true, self.pad(values)));
        self
    }

    fn pad(&self, values: &[&[u8]]) -> Vec<Vec<u8>> {
        self.fields
            .iter()
            .zip(values)
            .map(|((_, code, length, _), value)| {
                let length = *length as usize;
                let value = &value[..value.len().min(length)];
                let fill = vec![b' '; length - value.len()];
                if *code == b'N' || *code == b'F' {
                    [fill, value.to_vec()].concat()
                } else {
                    [value.to_vec(), fill].concat()
                }
            })
            .collect()
    }

    pub fn header_length(&self) -> u16 {
        (32 + 32 * self.fields.len() + 1) as u16
    }

    pub fn record_length(&self) -> u16 {
        1 + self.fields.iter().map(|f| f.2 as u16).sum::<u16>()
    }

    pub fn build(&self) -> Vec<u8> {
        let mut bytes = vec![0u8; 32];
        bytes[0] = 0x03;
        bytes[1] = 124;
        bytes[2] = 10;
        bytes[3] = 17;
        bytes[4..8].copy_from_slice(&(self.records.len() as u32).to_le_bytes());
        bytes[8..10].copy_from_slice(&self.header_length().to_le_bytes());
        bytes[10..12].copy_from_slice(&self.record_length().to_le_bytes());
        bytes[29] = self.language_driver;

        for (name, code, length, decimals) in &self.fields {
            let mut descriptor = [0u8; 32];
            descriptor[..name.len()].copy_from_slice(name.as_bytes());
            descriptor[11] = *code;
            descriptor[16] = *length;
            descriptor[17] = *decimals;
            bytes.extend_from_slice(&descriptor);
        }
        bytes.push(0x0D);

        for (deleted, values) in &self.records {
            bytes.push(if *deleted { b'*' } else { b' ' });
            for value in values {
                bytes.extend_from_slice(value);
            }
        }
        bytes.push(0x1A);
        bytes
    }
}

/// The three-record `ID` table: 1, 2, 3.
#[allow(dead_code)]
pub fn ids() -> DbfBuilder {
    DbfBuilder::new()
        .field("ID", b'N', 4, 0)
        .record(&[b"1"])
        .record(&[b"2"])
        .record(&[b"3"])
}

/// A small table of cities with every common field type.
#[allow(dead_code)]
pub fn cities() -> DbfBuilder {
    DbfBuilder::new()
        .field("NAME", b'C', 20, 0)
        .field("POP", b'N', 10, 0)
        .field("AREA", b'N', 10, 2)
        .field("FOUNDED", b'D', 8, 0)
        .field("CAPITAL", b'L', 1, 0)
        .record(&[b"Lyon", b"513275", b"47.87", b"00000000", b"F"])
        .record(&[b"Paris", b"2165423", b"105.40", b"18600101", b"T"])
        .record(&[b"Besan\xe7on", b"", b"65.05", b"", b"?"])
        .record(&["Besançon".as_bytes(), b"117912", b"65.05", b"19000101", b"F"])
}

/// Test fixture that writes tables into a temporary directory
pub struct DbfTestFixture {
    #[allow(dead_code)]
    pub temp_dir: TempDir,
}

#[allow(dead_code)]
impl DbfTestFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir }
    }

    pub fn write(&self, name: &str, builder: &DbfBuilder) -> PathBuf {
        let path = self.temp_dir.path().join(format!("{}.dbf", name));
        fs::write(&path, builder.build()).expect("Failed to write table");
        path
    }

    pub fn write_code_page(&self, table: &Path, label: &str) {
        fs::write(table.with_extension("cpg"), label).expect("Failed to write code page file");
    }

    pub fn write_bytes(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.temp_dir.path().join(format!("{}.dbf", name));
        fs::write(&path, bytes).expect("Failed to write table");
        path
    }
}

impl Default for DbfTestFixture {
    fn default() -> Self {
        Self::new()
    }
}
