// Common test utilities for end-to-end query tests

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Field declaration: name, type code, length, decimals
pub type Field = (&'static str, u8, u8, u8);

/// Encode a dBase III table. Values are padded per field type.
pub fn dbf_bytes(fields: &[Field], records: &[&[&[u8]]]) -> Vec<u8> {
    let header_length = (32 + 32 * fields.len() + 1) as u16;
    let record_length = 1 + fields.iter().map(|f| f.2 as u16).sum::<u16>();

    let mut bytes = vec![0u8; 32];
    bytes[0] = 0x03;
    bytes[1] = 124;
    bytes[2] = 10;
    bytes[3] = 17;
    bytes[4..8].copy_from_slice(&(records.len() as u32).to_le_bytes());
    bytes[8..10].copy_from_slice(&header_length.to_le_bytes());
    bytes[10..12].copy_from_slice(&record_length.to_le_bytes());
    bytes[29] = 0x57;

    for (name, code, length, decimals) in fields {
        let mut descriptor = [0u8; 32];
        descriptor[..name.len()].copy_from_slice(name.as_bytes());
        descriptor[11] = *code;
        descriptor[16] = *length;
        descriptor[17] = *decimals;
        bytes.extend_from_slice(&descriptor);
    }
    bytes.push(0x0D);

    for record in records {
        bytes.push(b' ');
        for ((_, code, length, _), value) in fields.iter().zip(record.iter()) {
            let fill = vec![b' '; *length as usize - value.len()];
            if *code == b'N' || *code == b'F' {
                bytes.extend_from_slice(&fill);
                bytes.extend_from_slice(value);
            } else {
                bytes.extend_from_slice(value);
                bytes.extend_from_slice(&fill);
            }
        }
    }
    bytes.push(0x1A);
    bytes
}

/// Test fixture that writes tables into a temporary directory
pub struct TableFixture {
    #[allow(dead_code)]
    pub temp_dir: TempDir,
}

#[allow(dead_code)]
impl TableFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir }
    }

    pub fn write(&self, name: &str, fields: &[Field], records: &[&[&[u8]]]) -> PathBuf {
        let path = self.temp_dir.path().join(format!("{}.dbf", name));
        fs::write(&path, dbf_bytes(fields, records)).expect("Failed to write table");
        path
    }

    /// `T(ID)` holding 1, 2 and 3.
    pub fn ids(&self) -> PathBuf {
        self.write("T", &[("ID", b'N', 4, 0)], &[&[b"1"], &[b"2"], &[b"3"]])
    }

    /// `COMMUNES` with a text, two numeric, a date and a logical column.
    pub fn communes(&self) -> PathBuf {
        self.write(
            "COMMUNES",
            &[
                ("NAME", b'C', 24, 0),
                ("POP", b'N', 9, 0),
                ("AREA", b'N', 8, 2),
                ("CREATED", b'D', 8, 0),
                ("PREFECT", b'L', 1, 0),
            ],
            &[
                &[b"Lyon", b"513275", b"47.87", b"18000101", b"T"],
                &[b"Villeurbanne", b"156928", b"14.52", b"00000000", b"F"],
                &["Besançon".as_bytes(), b"117912", b"65.05", b"", b"T"],
                &[b"Besan\xe7on", b"", b"", b"19000101", b"?"],
                &[b"Grenoble", b"  158198", b"18.13", b"17900304", b"T"],
            ],
        )
    }
}

impl Default for TableFixture {
    fn default() -> Self {
        Self::new()
    }
}
