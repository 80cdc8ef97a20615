#![no_main]

use dbfsql_core::RowSource;
use dbfsql_dbf::{DbfOptions, DbfReader};
use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    // Limit input size to prevent timeout
    if data.len() > 1_000_000 {
        return;
    }

    // Decode header and records - should never panic
    if let Ok(mut reader) = DbfReader::new(Cursor::new(data), "fuzz", &DbfOptions::default()) {
        while reader.remaining() > 0 {
            if reader.read_next_row().is_err() {
                break;
            }
        }
    }
});
