#![no_main]

use dbfsql_core::query::parser::{parse_query, Parser};
use dbfsql_core::{FieldDescriptor, FieldType, Schema};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Convert bytes to string (ignore invalid UTF-8)
    if let Ok(sql) = std::str::from_utf8(data) {
        // Limit query length to prevent timeout
        if sql.len() > 10_000 {
            return;
        }

        // Syntax only - should never panic
        if let Ok(mut parser) = Parser::new(sql) {
            let _ = parser.parse();
        }

        // With column validation
        let schema = Schema::new(
            "T",
            vec![
                FieldDescriptor::new("ID", FieldType::Numeric, 4, 0),
                FieldDescriptor::new("NAME", FieldType::Character, 20, 0),
            ],
            encoding_rs::WINDOWS_1252,
        );
        let _ = parse_query(sql, &schema);
    }
});
