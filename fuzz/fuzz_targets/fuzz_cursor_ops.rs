#![no_main]

use arbitrary::Arbitrary;
use dbfsql_core::{Cursor, FieldDescriptor, FieldType, FieldValue, MemorySource, Schema};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
enum CursorOp {
    Next,
    GetString(usize),
    GetInt(usize),
    GetDouble(usize),
    GetBigDecimal(usize),
    GetDate(usize),
    Close,
}

#[derive(Arbitrary, Debug)]
struct Input {
    condition: String,
    rows: Vec<[Option<Vec<u8>>; 3]>,
    ops: Vec<CursorOp>,
}

fuzz_target!(|input: Input| {
    let schema = Schema::new(
        "T",
        vec![
            FieldDescriptor::new("NAME", FieldType::Character, 20, 0),
            FieldDescriptor::new("POP", FieldType::Numeric, 10, 2),
            FieldDescriptor::new("CREATED", FieldType::Date, 8, 0),
        ],
        encoding_rs::WINDOWS_1252,
    );
    let rows = input
        .rows
        .into_iter()
        .take(100)
        .map(|row| {
            row.into_iter()
                .map(|value| value.map_or(FieldValue::Absent, FieldValue::Text))
                .collect()
        })
        .collect();

    let sql = format!("SELECT * FROM T WHERE {}", input.condition);
    let Ok(mut cursor) = Cursor::new(MemorySource::new(schema, rows), sql) else {
        return;
    };

    // Limit operations to prevent timeout
    for op in input.ops.iter().take(200) {
        let _ = match op {
            CursorOp::Next => cursor.next().map(|_| ()),
            CursorOp::GetString(i) => cursor.get_string(*i % 5).map(|_| ()),
            CursorOp::GetInt(i) => cursor.get_int(*i % 5).map(|_| ()),
            CursorOp::GetDouble(i) => cursor.get_double(*i % 5).map(|_| ()),
            CursorOp::GetBigDecimal(i) => cursor.get_big_decimal(*i % 5).map(|_| ()),
            CursorOp::GetDate(i) => cursor.get_date(*i % 5).map(|_| ()),
            CursorOp::Close => {
                cursor.close();
                Ok(())
            }
        };
    }
});
