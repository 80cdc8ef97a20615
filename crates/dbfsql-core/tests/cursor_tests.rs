use chrono::NaiveDate;
use dbfsql_core::{
    Cursor, CursorConfig, CursorState, Error, FieldDescriptor, FieldType, FieldValue, MemorySource,
    RowBoundary, Schema,
};
use rust_decimal::Decimal;
use std::str::FromStr;

fn ids() -> MemorySource {
    let schema = Schema::new(
        "T",
        vec![FieldDescriptor::new("ID", FieldType::Numeric, 4, 0)],
        encoding_rs::WINDOWS_1252,
    );
    MemorySource::from_text(schema, &[&[Some("1")], &[Some("2")], &[Some("3")]])
}

fn cities() -> MemorySource {
    let schema = Schema::new(
        "CITIES",
        vec![
            FieldDescriptor::new("NAME", FieldType::Character, 20, 0),
            FieldDescriptor::new("POP", FieldType::Numeric, 10, 0),
            FieldDescriptor::new("AREA", FieldType::Numeric, 10, 2),
            FieldDescriptor::new("FOUNDED", FieldType::Date, 8, 0),
        ],
        encoding_rs::WINDOWS_1252,
    );
    MemorySource::from_text(
        schema,
        &[
            &[Some("Lyon"), Some("  42 "), Some("47.875"), Some("00000000")],
            &[None, None, None, None],
            &[Some("Paris"), Some("2100000"), Some("105.4"), Some("2023022")],
            &[Some("Nice"), Some("340000"), Some("71.92"), Some("20230228")],
        ],
    )
}

#[test]
fn test_filter_matches_middle_record() {
    let mut cursor = Cursor::new(ids(), "SELECT * FROM T WHERE ID = 2").unwrap();

    assert!(cursor.next().unwrap());
    assert_eq!(cursor.get_int("ID").unwrap(), 2);
    assert!(!cursor.was_null());

    // Record 3 does not match and is the last one.
    assert!(!cursor.next().unwrap());
    assert_eq!(cursor.state(), CursorState::Exhausted);
    assert!(matches!(cursor.next(), Err(Error::NoResult { .. })));
}

#[test]
fn test_match_on_last_record_included_by_default() {
    let mut cursor = Cursor::new(ids(), "SELECT * FROM T WHERE ID = 3").unwrap();

    assert!(cursor.next().unwrap());
    assert_eq!(cursor.get_long("ID").unwrap(), 3);

    // The source has nothing left to read.
    assert!(matches!(cursor.next(), Err(Error::NoResult { .. })));
}

#[test]
fn test_match_on_last_record_excluded_by_legacy_boundary() {
    let mut cursor =
        Cursor::with_config(ids(), "SELECT * FROM T WHERE ID = 3", CursorConfig::legacy()).unwrap();

    assert!(!cursor.next().unwrap());
    assert_eq!(cursor.state(), CursorState::Exhausted);

    let config = CursorConfig::default().with_boundary(RowBoundary::ExcludeLast);
    let mut cursor = Cursor::with_config(ids(), "SELECT * FROM T WHERE ID = 2", config).unwrap();
    assert!(cursor.next().unwrap());
    assert_eq!(cursor.get_short("ID").unwrap(), 2);
    assert!(!cursor.next().unwrap());
}

#[test]
fn test_unfiltered_walk() {
    let mut cursor = Cursor::new(ids(), "select * from T;").unwrap();
    let mut seen = Vec::new();
    while cursor.state() != CursorState::Exhausted && cursor.row_number() < 3 {
        assert!(cursor.next().unwrap());
        seen.push(cursor.get_int(1usize).unwrap());
    }
    assert_eq!(seen, vec![1, 2, 3]);
}

#[test]
fn test_getters_before_first_next_fail() {
    let mut cursor = Cursor::new(ids(), "SELECT ID FROM T").unwrap();
    assert!(matches!(cursor.get_int("ID"), Err(Error::NoResult { .. })));
    assert!(matches!(cursor.get_string("ID"), Err(Error::NoResult { .. })));
    assert!(matches!(cursor.get_date(1usize), Err(Error::NoResult { .. })));
}

#[test]
fn test_numeric_getters_trim() {
    let mut cursor = Cursor::new(cities(), "SELECT * FROM CITIES").unwrap();
    cursor.next().unwrap();

    assert_eq!(cursor.get_int("POP").unwrap(), 42);
    assert_eq!(cursor.get_long("POP").unwrap(), 42);
    assert_eq!(cursor.get_short("POP").unwrap(), 42);
    assert_eq!(cursor.get_double("POP").unwrap(), 42.0);
    assert_eq!(cursor.get_float("AREA").unwrap(), 47.875);
    assert!(!cursor.was_null());
}

#[test]
fn test_big_decimal_rounds_half_even_to_field_scale() {
    let mut cursor = Cursor::new(cities(), "SELECT * FROM CITIES").unwrap();
    cursor.next().unwrap();

    // 47.875 is exact in binary, so this is a genuine midpoint.
    assert_eq!(
        cursor.get_big_decimal("AREA").unwrap(),
        Some(Decimal::from_str("47.88").unwrap())
    );

    #[allow(deprecated)]
    let scaled = cursor.get_big_decimal_with_scale("AREA", 1).unwrap();
    assert_eq!(scaled, Some(Decimal::from_str("47.9").unwrap()));
}

#[test]
fn test_null_values() {
    let mut cursor = Cursor::new(cities(), "SELECT * FROM CITIES").unwrap();
    cursor.next().unwrap();
    cursor.next().unwrap();

    assert_eq!(cursor.get_string("NAME").unwrap(), None);
    assert!(cursor.was_null());

    assert_eq!(cursor.get_string("POP").unwrap(), None);
    assert_eq!(cursor.get_int("POP").unwrap(), 0);
    assert!(cursor.was_null());
    assert_eq!(cursor.get_long("POP").unwrap(), 0);
    assert_eq!(cursor.get_short("POP").unwrap(), 0);
    assert_eq!(cursor.get_float("AREA").unwrap(), 0.0);
    assert_eq!(cursor.get_double("AREA").unwrap(), 0.0);
    assert!(cursor.was_null());

    assert_eq!(cursor.get_big_decimal("AREA").unwrap(), None);
    assert!(cursor.was_null());
    assert_eq!(cursor.get_date("FOUNDED").unwrap(), None);
    assert!(cursor.was_null());
}

#[test]
fn test_dates() {
    let mut cursor = Cursor::new(cities(), "SELECT * FROM CITIES").unwrap();

    cursor.next().unwrap();
    assert_eq!(cursor.get_date("FOUNDED").unwrap(), None);
    assert!(cursor.was_null());

    cursor.next().unwrap();
    cursor.next().unwrap();
    assert!(matches!(
        cursor.get_date("FOUNDED"),
        Err(Error::NotDate { ref value, ref field_type, .. })
            if value == "2023022" && field_type == "D"
    ));

    cursor.next().unwrap();
    assert_eq!(
        cursor.get_date("FOUNDED").unwrap(),
        NaiveDate::from_ymd_opt(2023, 2, 28)
    );
    assert!(!cursor.was_null());
}

#[test]
fn test_column_lookup_failures() {
    let mut cursor = Cursor::new(cities(), "SELECT * FROM CITIES").unwrap();
    cursor.next().unwrap();

    assert!(matches!(
        cursor.get_string("MAYOR"),
        Err(Error::NoSuchField { ref column, .. }) if column == "MAYOR"
    ));
    assert!(matches!(
        cursor.get_string(0usize),
        Err(Error::IllegalColumnIndex { index: 0, column_count: 4 })
    ));
    assert!(matches!(
        cursor.get_string(5usize),
        Err(Error::IllegalColumnIndex { index: 5, .. })
    ));
    assert_eq!(cursor.get_string(1usize).unwrap().as_deref(), Some("Lyon"));
}

#[test]
fn test_not_numeric_carries_text_and_type() {
    let mut cursor = Cursor::new(cities(), "SELECT * FROM CITIES").unwrap();
    cursor.next().unwrap();

    match cursor.get_int("NAME") {
        Err(Error::NotNumeric {
            column,
            field_type,
            value,
        }) => {
            assert_eq!(column, "NAME");
            assert_eq!(field_type, "C");
            assert_eq!(value, "Lyon");
        }
        other => panic!("expected NotNumeric, got {:?}", other),
    }
}

#[test]
fn test_get_string_charset_heuristic() {
    let schema = Schema::new(
        "T",
        vec![FieldDescriptor::new("NAME", FieldType::Character, 20, 0)],
        encoding_rs::WINDOWS_1252,
    );
    let source = MemorySource::new(
        schema,
        vec![
            vec![FieldValue::text("Besançon".as_bytes())],
            vec![FieldValue::text(&b"Besan\xe7on"[..])],
            vec![FieldValue::text(&b"\xc3"[..])],
        ],
    );
    let mut cursor = Cursor::new(source, "SELECT NAME FROM T").unwrap();

    cursor.next().unwrap();
    assert_eq!(cursor.get_string("NAME").unwrap().as_deref(), Some("Besançon"));
    cursor.next().unwrap();
    assert_eq!(cursor.get_string("NAME").unwrap().as_deref(), Some("Besançon"));
    cursor.next().unwrap();
    assert_eq!(cursor.get_string("NAME").unwrap().as_deref(), Some("Ã"));
}

#[test]
fn test_bad_queries_abort_construction() {
    assert!(matches!(
        Cursor::new(ids(), "SELECT * FROM T WHERE ID = 1 AND ID = 2"),
        Err(Error::UnsupportedParsingFeature { .. })
    ));
    assert!(matches!(
        Cursor::new(ids(), "SELECT FROM T"),
        Err(Error::InvalidStatement { .. })
    ));
    assert!(matches!(
        Cursor::new(ids(), "SELECT * FROM T WHERE POP > 1000"),
        Err(Error::NoSuchField { .. })
    ));
}

#[test]
fn test_closed_cursor() {
    let mut cursor = Cursor::new(ids(), "SELECT * FROM T").unwrap();
    cursor.next().unwrap();
    cursor.close();

    assert!(cursor.is_closed());
    assert!(matches!(cursor.next(), Err(Error::ConnectionClosed { .. })));
    assert!(matches!(cursor.get_int("ID"), Err(Error::ConnectionClosed { .. })));
    assert!(matches!(cursor.get_string("ID"), Err(Error::ConnectionClosed { .. })));

    // Closing twice is harmless.
    cursor.close();
}

#[test]
fn test_metadata() {
    let cursor = Cursor::new(cities(), "SELECT * FROM CITIES").unwrap();
    let meta = cursor.metadata();
    assert_eq!(meta.column_count(), 4);
    assert_eq!(meta.column_name(3).unwrap(), "AREA");
    assert_eq!(meta.scale(3).unwrap(), 2);
    assert_eq!(meta.column_type(4).unwrap(), FieldType::Date);
}
