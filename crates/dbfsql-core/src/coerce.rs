//! Conversions from raw column text to typed values.

use crate::error::{Error, Result};
use crate::schema::FieldDescriptor;
use chrono::NaiveDate;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Value stored by dBase for a date that was never set.
pub const NULL_DATE: &str = "00000000";

/// Trim `text` and parse it as `T`.
///
/// Returns `Ok(None)` for a null value. Any parse failure is reported as
/// `NotNumeric` with the untrimmed text and the field's declared type.
pub fn parse_numeric<T: FromStr>(text: Option<&str>, field: &FieldDescriptor) -> Result<Option<T>> {
    let Some(text) = text else {
        return Ok(None);
    };

    text.trim()
        .parse::<T>()
        .map(Some)
        .map_err(|_| Error::NotNumeric {
            column: field.name().to_string(),
            field_type: field.field_type().to_string(),
            value: text.to_string(),
        })
}

/// Parse a dBase `YYYYMMDD` date.
///
/// `"00000000"` is the null sentinel and yields `Ok(None)`, as does a null
/// value. Anything that is not eight digits forming a real calendar date
/// fails `NotDate`.
pub fn parse_dbf_date(text: Option<&str>, field: &FieldDescriptor) -> Result<Option<NaiveDate>> {
    let Some(text) = text else {
        return Ok(None);
    };

    if text == NULL_DATE {
        return Ok(None);
    }

    let not_a_date = || Error::NotDate {
        column: field.name().to_string(),
        field_type: field.field_type().to_string(),
        value: text.to_string(),
    };

    if text.len() != 8 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(not_a_date());
    }

    let year = text[0..4].parse::<i32>().map_err(|_| not_a_date())?;
    let month = text[4..6].parse::<u32>().map_err(|_| not_a_date())?;
    let day = text[6..8].parse::<u32>().map_err(|_| not_a_date())?;

    NaiveDate::from_ymd_opt(year, month, day)
        .map(Some)
        .ok_or_else(not_a_date)
}

/// Convert `value` to a decimal with `scale` fractional digits, rounding
/// half to even.
pub fn to_decimal(value: f64, scale: u32, field: &FieldDescriptor) -> Result<Decimal> {
    Decimal::from_f64(value)
        .map(|d| d.round_dp_with_strategy(scale, RoundingStrategy::MidpointNearestEven))
        .ok_or_else(|| Error::NotNumeric {
            column: field.name().to_string(),
            field_type: field.field_type().to_string(),
            value: value.to_string(),
        })
}

/// Parse a dBase logical flag. `?` and blanks are null.
pub fn parse_logical(text: &str) -> Option<bool> {
    match text.trim() {
        "T" | "t" | "Y" | "y" => Some(true),
        "F" | "f" | "N" | "n" => Some(false),
        _ => None,
    }
}
