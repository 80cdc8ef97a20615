/// Condition evaluation against the current row
///
/// Comparisons are typed by the column's declared type: numbers compare
/// numerically after trimming, dates as calendar dates, text by exact
/// (not locale-aware) ordering of the charset-resolved string.
use super::ast::{Comparison, Condition, Literal};
use crate::charset::{decode_field_text, decode_legacy};
use crate::coerce::{parse_dbf_date, parse_logical, parse_numeric, NULL_DATE};
use crate::error::{Error, Result};
use crate::row::Row;
use crate::schema::{FieldDescriptor, FieldType};
use chrono::NaiveDate;
use std::cmp::Ordering;

impl Condition {
    /// Whether `row` satisfies the condition.
    pub fn is_verified(&self, row: &Row) -> Result<bool> {
        match self {
            Condition::Comparison(comparison) => comparison.is_verified(row),
        }
    }
}

impl Comparison {
    /// Whether `row` satisfies the comparison.
    ///
    /// Fails `NoSuchField` if the row has no such column, `IllegalParameter`
    /// if the literal does not fit the column type, and
    /// `UnsupportedParsingFeature` if the operator is not defined for it.
    /// A null value never satisfies a comparison.
    pub fn is_verified(&self, row: &Row) -> Result<bool> {
        let schema = row.schema();
        let field = schema.field(&self.column)?;
        let raw = row.get(&self.column)?.as_bytes();

        if self.literal == Literal::Null {
            return Err(self.illegal(field, "NULL cannot be compared, IS NULL is not supported"));
        }

        let ordering = match field.field_type() {
            FieldType::Numeric | FieldType::Float => {
                let literal = self.numeric_literal(field)?;
                let text = raw.map(|bytes| decode_legacy(bytes, schema.charset()));
                parse_numeric::<f64>(text.as_deref(), field)?
                    .and_then(|value| value.partial_cmp(&literal))
            }
            FieldType::Date => {
                let literal = self.date_literal(field)?;
                let text = raw.map(|bytes| decode_legacy(bytes, schema.charset()));
                parse_dbf_date(text.as_deref(), field)?.map(|value| value.cmp(&literal))
            }
            FieldType::Character => {
                let literal = self.text_literal(field)?;
                raw.map(|bytes| {
                    decode_field_text(bytes, schema.charset())
                        .text
                        .as_str()
                        .cmp(literal.as_str())
                })
            }
            FieldType::Logical => {
                if !self.operator.is_equality() {
                    return Err(self.unsupported(field));
                }
                let literal = self.logical_literal(field)?;
                raw.and_then(|bytes| parse_logical(&decode_legacy(bytes, schema.charset())))
                    .map(|value| value.cmp(&literal))
            }
            FieldType::Memo | FieldType::Other(_) => return Err(self.unsupported(field)),
        };

        Ok(ordering.is_some_and(|o: Ordering| self.operator.accepts(o)))
    }

    fn numeric_literal(&self, field: &FieldDescriptor) -> Result<f64> {
        match &self.literal {
            Literal::Integer(i) => Ok(*i as f64),
            Literal::Float(f) => Ok(*f),
            Literal::String(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| self.illegal(field, "not a number")),
            _ => Err(self.illegal(field, "not a number")),
        }
    }

    fn date_literal(&self, field: &FieldDescriptor) -> Result<NaiveDate> {
        let text = match &self.literal {
            Literal::String(s) => s.clone(),
            Literal::Integer(i) => i.to_string(),
            _ => return Err(self.illegal(field, "expected a YYYYMMDD date")),
        };

        if text == NULL_DATE {
            return Err(self.illegal(field, "the null date cannot be compared"));
        }

        parse_dbf_date(Some(&text), field)
            .ok()
            .flatten()
            .ok_or_else(|| self.illegal(field, "expected a YYYYMMDD date"))
    }

    fn text_literal(&self, field: &FieldDescriptor) -> Result<String> {
        match &self.literal {
            Literal::String(s) => Ok(s.clone()),
            Literal::Integer(i) => Ok(i.to_string()),
            Literal::Float(f) => Ok(f.to_string()),
            _ => Err(self.illegal(field, "expected a string")),
        }
    }

    fn logical_literal(&self, field: &FieldDescriptor) -> Result<bool> {
        match &self.literal {
            Literal::Boolean(b) => Ok(*b),
            Literal::String(s) => parse_logical(s).ok_or_else(|| self.illegal(field, "expected T or F")),
            _ => Err(self.illegal(field, "expected TRUE or FALSE")),
        }
    }

    fn illegal(&self, field: &FieldDescriptor, reason: &str) -> Error {
        Error::IllegalParameter {
            column: self.column.clone(),
            field_type: field.field_type().to_string(),
            literal: self.literal.to_string(),
            reason: reason.to_string(),
        }
    }

    fn unsupported(&self, field: &FieldDescriptor) -> Error {
        Error::UnsupportedParsingFeature {
            sql: self.to_string(),
            feature: format!(
                "operator {} on a field of type {}",
                self.operator,
                field.field_type()
            ),
        }
    }
}
