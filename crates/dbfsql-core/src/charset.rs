//! Text decoding for legacy field bytes.
//!
//! dBase III predates reliable encoding declarations: a table declares a
//! single-byte code page, yet many files carry UTF-8 text written by newer
//! tools. [`decode_field_text`] guesses which of the two readings is right.
//! It is a heuristic, not a guarantee: nothing in the file says which
//! encoding a given value was really written in.

use encoding_rs::{Encoding, UTF_8};
use std::borrow::Cow;
use tracing::trace;

/// A decoded field value and the encoding that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedText {
    pub text: String,
    pub encoding: &'static Encoding,
}

/// Decode `bytes` with the table's legacy charset only.
pub fn decode_legacy<'a>(bytes: &'a [u8], legacy: &'static Encoding) -> Cow<'a, str> {
    let (text, _had_errors) = legacy.decode_without_bom_handling(bytes);
    text
}

/// Decode `bytes` with both the legacy charset and UTF-8 and pick one.
///
/// The UTF-8 reading wins only when it has no replacement character and is
/// strictly shorter, in characters, than the legacy reading. A shorter
/// result means multi-byte sequences were folded into single characters,
/// which a single-byte charset never does. In every other case the legacy
/// reading is returned; this never fails.
pub fn decode_field_text(bytes: &[u8], legacy: &'static Encoding) -> DecodedText {
    let with_legacy = decode_legacy(bytes, legacy);
    let (with_utf8, utf8_errors) = UTF_8.decode_without_bom_handling(bytes);

    let unsure = utf8_errors
        || with_utf8.contains(char::REPLACEMENT_CHARACTER)
        || with_utf8.chars().count() >= with_legacy.chars().count();

    if unsure {
        DecodedText {
            text: with_legacy.into_owned(),
            encoding: legacy,
        }
    } else {
        trace!(legacy = legacy.name(), text = %with_utf8, "field text reads as UTF-8");
        DecodedText {
            text: with_utf8.into_owned(),
            encoding: UTF_8,
        }
    }
}
