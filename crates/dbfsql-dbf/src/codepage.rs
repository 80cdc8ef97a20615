// Code page resolution for dBase tables
//
// A table's text encoding is taken from, in order:
// 1. an encoding the caller forces
// 2. the `.cpg` side file shapefile tools write next to the table
// 3. the language driver id byte of the header
// 4. windows-1252

use encoding_rs::{
    Encoding, BIG5, EUC_KR, GBK, IBM866, MACINTOSH, SHIFT_JIS, UTF_8, WINDOWS_1250, WINDOWS_1251,
    WINDOWS_1252, WINDOWS_1253, WINDOWS_1254, WINDOWS_1255, WINDOWS_1256, WINDOWS_1257,
    WINDOWS_874, X_MAC_CYRILLIC,
};

/// Where a table's encoding came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingOrigin {
    /// Forced by the caller
    Explicit,
    /// Read from the `.cpg` side file
    CodePageFile,
    /// Mapped from the header's language driver id
    LanguageDriver,
    /// Nothing declared one
    Default,
}

/// Map a dBase language driver id to an encoding.
///
/// DOS code pages other than 866 have no counterpart in the WHATWG
/// encodings and map to `None`.
pub fn encoding_for_language_driver(id: u8) -> Option<&'static Encoding> {
    match id {
        0x03 | 0x57 | 0x58 | 0x59 => Some(WINDOWS_1252),
        0x04 => Some(MACINTOSH),
        0x13 | 0x7B => Some(SHIFT_JIS),
        0x26 | 0x65 => Some(IBM866),
        0x4D | 0x7A => Some(GBK),
        0x4E | 0x79 => Some(EUC_KR),
        0x4F | 0x78 => Some(BIG5),
        0x50 | 0x7C => Some(WINDOWS_874),
        0x7D => Some(WINDOWS_1255),
        0x7E => Some(WINDOWS_1256),
        0x96 => Some(X_MAC_CYRILLIC),
        0xC8 => Some(WINDOWS_1250),
        0xC9 => Some(WINDOWS_1251),
        0xCA => Some(WINDOWS_1254),
        0xCB => Some(WINDOWS_1253),
        0xCC => Some(WINDOWS_1257),
        _ => None,
    }
}

/// Map the content of a `.cpg` file to an encoding.
///
/// Accepts WHATWG labels (`UTF-8`, `cp1252`, `iso-8859-2`) as well as the
/// bare or prefixed code page numbers ESRI tools write (`1252`,
/// `ANSI 1251`, `88591`).
pub fn encoding_for_code_page_label(label: &str) -> Option<&'static Encoding> {
    let label = label.trim();
    if label.is_empty() {
        return None;
    }
    if let Some(encoding) = Encoding::for_label(label.as_bytes()) {
        return Some(encoding);
    }

    let digits: String = label.chars().filter(char::is_ascii_digit).collect();
    match digits.as_str() {
        "65001" => Some(UTF_8),
        "866" => Some(IBM866),
        "874" => Some(WINDOWS_874),
        "932" => Some(SHIFT_JIS),
        "936" => Some(GBK),
        "949" => Some(EUC_KR),
        "950" => Some(BIG5),
        d if d.len() == 4 && d.starts_with("125") => {
            Encoding::for_label(format!("windows-{}", d).as_bytes())
        }
        d if d.len() > 4 && d.starts_with("8859") => {
            Encoding::for_label(format!("iso-8859-{}", &d[4..]).as_bytes())
        }
        _ => None,
    }
}

/// Pick the encoding of a table.
pub fn resolve_encoding(
    explicit: Option<&'static Encoding>,
    code_page_file: Option<&str>,
    language_driver: u8,
) -> (&'static Encoding, EncodingOrigin) {
    if let Some(encoding) = explicit {
        return (encoding, EncodingOrigin::Explicit);
    }
    if let Some(encoding) = code_page_file.and_then(encoding_for_code_page_label) {
        return (encoding, EncodingOrigin::CodePageFile);
    }
    if let Some(encoding) = encoding_for_language_driver(language_driver) {
        return (encoding, EncodingOrigin::LanguageDriver);
    }
    (WINDOWS_1252, EncodingOrigin::Default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::ISO_8859_2;

    #[test]
    fn test_code_page_labels() {
        assert_eq!(encoding_for_code_page_label("UTF-8\r\n"), Some(UTF_8));
        assert_eq!(encoding_for_code_page_label("cp1252"), Some(WINDOWS_1252));
        assert_eq!(encoding_for_code_page_label("1251"), Some(WINDOWS_1251));
        assert_eq!(encoding_for_code_page_label("ANSI 1250"), Some(WINDOWS_1250));
        assert_eq!(encoding_for_code_page_label("88592"), Some(ISO_8859_2));
        assert_eq!(encoding_for_code_page_label("866"), Some(IBM866));
        assert_eq!(encoding_for_code_page_label("437"), None);
        assert_eq!(encoding_for_code_page_label("   "), None);
    }

    #[test]
    fn test_language_driver_ids() {
        assert_eq!(encoding_for_language_driver(0x57), Some(WINDOWS_1252));
        assert_eq!(encoding_for_language_driver(0xC9), Some(WINDOWS_1251));
        assert_eq!(encoding_for_language_driver(0x26), Some(IBM866));
        assert_eq!(encoding_for_language_driver(0x00), None);
        // Code page 437 is not available.
        assert_eq!(encoding_for_language_driver(0x01), None);
    }

    #[test]
    fn test_resolution_order() {
        assert_eq!(
            resolve_encoding(Some(IBM866), Some("UTF-8"), 0xC9),
            (IBM866, EncodingOrigin::Explicit)
        );
        assert_eq!(
            resolve_encoding(None, Some("UTF-8"), 0xC9),
            (UTF_8, EncodingOrigin::CodePageFile)
        );
        assert_eq!(
            resolve_encoding(None, Some("no such code page"), 0xC9),
            (WINDOWS_1251, EncodingOrigin::LanguageDriver)
        );
        assert_eq!(
            resolve_encoding(None, None, 0x00),
            (WINDOWS_1252, EncodingOrigin::Default)
        );
    }
}
