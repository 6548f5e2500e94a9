//! Content categories and the rules that pick one for an element.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What an element may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Content {
    /// Attributes only.
    Empty,
    /// Text only.
    Simple,
    /// Child elements only; whitespace between them is insignificant.
    Complex,
    /// Text and elements. Not supported as such; parsed under generic rules.
    Mixed,
}

impl fmt::Display for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Content::Empty => "empty",
            Content::Simple => "simple",
            Content::Complex => "complex",
            Content::Mixed => "mixed",
        })
    }
}

/// Tag whose content category depends on its attributes.
pub const BARLINE_TAG: &str = "barline";

/// Legacy attribute that turns a `barline` into simple content.
pub const LEGACY_VALUE_ATTRIBUTE: &str = "value";

/// Whitespace lookup table: space, newline, carriage return and tab.
static IS_WHITESPACE: [bool; 256] = {
    let mut lut = [false; 256];
    lut[b' ' as usize] = true;
    lut[b'\t' as usize] = true;
    lut[b'\n' as usize] = true;
    lut[b'\r' as usize] = true;
    lut
};

/// Returns true if the byte is one of the four XML whitespace characters.
#[inline(always)]
pub fn is_whitespace_byte(b: u8) -> bool {
    IS_WHITESPACE[b as usize]
}

/// Returns true if `s` consists only of space, `\n`, `\r` and `\t`.
///
/// The empty string counts as whitespace.
#[inline]
pub fn is_whitespace(s: &str) -> bool {
    s.bytes().all(is_whitespace_byte)
}

/// Applies the attribute-dependent override to a declared category.
///
/// `barline` is declared complex, but real-world documents carry a legacy
/// `value` attribute with text content. Those barlines are read as simple
/// content. Every other tag keeps its declared category.
pub fn effective_content<'a, I>(tag: &str, declared: Content, mut attribute_names: I) -> Content
where
    I: Iterator<Item = &'a str>,
{
    if tag == BARLINE_TAG
        && declared == Content::Complex
        && attribute_names.any(|name| name == LEGACY_VALUE_ATTRIBUTE)
    {
        tracing::debug!(element = tag, "legacy value attribute, reading as simple content");
        return Content::Simple;
    }
    declared
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_set() {
        assert!(is_whitespace(""));
        assert!(is_whitespace(" \n\r\t"));
        assert!(!is_whitespace(" x "));
        // Only the four XML whitespace characters count.
        assert!(!is_whitespace("\u{a0}"));
        assert!(!is_whitespace("\u{0c}"));
    }

    #[test]
    fn test_barline_with_value_is_simple() {
        let names = ["id", "value"];
        assert_eq!(
            effective_content("barline", Content::Complex, names.iter().copied()),
            Content::Simple
        );
    }

    #[test]
    fn test_barline_without_value_stays_complex() {
        let names = ["id", "type"];
        assert_eq!(
            effective_content("barline", Content::Complex, names.iter().copied()),
            Content::Complex
        );
    }

    #[test]
    fn test_other_tags_ignore_value() {
        let names = ["value"];
        assert_eq!(
            effective_content("note", Content::Complex, names.iter().copied()),
            Content::Complex
        );
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Content::Complex).unwrap(), "\"complex\"");
        let parsed: Content = serde_json::from_str("\"empty\"").unwrap();
        assert_eq!(parsed, Content::Empty);
    }
}
