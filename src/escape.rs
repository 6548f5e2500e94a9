//! Markup escaping for text content and attribute values.
//!
//! Text content escapes `<`, `>` and `&`; attribute values additionally
//! escape `"` because the writer always quotes with double quotes. Braille
//! cells and other non-ASCII characters pass through untouched.

use memchr::{memchr, memchr3};
use std::borrow::Cow;

/// Escapes character data for use between tags.
#[inline]
pub fn escape_text(s: &str) -> Cow<'_, str> {
    if memchr3(b'<', b'>', b'&', s.as_bytes()).is_none() {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + s.len() / 8);
    escape_into(s, false, &mut out);
    Cow::Owned(out)
}

/// Escapes an attribute value for use inside double quotes.
#[inline]
pub fn escape_attribute(s: &str) -> Cow<'_, str> {
    let bytes = s.as_bytes();
    if memchr3(b'<', b'>', b'&', bytes).is_none() && memchr(b'"', bytes).is_none() {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + s.len() / 8);
    escape_into(s, true, &mut out);
    Cow::Owned(out)
}

fn escape_into(s: &str, quotes: bool, out: &mut String) {
    let mut start = 0;
    for (i, byte) in s.bytes().enumerate() {
        let replacement = match byte {
            b'<' => "&lt;",
            b'>' => "&gt;",
            b'&' => "&amp;",
            b'"' if quotes => "&quot;",
            _ => continue,
        };
        // Every replaced byte is ASCII, so `i` is always a char boundary.
        out.push_str(&s[start..i]);
        out.push_str(replacement);
        start = i + 1;
    }
    out.push_str(&s[start..]);
}

/// Error type for unescape operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnescapeError {
    /// The invalid entity that caused the error.
    pub entity: String,
    /// Byte position of the `&` in the input.
    pub position: usize,
}

impl std::fmt::Display for UnescapeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid XML entity '{}' at position {}", self.entity, self.position)
    }
}

impl std::error::Error for UnescapeError {}

/// Resolves predefined and numeric entity references.
///
/// Returns the input unchanged (borrowed) when it contains no `&`.
pub fn unescape(s: &str) -> Result<Cow<'_, str>, UnescapeError> {
    let Some(first) = memchr(b'&', s.as_bytes()) else {
        return Ok(Cow::Borrowed(s));
    };

    let mut out = String::with_capacity(s.len());
    out.push_str(&s[..first]);
    let mut rest = &s[first..];
    let mut offset = first;

    while let Some(amp) = memchr(b'&', rest.as_bytes()) {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        let invalid = |entity: &str| UnescapeError {
            entity: entity.to_string(),
            position: offset + amp,
        };

        let len = match memchr(b';', after.as_bytes()) {
            Some(len) if len > 0 => len,
            _ => return Err(invalid("&")),
        };
        let name = &after[..len];
        match decode_entity(name) {
            Some(c) => out.push(c),
            None => return Err(invalid(&format!("&{};", name))),
        }

        let consumed = amp + 1 + len + 1;
        offset += consumed;
        rest = &rest[consumed..];
    }
    out.push_str(rest);

    Ok(Cow::Owned(out))
}

/// Decodes `lt`, `gt`, `amp`, `quot`, `apos`, `#NNN` and `#xHHH`.
fn decode_entity(name: &str) -> Option<char> {
    match name {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let digits = name.strip_prefix('#')?;
            let code = match digits.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => digits.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_text_borrows_when_clean() {
        let s = "⠼⠁⠃ braille";
        assert!(matches!(escape_text(s), Cow::Borrowed(_)));
    }

    #[test]
    fn test_escape_text_keeps_quotes() {
        assert_eq!(escape_text("a < b & \"c\""), "a &lt; b &amp; \"c\"");
    }

    #[test]
    fn test_escape_attribute_quotes() {
        assert_eq!(escape_attribute("say \"hi\" <now>"), "say &quot;hi&quot; &lt;now&gt;");
    }

    #[test]
    fn test_escape_non_ascii_neighbours() {
        assert_eq!(escape_text("⠿&⠿"), "⠿&amp;⠿");
    }

    #[test]
    fn test_unescape_predefined() {
        assert_eq!(unescape("&lt;&gt;&amp;&quot;&apos;").unwrap(), "<>&\"'");
    }

    #[test]
    fn test_unescape_numeric() {
        assert_eq!(unescape("&#65;&#x2801;").unwrap(), "A⠁");
    }

    #[test]
    fn test_unescape_borrowed_without_entities() {
        assert!(matches!(unescape("plain").unwrap(), Cow::Borrowed(_)));
    }

    #[test]
    fn test_unescape_invalid_entity_position() {
        let err = unescape("ab&bogus;").unwrap_err();
        assert_eq!(err.entity, "&bogus;");
        assert_eq!(err.position, 2);
    }

    #[test]
    fn test_unescape_unterminated() {
        assert!(unescape("x &lt").is_err());
    }

    #[test]
    fn test_text_roundtrip() {
        let original = "<note> & ⠙";
        assert_eq!(unescape(&escape_text(original)).unwrap(), original);
    }
}
