//! Low-level XML tokenizer implementing [`EventSource`].
//!
//! The reader is content-directed: after a start tag the parser announces
//! the element's content category with [`EventSource::set_content`]. Inside
//! complex or empty content, whitespace-only runs are dropped here; inside
//! simple, mixed or undeclared content they are reported verbatim so text
//! survives a round trip byte for byte.

use crate::content::{is_whitespace, is_whitespace_byte, Content};
use crate::error::{Error, ErrorKind, Position, Result};
use crate::escape::unescape;
use crate::event::{Attribute, Event, EventSource};
use memchr::{memchr, memchr3};
use std::borrow::Cow;

/// Name start character lookup table.
static IS_NAME_START: [bool; 256] = {
    let mut lut = [false; 256];
    let mut i = b'A';
    while i <= b'Z' {
        lut[i as usize] = true;
        i += 1;
    }
    let mut i = b'a';
    while i <= b'z' {
        lut[i as usize] = true;
        i += 1;
    }
    lut[b'_' as usize] = true;
    lut[b':' as usize] = true;
    // Allow high bytes for UTF-8
    let mut i: usize = 0x80;
    while i < 256 {
        lut[i] = true;
        i += 1;
    }
    lut
};

/// Name character lookup table.
static IS_NAME_CHAR: [bool; 256] = {
    let mut lut = IS_NAME_START;
    let mut i = b'0';
    while i <= b'9' {
        lut[i as usize] = true;
        i += 1;
    }
    lut[b'-' as usize] = true;
    lut[b'.' as usize] = true;
    lut
};

/// An element whose start tag has been read but not its end tag.
#[derive(Debug)]
struct OpenElement<'a> {
    name: &'a str,
    content: Content,
}

/// A zero-copy XML tokenizer over an in-memory document.
pub struct XmlReader<'a> {
    input: &'a [u8],
    pos: usize,
    line: usize,
    col: usize,
    open: Vec<OpenElement<'a>>,
    /// End event owed for a self-closing tag.
    pending_end: Option<&'a str>,
}

impl<'a> XmlReader<'a> {
    /// Creates a new XML reader from a string.
    #[inline]
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &'a str) -> Self {
        Self::from_bytes(s.as_bytes())
    }

    /// Creates a new XML reader from bytes. A leading UTF-8 byte order mark
    /// is skipped.
    #[inline]
    pub fn from_bytes(input: &'a [u8]) -> Self {
        let input = input.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(input);
        Self {
            input,
            pos: 0,
            line: 1,
            col: 1,
            open: Vec::with_capacity(16),
            pending_end: None,
        }
    }

    /// Returns the current position in the input.
    #[inline]
    pub fn position(&self) -> Position {
        Position {
            line: self.line,
            column: self.col,
            offset: self.pos,
        }
    }

    /// Returns the number of open elements.
    #[inline]
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Reads the next event.
    pub fn next_event(&mut self) -> Result<Event<'a>> {
        if let Some(name) = self.pending_end.take() {
            self.open.pop();
            return Ok(Event::EndElement {
                name: Cow::Borrowed(name),
            });
        }

        loop {
            if self.pos >= self.input.len() {
                if let Some(open) = self.open.pop() {
                    return Err(Error::unclosed_tag(open.name).with_position(self.position()));
                }
                return Ok(Event::Eof);
            }

            if self.input[self.pos] == b'<' {
                return self.read_tag();
            }
            if let Some(event) = self.read_text()? {
                return Ok(event);
            }
        }
    }

    /// Whether whitespace-only text at the current depth is insignificant.
    #[inline]
    fn drops_whitespace(&self) -> bool {
        match self.open.last() {
            None => true,
            Some(open) => matches!(open.content, Content::Complex | Content::Empty),
        }
    }

    /// Reads character data up to the next `<`. Returns `None` when the run
    /// was insignificant whitespace.
    fn read_text(&mut self) -> Result<Option<Event<'a>>> {
        let start = self.pos;
        let end = match memchr(b'<', &self.input[self.pos..]) {
            Some(offset) => self.pos + offset,
            None => self.input.len(),
        };
        self.update_position_for_range(start, end);
        self.pos = end;

        let text = std::str::from_utf8(&self.input[start..end])
            .map_err(|_| Error::new(ErrorKind::InvalidUtf8).with_position(self.position()))?;

        if is_whitespace(text) && self.drops_whitespace() {
            return Ok(None);
        }

        match unescape(text) {
            Ok(unescaped) => Ok(Some(Event::Characters(unescaped))),
            Err(e) => Err(Error::invalid_escape(e.entity).with_position(self.position())),
        }
    }

    /// Updates line/column tracking for a range of bytes.
    #[inline(always)]
    fn update_position_for_range(&mut self, start: usize, end: usize) {
        for &b in &self.input[start..end] {
            if b == b'\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
        }
    }

    /// Fast whitespace skipping inside tags.
    #[inline(always)]
    fn skip_whitespace(&mut self) {
        while self.pos < self.input.len() && is_whitespace_byte(self.input[self.pos]) {
            if self.input[self.pos] == b'\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
            self.pos += 1;
        }
    }

    /// Reads a tag (element, comment, CDATA, PI, or declaration).
    fn read_tag(&mut self) -> Result<Event<'a>> {
        debug_assert_eq!(self.input[self.pos], b'<');
        self.pos += 1;
        self.col += 1;

        if self.pos >= self.input.len() {
            return Err(Error::unexpected_eof().with_position(self.position()));
        }

        match self.input[self.pos] {
            b'/' => self.read_end_element(),
            b'?' => self.read_processing_instruction(),
            b'!' => self.read_special(),
            _ => self.read_start_element(),
        }
    }

    /// Reads a start tag. A self-closing tag also queues its end event.
    fn read_start_element(&mut self) -> Result<Event<'a>> {
        let name = self.read_name()?;
        let attributes = self.read_attributes()?;

        self.skip_whitespace();

        if self.pos >= self.input.len() {
            return Err(Error::unexpected_eof().with_position(self.position()));
        }

        let self_closing = match self.input[self.pos] {
            b'/' => {
                self.pos += 1;
                self.col += 1;
                self.expect_char(b'>')?;
                true
            }
            b'>' => {
                self.pos += 1;
                self.col += 1;
                false
            }
            _ => return Err(Error::syntax("expected '>' or '/>'").with_position(self.position())),
        };

        self.open.push(OpenElement {
            name,
            content: Content::Mixed,
        });
        if self_closing {
            self.pending_end = Some(name);
        }

        Ok(Event::StartElement {
            name: Cow::Borrowed(name),
            attributes,
        })
    }

    /// Reads an end tag. Name matching is left to the consumer.
    fn read_end_element(&mut self) -> Result<Event<'a>> {
        debug_assert_eq!(self.input[self.pos], b'/');
        self.pos += 1;
        self.col += 1;

        let name = self.read_name()?;
        self.skip_whitespace();
        self.expect_char(b'>')?;

        if self.open.pop().is_none() {
            return Err(Error::syntax(format!("unexpected closing tag: {}", name))
                .with_position(self.position()));
        }

        Ok(Event::EndElement {
            name: Cow::Borrowed(name),
        })
    }

    /// Reads a processing instruction.
    fn read_processing_instruction(&mut self) -> Result<Event<'a>> {
        debug_assert_eq!(self.input[self.pos], b'?');
        self.pos += 1;
        self.col += 1;

        let target = self.read_name()?;

        if target.eq_ignore_ascii_case("xml") {
            return self.read_xml_decl();
        }

        self.skip_whitespace();
        let data_start = self.pos;

        while let Some(offset) = memchr(b'?', &self.input[self.pos..]) {
            let check_pos = self.pos + offset;
            if self.input.get(check_pos + 1) == Some(&b'>') {
                self.update_position_for_range(self.pos, check_pos);
                let data = std::str::from_utf8(&self.input[data_start..check_pos])
                    .map_err(|_| Error::new(ErrorKind::InvalidUtf8))?
                    .trim();
                self.pos = check_pos + 2;
                self.col += 2;
                return Ok(Event::ProcessingInstruction {
                    target: Cow::Borrowed(target),
                    data: (!data.is_empty()).then_some(Cow::Borrowed(data)),
                });
            }
            self.update_position_for_range(self.pos, check_pos + 1);
            self.pos = check_pos + 1;
        }

        Err(Error::syntax("unterminated processing instruction").with_position(self.position()))
    }

    /// Reads an XML declaration.
    fn read_xml_decl(&mut self) -> Result<Event<'a>> {
        let attributes = self.read_attributes()?;
        self.skip_whitespace();

        if !self.input[self.pos..].starts_with(b"?>") {
            return Err(Error::syntax("expected '?>'").with_position(self.position()));
        }
        self.pos += 2;
        self.col += 2;

        let mut version = None;
        let mut encoding = None;
        for attr in attributes {
            match attr.name.as_ref() {
                "version" => version = Some(attr.value),
                "encoding" => encoding = Some(attr.value),
                _ => {}
            }
        }

        Ok(Event::XmlDecl {
            version: version.unwrap_or(Cow::Borrowed("1.0")),
            encoding,
        })
    }

    /// Reads special constructs (comments, CDATA, DOCTYPE).
    fn read_special(&mut self) -> Result<Event<'a>> {
        debug_assert_eq!(self.input[self.pos], b'!');
        self.pos += 1;
        self.col += 1;

        let rest = &self.input[self.pos..];
        if rest.starts_with(b"--") {
            self.pos += 2;
            self.col += 2;
            let body = self.read_until(b"-->", "unterminated comment")?;
            return Ok(Event::Comment(Cow::Borrowed(body.trim())));
        }
        if rest.starts_with(b"[CDATA[") {
            self.pos += 7;
            self.col += 7;
            let body = self.read_until(b"]]>", "unterminated CDATA section")?;
            return Ok(Event::CData(Cow::Borrowed(body)));
        }
        if rest.starts_with(b"DOCTYPE") {
            return self.skip_doctype();
        }

        Err(Error::syntax("unknown construct after '<!'").with_position(self.position()))
    }

    /// Returns the text before `terminator` and moves past it.
    fn read_until(&mut self, terminator: &[u8], what: &str) -> Result<&'a str> {
        let start = self.pos;
        let input = self.input;
        let mut search = self.pos;

        while let Some(offset) = memchr(terminator[0], &input[search..]) {
            let candidate = search + offset;
            if input[candidate..].starts_with(terminator) {
                self.update_position_for_range(start, candidate);
                self.pos = candidate + terminator.len();
                self.col += terminator.len();
                return std::str::from_utf8(&input[start..candidate])
                    .map_err(|_| Error::new(ErrorKind::InvalidUtf8).with_position(self.position()));
            }
            search = candidate + 1;
        }

        Err(Error::syntax(what).with_position(self.position()))
    }

    /// Skips a DOCTYPE declaration, including an internal subset.
    fn skip_doctype(&mut self) -> Result<Event<'a>> {
        let mut depth = 1;

        while self.pos < self.input.len() && depth > 0 {
            if let Some(offset) = memchr3(b'<', b'>', b'"', &self.input[self.pos..]) {
                let apostrophe = memchr(b'\'', &self.input[self.pos..self.pos + offset]);
                let offset = apostrophe.unwrap_or(offset);
                self.update_position_for_range(self.pos, self.pos + offset);
                self.pos += offset;

                match self.input[self.pos] {
                    b'<' => depth += 1,
                    b'>' => depth -= 1,
                    quote => {
                        // Literals may hold '<' and '>'.
                        let start = self.pos + 1;
                        let end = memchr(quote, &self.input[start..])
                            .map_or(self.input.len() - 1, |len| start + len);
                        self.update_position_for_range(self.pos, end);
                        self.pos = end;
                    }
                }
                self.col += 1;
                self.pos += 1;
            } else {
                self.update_position_for_range(self.pos, self.input.len());
                self.pos = self.input.len();
            }
        }

        self.next_event()
    }

    /// Reads an XML name using lookup table.
    #[inline]
    fn read_name(&mut self) -> Result<&'a str> {
        let start = self.pos;

        if self.pos >= self.input.len() {
            return Err(Error::unexpected_eof().with_position(self.position()));
        }

        let first = self.input[self.pos];
        if !IS_NAME_START[first as usize] {
            return Err(Error::invalid_name(format!(
                "invalid name start character: {:?}",
                first as char
            ))
            .with_position(self.position()));
        }
        self.pos += 1;
        self.col += 1;

        while self.pos < self.input.len() && IS_NAME_CHAR[self.input[self.pos] as usize] {
            self.pos += 1;
            self.col += 1;
        }

        std::str::from_utf8(&self.input[start..self.pos])
            .map_err(|_| Error::new(ErrorKind::InvalidUtf8).with_position(self.position()))
    }

    /// Reads element attributes, rejecting duplicates.
    fn read_attributes(&mut self) -> Result<Vec<Attribute<'a>>> {
        let mut attributes: Vec<Attribute<'a>> = Vec::with_capacity(4);

        loop {
            self.skip_whitespace();

            if self.pos >= self.input.len() {
                break;
            }

            let c = self.input[self.pos];
            if c == b'>' || c == b'/' || c == b'?' {
                break;
            }

            let name = self.read_name()?;
            self.skip_whitespace();
            self.expect_char(b'=')?;
            self.skip_whitespace();
            let value = self.read_attribute_value()?;

            if attributes.iter().any(|a| a.name == name) {
                return Err(Error::syntax(format!("duplicate attribute: {}", name))
                    .with_position(self.position()));
            }
            attributes.push(Attribute {
                name: Cow::Borrowed(name),
                value,
            });
        }

        Ok(attributes)
    }

    /// Reads a quoted attribute value.
    fn read_attribute_value(&mut self) -> Result<Cow<'a, str>> {
        if self.pos >= self.input.len() {
            return Err(Error::unexpected_eof().with_position(self.position()));
        }

        let quote = self.input[self.pos];
        if quote != b'"' && quote != b'\'' {
            return Err(Error::syntax("expected quote").with_position(self.position()));
        }
        self.pos += 1;
        self.col += 1;

        let start = self.pos;
        let offset = memchr(quote, &self.input[start..]).ok_or_else(|| {
            Error::syntax("unterminated attribute value").with_position(self.position())
        })?;

        let value = std::str::from_utf8(&self.input[start..start + offset])
            .map_err(|_| Error::new(ErrorKind::InvalidUtf8).with_position(self.position()))?;
        self.update_position_for_range(start, start + offset + 1);
        self.pos = start + offset + 1;

        unescape(value).map_err(|e| Error::invalid_escape(e.entity).with_position(self.position()))
    }

    /// Expects a specific character.
    #[inline(always)]
    fn expect_char(&mut self, expected: u8) -> Result<()> {
        if self.pos >= self.input.len() {
            return Err(Error::unexpected_eof().with_position(self.position()));
        }

        if self.input[self.pos] != expected {
            return Err(Error::syntax(format!(
                "expected '{}', found '{}'",
                expected as char, self.input[self.pos] as char
            ))
            .with_position(self.position()));
        }

        self.pos += 1;
        self.col += 1;
        Ok(())
    }
}

impl<'a> EventSource<'a> for XmlReader<'a> {
    fn next_event(&mut self) -> Result<Event<'a>> {
        XmlReader::next_event(self)
    }

    fn set_content(&mut self, content: Content) {
        if let Some(open) = self.open.last_mut() {
            open.content = content;
        }
    }

    fn position(&self) -> Option<Position> {
        Some(XmlReader::position(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start_name<'a>(event: Event<'a>) -> Cow<'a, str> {
        match event {
            Event::StartElement { name, .. } => name,
            other => panic!("expected StartElement, got {:?}", other),
        }
    }

    #[test]
    fn test_self_closing_expands() {
        let mut reader = XmlReader::from_str(r#"<note_ref id="n1"/>"#);

        match reader.next_event().unwrap() {
            Event::StartElement { name, attributes } => {
                assert_eq!(name, "note_ref");
                assert_eq!(attributes, vec![Attribute::new("id", "n1")]);
            }
            other => panic!("expected StartElement, got {:?}", other),
        }
        assert_eq!(reader.depth(), 1);
        assert_eq!(
            reader.next_event().unwrap(),
            Event::EndElement { name: Cow::Borrowed("note_ref") }
        );
        assert_eq!(reader.depth(), 0);
        assert_eq!(reader.next_event().unwrap(), Event::Eof);
    }

    #[test]
    fn test_text_is_verbatim() {
        let mut reader = XmlReader::from_str("<generic_text>  two  words </generic_text>");
        reader.next_event().unwrap();
        reader.set_content(Content::Simple);
        assert_eq!(
            reader.next_event().unwrap(),
            Event::Characters(Cow::Borrowed("  two  words "))
        );
    }

    #[test]
    fn test_complex_content_drops_whitespace() {
        let mut reader = XmlReader::from_str("<score>\n  <score_data/>\n</score>");
        assert_eq!(start_name(reader.next_event().unwrap()), "score");
        reader.set_content(Content::Complex);
        assert_eq!(start_name(reader.next_event().unwrap()), "score_data");
        reader.next_event().unwrap(); // </score_data>
        assert_eq!(
            reader.next_event().unwrap(),
            Event::EndElement { name: Cow::Borrowed("score") }
        );
    }

    #[test]
    fn test_undeclared_content_keeps_whitespace() {
        let mut reader = XmlReader::from_str("<x> </x>");
        reader.next_event().unwrap();
        assert_eq!(reader.next_event().unwrap(), Event::Characters(Cow::Borrowed(" ")));
    }

    #[test]
    fn test_prolog_whitespace_is_dropped() {
        let mut reader = XmlReader::from_str("\n\n  <score/>\n");
        assert_eq!(start_name(reader.next_event().unwrap()), "score");
        reader.next_event().unwrap();
        assert_eq!(reader.next_event().unwrap(), Event::Eof);
    }

    #[test]
    fn test_escaped_text_and_attribute() {
        let mut reader = XmlReader::from_str(r#"<name value="a &amp; b">&lt;x&gt;</name>"#);
        match reader.next_event().unwrap() {
            Event::StartElement { attributes, .. } => assert_eq!(attributes[0].value, "a & b"),
            other => panic!("expected StartElement, got {:?}", other),
        }
        assert_eq!(reader.next_event().unwrap(), Event::Characters(Cow::Borrowed("<x>")));
    }

    #[test]
    fn test_xml_declaration() {
        let mut reader = XmlReader::from_str(r#"<?xml version="1.0" encoding="UTF-8"?><score/>"#);
        match reader.next_event().unwrap() {
            Event::XmlDecl { version, encoding } => {
                assert_eq!(version, "1.0");
                assert_eq!(encoding.as_deref(), Some("UTF-8"));
            }
            other => panic!("expected XmlDecl, got {:?}", other),
        }
    }

    #[test]
    fn test_comment_cdata_and_pi() {
        let mut reader = XmlReader::from_str("<!-- remark --><?bmml draft?><x><![CDATA[<raw>]]></x>");
        assert_eq!(reader.next_event().unwrap(), Event::Comment(Cow::Borrowed("remark")));
        match reader.next_event().unwrap() {
            Event::ProcessingInstruction { target, data } => {
                assert_eq!(target, "bmml");
                assert_eq!(data.as_deref(), Some("draft"));
            }
            other => panic!("expected ProcessingInstruction, got {:?}", other),
        }
        reader.next_event().unwrap();
        assert_eq!(reader.next_event().unwrap(), Event::CData(Cow::Borrowed("<raw>")));
    }

    #[test]
    fn test_doctype_is_skipped() {
        let xml = r#"<!DOCTYPE score SYSTEM "bmml.dtd"><score/>"#;
        let mut reader = XmlReader::from_str(xml);
        assert_eq!(start_name(reader.next_event().unwrap()), "score");
    }

    #[test]
    fn test_doctype_internal_subset_with_quoted_markup() {
        let xml = concat!(
            r#"<!DOCTYPE score [ <!ENTITY a "x>y"> <!ENTITY b 'p<q'> ]>"#,
            "\n",
            r#"<score version="1"/>"#,
        );
        let mut reader = XmlReader::from_str(xml);
        assert_eq!(start_name(reader.next_event().unwrap()), "score");
        assert_eq!(reader.position().line, 2);
    }

    #[test]
    fn test_end_tag_name_is_reported_not_checked() {
        let mut reader = XmlReader::from_str("<a></b>");
        reader.next_event().unwrap();
        assert_eq!(
            reader.next_event().unwrap(),
            Event::EndElement { name: Cow::Borrowed("b") }
        );
    }

    #[test]
    fn test_unclosed_tag() {
        let mut reader = XmlReader::from_str("<score>");
        reader.next_event().unwrap();
        let err = reader.next_event().unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::UnclosedTag(tag) if tag == "score"));
    }

    #[test]
    fn test_duplicate_attribute() {
        let mut reader = XmlReader::from_str(r#"<note id="a" id="b"/>"#);
        assert!(reader.next_event().is_err());
    }

    #[test]
    fn test_position_tracking() {
        let mut reader = XmlReader::from_str("<score>\n  <x/>\n</score>");
        reader.next_event().unwrap();
        reader.set_content(Content::Complex);
        reader.next_event().unwrap();
        assert_eq!(reader.position().line, 2);
    }
}
