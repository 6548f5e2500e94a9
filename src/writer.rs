//! Low-level XML writer implementing [`EventSink`].
//!
//! Indentation, when enabled, is only inserted between element children.
//! Text is never padded, so indented output parses back to the same tree.

use crate::error::{Error, Result};
use crate::escape::{escape_attribute, escape_text};
use crate::event::EventSink;
use std::io::Write;

/// An element whose start tag has been written but not its end tag.
struct OpenElement {
    name: String,
    has_children: bool,
}

/// An XML writer that produces well-formed XML output.
pub struct XmlWriter<W: Write> {
    writer: W,
    /// Stack of open elements.
    element_stack: Vec<OpenElement>,
    /// Whether we're currently in an element tag (before the closing >).
    in_tag: bool,
    /// Indentation settings.
    indent: Option<IndentConfig>,
    /// Whether anything precedes the root element.
    wrote_prolog: bool,
}

/// Indentation configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndentConfig {
    /// Characters to use for each level of indentation.
    pub indent_str: String,
    /// Whether to start each child element on a new line.
    pub newlines: bool,
}

impl IndentConfig {
    /// Indents each level with `indent_str`.
    pub fn new<S: Into<String>>(indent_str: S) -> Self {
        Self {
            indent_str: indent_str.into(),
            newlines: true,
        }
    }
}

impl Default for IndentConfig {
    fn default() -> Self {
        Self::new("  ")
    }
}

impl<W: Write> XmlWriter<W> {
    /// Creates a new XML writer.
    #[inline]
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            element_stack: Vec::new(),
            in_tag: false,
            indent: None,
            wrote_prolog: false,
        }
    }

    /// Creates a new XML writer with indentation.
    #[inline]
    pub fn with_indent(writer: W, indent: IndentConfig) -> Self {
        Self {
            indent: Some(indent),
            ..Self::new(writer)
        }
    }

    /// Returns the inner writer.
    #[inline]
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Returns the current nesting depth.
    #[inline]
    pub fn depth(&self) -> usize {
        self.element_stack.len()
    }

    /// Writes the XML declaration.
    pub fn write_declaration(&mut self, version: &str, encoding: Option<&str>) -> Result<()> {
        self.close_tag_if_open()?;
        write!(self.writer, "<?xml version=\"{}\"", version)?;
        if let Some(enc) = encoding {
            write!(self.writer, " encoding=\"{}\"", enc)?;
        }
        self.writer.write_all(b"?>")?;
        self.wrote_prolog = true;
        Ok(())
    }

    /// Starts an element.
    pub fn start_element(&mut self, name: &str) -> Result<()> {
        self.close_tag_if_open()?;
        match self.element_stack.last_mut() {
            Some(parent) => {
                parent.has_children = true;
                self.write_indent(self.element_stack.len())?;
            }
            None if self.wrote_prolog => self.write_newline()?,
            None => {}
        }
        write!(self.writer, "<{}", name)?;
        self.element_stack.push(OpenElement {
            name: name.to_string(),
            has_children: false,
        });
        self.in_tag = true;
        Ok(())
    }

    /// Writes an attribute for the current element.
    pub fn write_attribute(&mut self, name: &str, value: &str) -> Result<()> {
        if !self.in_tag {
            return Err(Error::custom("cannot write attribute outside of element tag"));
        }
        write!(self.writer, " {}=\"{}\"", name, escape_attribute(value))?;
        Ok(())
    }

    /// Writes text content. Empty text writes nothing.
    pub fn write_text(&mut self, text: &str) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        self.close_tag_if_open()?;
        self.writer.write_all(escape_text(text).as_bytes())?;
        Ok(())
    }

    /// Ends the current element, self-closing it if nothing was written inside.
    pub fn end_element(&mut self) -> Result<()> {
        let Some(open) = self.element_stack.pop() else {
            return Err(Error::custom("no element to close"));
        };

        if self.in_tag {
            self.writer.write_all(b"/>")?;
            self.in_tag = false;
        } else {
            if open.has_children {
                self.write_indent(self.element_stack.len())?;
            }
            write!(self.writer, "</{}>", open.name)?;
        }
        Ok(())
    }

    /// Closes the opening tag if one is open.
    fn close_tag_if_open(&mut self) -> Result<()> {
        if self.in_tag {
            self.writer.write_all(b">")?;
            self.in_tag = false;
        }
        Ok(())
    }

    fn write_newline(&mut self) -> Result<()> {
        if matches!(&self.indent, Some(indent) if indent.newlines) {
            self.writer.write_all(b"\n")?;
        }
        Ok(())
    }

    /// Writes a line break and `level` indentation steps, if configured.
    fn write_indent(&mut self, level: usize) -> Result<()> {
        if let Some(ref indent) = self.indent {
            if indent.newlines {
                self.writer.write_all(b"\n")?;
            }
            for _ in 0..level {
                self.writer.write_all(indent.indent_str.as_bytes())?;
            }
        }
        Ok(())
    }

    /// Flushes the writer.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write> EventSink for XmlWriter<W> {
    fn start_element(&mut self, name: &str) -> Result<()> {
        XmlWriter::start_element(self, name)
    }

    fn attribute(&mut self, name: &str, value: &str) -> Result<()> {
        self.write_attribute(name, value)
    }

    fn characters(&mut self, text: &str) -> Result<()> {
        self.write_text(text)
    }

    fn end_element(&mut self) -> Result<()> {
        XmlWriter::end_element(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write_to_string<F>(f: F) -> String
    where
        F: FnOnce(&mut XmlWriter<Vec<u8>>) -> Result<()>,
    {
        let mut writer = XmlWriter::new(Vec::new());
        f(&mut writer).unwrap();
        String::from_utf8(writer.into_inner()).unwrap()
    }

    fn indented<F>(f: F) -> String
    where
        F: FnOnce(&mut XmlWriter<Vec<u8>>) -> Result<()>,
    {
        let mut writer = XmlWriter::with_indent(Vec::new(), IndentConfig::default());
        f(&mut writer).unwrap();
        String::from_utf8(writer.into_inner()).unwrap()
    }

    #[test]
    fn test_empty_element_self_closes() {
        let result = write_to_string(|w| {
            w.start_element("score_data")?;
            w.end_element()
        });
        assert_eq!(result, "<score_data/>");
    }

    #[test]
    fn test_empty_text_still_self_closes() {
        let result = write_to_string(|w| {
            w.start_element("tie_ref")?;
            w.write_attribute("id", "t1")?;
            w.write_text("")?;
            w.end_element()
        });
        assert_eq!(result, r#"<tie_ref id="t1"/>"#);
    }

    #[test]
    fn test_element_with_text() {
        let result = write_to_string(|w| {
            w.start_element("duration")?;
            w.write_text("4")?;
            w.end_element()
        });
        assert_eq!(result, "<duration>4</duration>");
    }

    #[test]
    fn test_attributes_in_order() {
        let result = write_to_string(|w| {
            w.start_element("score")?;
            w.write_attribute("version", "2010.1")?;
            w.write_attribute("id", "s")?;
            w.end_element()
        });
        assert_eq!(result, r#"<score version="2010.1" id="s"/>"#);
    }

    #[test]
    fn test_escaped_content() {
        let result = write_to_string(|w| {
            w.start_element("generic_text")?;
            w.write_attribute("id", "a\"b")?;
            w.write_text("<>&\"")?;
            w.end_element()
        });
        assert_eq!(result, r#"<generic_text id="a&quot;b">&lt;&gt;&amp;"</generic_text>"#);
    }

    #[test]
    fn test_attribute_after_content_fails() {
        let mut writer = XmlWriter::new(Vec::new());
        writer.start_element("score").unwrap();
        writer.write_text("x").unwrap();
        assert!(writer.write_attribute("id", "s").is_err());
    }

    #[test]
    fn test_unbalanced_end_fails() {
        let mut writer = XmlWriter::new(Vec::new());
        assert!(writer.end_element().is_err());
    }

    #[test]
    fn test_xml_declaration() {
        let result = write_to_string(|w| {
            w.write_declaration("1.0", Some("UTF-8"))?;
            w.start_element("score")?;
            w.end_element()
        });
        assert_eq!(result, r#"<?xml version="1.0" encoding="UTF-8"?><score/>"#);
    }

    #[test]
    fn test_depth() {
        let mut writer = XmlWriter::new(Vec::new());
        assert_eq!(writer.depth(), 0);

        writer.start_element("a").unwrap();
        writer.start_element("b").unwrap();
        assert_eq!(writer.depth(), 2);

        writer.end_element().unwrap();
        writer.end_element().unwrap();
        assert_eq!(writer.depth(), 0);
    }

    #[test]
    fn test_indent_leaves_text_alone() {
        let result = indented(|w| {
            w.start_element("score")?;
            w.start_element("score_data")?;
            w.start_element("duration")?;
            w.write_text("4")?;
            w.end_element()?;
            w.start_element("tie_ref")?;
            w.end_element()?;
            w.end_element()?;
            w.end_element()
        });
        assert_eq!(
            result,
            "<score>\n  <score_data>\n    <duration>4</duration>\n    <tie_ref/>\n  </score_data>\n</score>"
        );
    }

    #[test]
    fn test_indent_after_declaration() {
        let result = indented(|w| {
            w.write_declaration("1.0", None)?;
            w.start_element("score")?;
            w.end_element()
        });
        assert_eq!(result, "<?xml version=\"1.0\"?>\n<score/>");
    }
}
