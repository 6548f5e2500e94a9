//! Writes a [`Document`] back to markup.
//!
//! The walk emits every element with its attributes in insertion order,
//! followed by either its children or its text. It performs no validation:
//! whatever the tree holds is written.

use crate::document::Document;
use crate::error::{Error, ErrorKind, Result};
use crate::event::EventSink;
use crate::node::NodeId;
use crate::writer::{IndentConfig, XmlWriter};
use std::io::Write;

/// Emits the whole document into `sink`.
pub fn serialize<S: EventSink>(document: &Document, mut sink: S) -> Result<()> {
    write_element(document, document.root_id(), &mut sink)
}

fn write_element<S: EventSink>(document: &Document, id: NodeId, sink: &mut S) -> Result<()> {
    let node = document.node(id);
    sink.start_element(node.tag_name().as_str())?;
    for attr in node.attributes() {
        sink.attribute(&attr.name, &attr.value)?;
    }

    if !node.children().is_empty() {
        for &child in node.children() {
            write_element(document, child, sink)?;
        }
    } else if !node.text().is_empty() {
        sink.characters(node.text())?;
    }

    sink.end_element()
}

/// Markup output settings.
///
/// ```
/// use bmml::{parse, Serializer};
///
/// let doc = parse(r#"<score version="2010.1"><score_data/></score>"#, "demo").unwrap();
/// let xml = Serializer::new().with_indent("  ").to_string(&doc).unwrap();
/// assert_eq!(xml, "<score version=\"2010.1\">\n  <score_data/>\n</score>");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Serializer {
    declaration: bool,
    indent: Option<IndentConfig>,
}

impl Serializer {
    /// Compact output without an XML declaration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the output with `<?xml version="1.0" encoding="UTF-8"?>`.
    pub fn with_declaration(mut self) -> Self {
        self.declaration = true;
        self
    }

    /// Puts each child element on its own line, indented by `indent` per
    /// level. Text content is never re-indented.
    pub fn with_indent<S: Into<String>>(mut self, indent: S) -> Self {
        self.indent = Some(IndentConfig::new(indent));
        self
    }

    /// Writes `document` into `writer`.
    pub fn to_writer<W: Write>(&self, document: &Document, writer: W) -> Result<()> {
        let mut xml = match &self.indent {
            Some(indent) => XmlWriter::with_indent(writer, indent.clone()),
            None => XmlWriter::new(writer),
        };
        if self.declaration {
            xml.write_declaration("1.0", Some("UTF-8"))?;
        }
        serialize(document, &mut xml)?;
        xml.flush()
    }

    /// Writes `document` into a byte vector.
    pub fn to_vec(&self, document: &Document) -> Result<Vec<u8>> {
        let mut buffer = Vec::with_capacity(document.node_count() * 32);
        self.to_writer(document, &mut buffer)?;
        Ok(buffer)
    }

    /// Writes `document` into a string.
    pub fn to_string(&self, document: &Document) -> Result<String> {
        String::from_utf8(self.to_vec(document)?).map_err(|_| Error::new(ErrorKind::InvalidUtf8))
    }
}

/// Serializes a document to a compact string.
pub fn to_string(document: &Document) -> Result<String> {
    Serializer::new().to_string(document)
}

/// Serializes a document to compact bytes.
pub fn to_vec(document: &Document) -> Result<Vec<u8>> {
    Serializer::new().to_vec(document)
}

/// Serializes a document to a writer, compactly.
pub fn to_writer<W: Write>(document: &Document, writer: W) -> Result<()> {
    Serializer::new().to_writer(document, writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;
    use pretty_assertions::assert_eq;

    /// Records sink calls.
    #[derive(Default)]
    struct Recorder(Vec<String>);

    impl EventSink for Recorder {
        fn start_element(&mut self, name: &str) -> Result<()> {
            self.0.push(format!("start {}", name));
            Ok(())
        }

        fn attribute(&mut self, name: &str, value: &str) -> Result<()> {
            self.0.push(format!("attr {}={}", name, value));
            Ok(())
        }

        fn characters(&mut self, text: &str) -> Result<()> {
            self.0.push(format!("text {}", text));
            Ok(())
        }

        fn end_element(&mut self) -> Result<()> {
            self.0.push("end".to_string());
            Ok(())
        }
    }

    struct FailingSink;

    impl EventSink for FailingSink {
        fn start_element(&mut self, _: &str) -> Result<()> {
            Err(Error::custom("sink closed"))
        }

        fn attribute(&mut self, _: &str, _: &str) -> Result<()> {
            Ok(())
        }

        fn characters(&mut self, _: &str) -> Result<()> {
            Ok(())
        }

        fn end_element(&mut self) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_event_order() {
        let doc = parse(
            r#"<score version="1" id="s"><score_data><duration>4</duration></score_data></score>"#,
            "events",
        )
        .unwrap();
        let mut recorder = Recorder::default();
        serialize(&doc, &mut recorder).unwrap();
        assert_eq!(
            recorder.0,
            [
                "start score",
                "attr version=1",
                "attr id=s",
                "start score_data",
                "start duration",
                "text 4",
                "end",
                "end",
                "end",
            ]
        );
    }

    #[test]
    fn test_sink_failure_propagates() {
        let doc = parse("<score/>", "fail").unwrap();
        assert!(serialize(&doc, FailingSink).is_err());
    }

    #[test]
    fn test_compact_roundtrip() {
        let xml = concat!(
            r#"<score version="2010.1"><score_data><part id="p1"><part_data id="pd1">"#,
            r#"<generic_text id="g">a &amp; b &lt;c&gt;</generic_text>"#,
            r#"<tie_ref id="n1" start_ref="n0" type="start"/>"#,
            r#"</part_data></part></score_data></score>"#,
        );
        let doc = parse(xml, "roundtrip").unwrap();
        assert_eq!(to_string(&doc).unwrap(), xml);
    }

    #[test]
    fn test_declaration() {
        let doc = parse("<score/>", "decl").unwrap();
        let xml = Serializer::new().with_declaration().to_string(&doc).unwrap();
        assert_eq!(xml, r#"<?xml version="1.0" encoding="UTF-8"?><score/>"#);
    }

    #[test]
    fn test_pretty_output_reparses_identically() {
        let xml = concat!(
            r#"<score version="2010.1"><score_header><meta_data><generic_text id="t"> title </generic_text></meta_data></score_header>"#,
            r#"<score_data><part id="p1"><part_data id="pd1"><barline id="b" value="x"> ⠣⠅ </barline></part_data></part></score_data></score>"#,
        );
        let doc = parse(xml, "pretty").unwrap();
        let pretty = Serializer::new()
            .with_declaration()
            .with_indent("\t")
            .to_string(&doc)
            .unwrap();
        assert!(pretty.contains("\n\t\t<meta_data>"));

        let reparsed = parse(&pretty, "pretty").unwrap();
        assert_eq!(to_string(&reparsed).unwrap(), xml);
    }

    #[test]
    fn test_to_writer() {
        let doc = parse("<score/>", "writer").unwrap();
        let mut out = Vec::new();
        to_writer(&doc, &mut out).unwrap();
        assert_eq!(out, b"<score/>");
        assert_eq!(to_vec(&doc).unwrap(), b"<score/>");
    }
}
