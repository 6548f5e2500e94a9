//! # bmml
//!
//! A typed, schema-driven document model for Braille Music Markup Language.
//!
//! ## Features
//!
//! - One concrete element type per BMML tag, with typed attribute getters
//! - Content-model checking while parsing (simple, complex and empty content)
//! - Identifier references resolved across the whole score
//! - Byte-stable re-serialization of normalized documents
//! - An explicit element registry and a serde-loadable schema catalog
//!
//! ## Quick Start
//!
//! ```rust
//! use bmml::{parse, to_string};
//!
//! let xml = concat!(
//!     r#"<score version="2010.1"><score_data><part id="p1">"#,
//!     r#"<note id="n1"><note_data><duration>384</duration></note_data>"#,
//!     r#"<note_type id="nt1" name="D" value="quarter_or_64th">⠱</note_type></note>"#,
//!     r#"</part></score_data></score>"#,
//! );
//!
//! let doc = parse(xml, "quick-start").unwrap();
//! assert_eq!(doc.to_string(), "⠱");
//! assert_eq!(to_string(&doc).unwrap(), xml);
//! ```
//!
//! ## Typed Access
//!
//! ```rust
//! use bmml::elements::{NoteType, Part};
//! use bmml::enumerations::{AmbiguousValue, DiatonicStep};
//! use bmml::parse;
//!
//! let xml = concat!(
//!     r#"<score version="2010.1"><score_data><part id="p1">"#,
//!     r#"<note_type id="nt1" name="G" value="8th_or_128th">⠛</note_type>"#,
//!     r#"</part></score_data></score>"#,
//! );
//! let doc = parse(xml, "typed").unwrap();
//!
//! let part = doc.score().data().unwrap().find_element::<Part>().unwrap();
//! assert_eq!(part.id().unwrap().as_str(), "p1");
//!
//! let note_type = part.find_element::<NoteType>().unwrap();
//! assert_eq!(note_type.name().unwrap(), DiatonicStep::G);
//! assert_eq!(note_type.value().unwrap(), AmbiguousValue::EighthOr128th);
//! ```
//!
//! ## References
//!
//! ```rust
//! use bmml::elements::{TieRef, Note};
//! use bmml::parse;
//!
//! let xml = concat!(
//!     r#"<score version="2010.1"><score_data>"#,
//!     r#"<part id="p1"><note id="n1"/></part>"#,
//!     r#"<part id="p2"><tie_ref id="n1" start_ref="n1" type="start"/></part>"#,
//!     r#"</score_data></score>"#,
//! );
//! let doc = parse(xml, "references").unwrap();
//!
//! let tie = doc.root().descendants().find_map(|e| e.cast::<TieRef>()).unwrap();
//! let target = tie.resolve(TieRef::ID).unwrap().unwrap();
//! assert!(target.is::<Note>());
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod attribute;
pub mod catalog;
pub mod content;
pub mod document;
pub mod element;
pub mod elements;
pub mod enumerations;
pub mod error;
pub mod escape;
pub mod event;
pub mod identifier;
pub mod node;
pub mod parser;
pub mod reader;
pub mod registry;
pub mod serializer;
pub mod writer;

use std::io::Read;

// Re-export main types and functions
pub use attribute::{
    Accessor, OptionalBool, OptionalEnum, OptionalString, RequiredEnum, RequiredId, RequiredIdRef,
    RequiredString,
};
pub use catalog::{AttributeDecl, AttributeKind, Catalog, ElementDecl};
pub use content::Content;
pub use document::Document;
pub use element::{AnyElement, Element, ElementMut};
pub use elements::{ElementKind, ElementType};
pub use enumerations::Enumeration;
pub use error::{Error, ErrorKind, Position, Result, Violation};
pub use escape::{escape_attribute, escape_text, unescape};
pub use event::{Attribute, Event, EventSink, EventSource};
pub use identifier::{IdRef, Identifier};
pub use node::{Node, NodeId, QName};
pub use parser::Parser;
pub use reader::XmlReader;
pub use registry::{Registration, Registry};
pub use serializer::{serialize, to_string, to_vec, to_writer, Serializer};
pub use writer::{IndentConfig, XmlWriter};

/// Parses a BMML document from a string with the built-in registry.
///
/// `document_name` labels the document and its log output. The registry is
/// rebuilt on every call; to parse many documents, build one
/// [`Registry`] and pass it to [`parse_with`].
pub fn parse(input: &str, document_name: &str) -> Result<Document> {
    parse_with(XmlReader::from_str(input), &Registry::bmml(), document_name)
}

/// Parses a BMML document from UTF-8 bytes with the built-in registry.
///
/// A leading byte-order mark is skipped. Like [`parse`], this builds a
/// fresh registry per call.
pub fn parse_bytes(input: &[u8], document_name: &str) -> Result<Document> {
    parse_with(XmlReader::from_bytes(input), &Registry::bmml(), document_name)
}

/// Reads all of `reader` and parses it with the built-in registry.
pub fn parse_reader<R: Read>(mut reader: R, document_name: &str) -> Result<Document> {
    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer)?;
    parse_bytes(&buffer, document_name)
}

/// Parses a document from any event source with an explicit registry.
pub fn parse_with<'a, S: EventSource<'a>>(
    source: S,
    registry: &Registry,
    document_name: &str,
) -> Result<Document> {
    Parser::new(source, registry).parse_document(document_name)
}
