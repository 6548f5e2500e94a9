//! The event interface between markup and the document model.
//!
//! The parser pulls [`Event`]s from an [`EventSource`] and the serializer
//! pushes calls into an [`EventSink`]. [`XmlReader`](crate::XmlReader) and
//! [`XmlWriter`](crate::XmlWriter) are the bundled implementations; any
//! other tokenizer can drive the model by implementing these traits.

use crate::content::Content;
use crate::error::{Position, Result};
use std::borrow::Cow;

/// An event produced by an [`EventSource`].
#[derive(Debug, Clone, PartialEq)]
pub enum Event<'a> {
    /// XML declaration: `<?xml version="1.0"?>`
    XmlDecl {
        /// XML version (e.g., "1.0").
        version: Cow<'a, str>,
        /// Character encoding (e.g., "UTF-8").
        encoding: Option<Cow<'a, str>>,
    },
    /// Start of an element, with its attributes in document order.
    StartElement {
        /// Qualified element name.
        name: Cow<'a, str>,
        /// Element attributes.
        attributes: Vec<Attribute<'a>>,
    },
    /// End of an element. Self-closing tags produce a start and an end.
    EndElement {
        /// Qualified element name.
        name: Cow<'a, str>,
    },
    /// Character data, entities already resolved.
    Characters(Cow<'a, str>),
    /// CDATA section contents.
    CData(Cow<'a, str>),
    /// Comment text.
    Comment(Cow<'a, str>),
    /// Processing instruction: `<?target data?>`
    ProcessingInstruction {
        /// Processing instruction target.
        target: Cow<'a, str>,
        /// Processing instruction data.
        data: Option<Cow<'a, str>>,
    },
    /// End of input.
    Eof,
}

/// A name/value attribute pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute<'a> {
    /// The qualified attribute name.
    pub name: Cow<'a, str>,
    /// The attribute value, entities resolved.
    pub value: Cow<'a, str>,
}

impl<'a> Attribute<'a> {
    /// Creates an attribute.
    pub fn new<N, V>(name: N, value: V) -> Self
    where
        N: Into<Cow<'a, str>>,
        V: Into<Cow<'a, str>>,
    {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Detaches the attribute from the input buffer.
    pub fn into_owned(self) -> Attribute<'static> {
        Attribute {
            name: Cow::Owned(self.name.into_owned()),
            value: Cow::Owned(self.value.into_owned()),
        }
    }
}

/// A pull parser the [`Parser`](crate::Parser) reads from.
pub trait EventSource<'a> {
    /// Reads the next event.
    fn next_event(&mut self) -> Result<Event<'a>>;

    /// Announces the content category of the element whose start event was
    /// just returned, before any of its content is read.
    fn set_content(&mut self, content: Content);

    /// Current location, for error reporting.
    fn position(&self) -> Option<Position> {
        None
    }
}

/// A push serializer the [`serialize`](crate::serialize) walk writes into.
pub trait EventSink {
    /// Opens an element. Attributes for it follow before any content.
    fn start_element(&mut self, name: &str) -> Result<()>;

    /// Adds an attribute to the element just opened.
    fn attribute(&mut self, name: &str, value: &str) -> Result<()>;

    /// Writes character data.
    fn characters(&mut self, text: &str) -> Result<()>;

    /// Closes the innermost open element.
    fn end_element(&mut self) -> Result<()>;
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn start_element(&mut self, name: &str) -> Result<()> {
        (**self).start_element(name)
    }

    fn attribute(&mut self, name: &str, value: &str) -> Result<()> {
        (**self).attribute(name, value)
    }

    fn characters(&mut self, text: &str) -> Result<()> {
        (**self).characters(text)
    }

    fn end_element(&mut self) -> Result<()> {
        (**self).end_element()
    }
}
