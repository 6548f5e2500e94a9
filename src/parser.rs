//! Builds a [`Document`] from an [`EventSource`].
//!
//! Each element is read in three steps: its start tag, its content, and its
//! end tag. The registry decides the content category of every known tag and
//! the parser enforces it while reading the content:
//!
//! - `simple`: text only;
//! - `complex`: child elements only, whitespace between them is dropped;
//! - `empty`: nothing but whitespace.
//!
//! Unknown tags, and `mixed` ones, keep leading text until their first child
//! and reject non-whitespace text next to children.

use crate::content::{is_whitespace, Content};
use crate::document::Document;
use crate::elements::{ElementKind, ElementType, Score};
use crate::error::{Error, Result, Violation};
use crate::event::{Attribute, Event, EventSource};
use crate::node::{Node, NodeId, QName};
use crate::registry::Registry;
use std::sync::Arc;

/// A recursive-descent document builder.
pub struct Parser<'r, 'a, S: EventSource<'a>> {
    source: S,
    registry: &'r Registry,
    /// Peeked event for look-ahead.
    peeked: Option<Event<'a>>,
    nodes: Vec<Node>,
}

impl<'r, 'a, S: EventSource<'a>> Parser<'r, 'a, S> {
    /// Creates a parser reading from `source`.
    pub fn new(source: S, registry: &'r Registry) -> Self {
        Self {
            source,
            registry,
            peeked: None,
            nodes: Vec::with_capacity(256),
        }
    }

    /// Parses one whole document whose root must be `score`.
    ///
    /// Declarations, comments, processing instructions and whitespace may
    /// surround the root element.
    pub fn parse_document(mut self, name: &str) -> Result<Document> {
        let span = tracing::debug_span!("parse", document = name);
        let _enter = span.enter();

        self.skip_prolog()?;

        if let Some(Event::StartElement { name: tag, .. }) = &self.peeked {
            if tag != Score::TAG {
                tracing::warn!(element = %tag, "document root is not a score");
                return Err(Error::unexpected_element(tag.to_string()).at(self.source.position()));
            }
        }
        let root = self.make(None)?;

        self.skip_epilog()?;
        tracing::debug!(nodes = self.nodes.len(), "document parsed");

        Ok(Document::from_parts(
            name.to_string(),
            self.nodes,
            root,
            Arc::clone(self.registry.catalog()),
        ))
    }

    /// Peeks at the next event without consuming it.
    fn peek_event(&mut self) -> Result<&Event<'a>> {
        let event = match self.peeked.take() {
            Some(event) => event,
            None => self.source.next_event()?,
        };
        Ok(self.peeked.insert(event))
    }

    /// Consumes and returns the next event.
    fn next_event(&mut self) -> Result<Event<'a>> {
        match self.peeked.take() {
            Some(event) => Ok(event),
            None => self.source.next_event(),
        }
    }

    /// Skips everything before the root start tag.
    fn skip_prolog(&mut self) -> Result<()> {
        loop {
            match self.peek_event()? {
                Event::StartElement { .. } => return Ok(()),
                Event::Eof => {
                    return Err(Error::unexpected_eof().at(self.source.position()));
                }
                Event::Characters(text) | Event::CData(text) if !is_whitespace(text) => {
                    return Err(Error::syntax("text before the root element")
                        .at(self.source.position()));
                }
                _ => {
                    self.next_event()?;
                }
            }
        }
    }

    /// Allows only comments, processing instructions and whitespace after
    /// the root element.
    fn skip_epilog(&mut self) -> Result<()> {
        loop {
            match self.next_event()? {
                Event::Eof => return Ok(()),
                Event::Comment(_) | Event::ProcessingInstruction { .. } => {}
                Event::Characters(text) if is_whitespace(&text) => {}
                Event::StartElement { name, .. } => {
                    tracing::warn!(element = %name, "element after the root element");
                    return Err(Error::unexpected_element(name).at(self.source.position()));
                }
                _ => {
                    return Err(Error::syntax("content after the root element")
                        .at(self.source.position()));
                }
            }
        }
    }

    /// Builds one element and its subtree, consuming its end tag.
    fn make(&mut self, parent: Option<NodeId>) -> Result<NodeId> {
        let (tag, attributes) = match self.next_event()? {
            Event::StartElement { name, attributes } => (name.into_owned(), attributes),
            _ => return Err(Error::syntax("expected a start tag").at(self.source.position())),
        };

        let content = self
            .registry
            .expected_content(&tag, attributes.iter().map(|a| a.name.as_ref()));
        let kind = match (content, self.registry.lookup(&tag)) {
            (Some(content), Some(registration)) => {
                self.source.set_content(content);
                registration.kind
            }
            _ => {
                tracing::debug!(element = %tag, "unknown element, parsing generically");
                ElementKind::Generic
            }
        };

        let id = NodeId::new(self.nodes.len());
        let attributes = attributes.into_iter().map(Attribute::into_owned).collect();
        self.nodes
            .push(Node::new(QName::new(tag.as_str()), kind, parent).with_attributes(attributes));
        if let Some(parent) = parent {
            self.nodes[parent.index()].push_child(id);
        }

        loop {
            let event = self.next_event()?;
            match event {
                Event::StartElement { .. } => {
                    match content {
                        Some(Content::Simple) => {
                            return Err(self.violation(&tag, Violation::ElementInSimpleContent));
                        }
                        Some(Content::Empty) => {
                            return Err(self.violation(&tag, Violation::ElementInEmptyContent));
                        }
                        _ => {}
                    }
                    let node = &mut self.nodes[id.index()];
                    if !is_whitespace(node.text()) {
                        return Err(self.violation(&tag, Violation::ElementInSimpleContent));
                    }
                    node.text_mut().clear();

                    self.peeked = Some(event);
                    self.make(Some(id))?;
                }
                Event::Characters(text) | Event::CData(text) => {
                    self.characters(id, &tag, content, &text)?;
                }
                Event::EndElement { name } => {
                    if name != tag {
                        let found = name.into_owned();
                        return Err(self.violation(&tag, Violation::MismatchedEndTag { found }));
                    }
                    return Ok(id);
                }
                Event::Eof => {
                    return Err(Error::unexpected_eof().at(self.source.position()));
                }
                _ => {}
            }
        }
    }

    /// Applies the content rules to a run of character data.
    fn characters(
        &mut self,
        id: NodeId,
        tag: &str,
        content: Option<Content>,
        text: &str,
    ) -> Result<()> {
        let blank = is_whitespace(text);
        let node = &mut self.nodes[id.index()];

        if !node.children().is_empty() || content == Some(Content::Complex) {
            if blank {
                return Ok(());
            }
            return Err(self.violation(tag, Violation::CharactersInComplexContent));
        }
        if content == Some(Content::Empty) {
            if blank {
                return Ok(());
            }
            return Err(self.violation(tag, Violation::CharactersInEmptyContent));
        }

        node.text_mut().push_str(text);
        Ok(())
    }

    fn violation(&self, tag: &str, violation: Violation) -> Error {
        let position = self.source.position();
        tracing::warn!(
            element = tag,
            %violation,
            line = position.map(|p| p.line),
            "content model violation"
        );
        Error::content_model(tag, violation).at(position)
    }
}
