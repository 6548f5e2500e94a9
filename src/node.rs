//! Tree nodes stored in a [`Document`](crate::Document) arena.

use crate::elements::ElementKind;
use crate::event::Attribute;
use std::borrow::Cow;
use std::fmt;

/// Index of a node in its document's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    #[inline]
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position in the arena.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// A qualified element name as written in the markup.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QName(String);

impl QName {
    /// Wraps a qualified name.
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self(name.into())
    }

    /// The full name, prefix included.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The namespace prefix, if any.
    pub fn prefix(&self) -> Option<&str> {
        self.0.split_once(':').map(|(prefix, _)| prefix)
    }

    /// The name without its prefix.
    pub fn local_name(&self) -> &str {
        match self.0.split_once(':') {
            Some((_, local)) => local,
            None => &self.0,
        }
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for QName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for QName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for QName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// One element of the tree.
///
/// Attributes keep insertion order and unique keys. `text` is only
/// meaningful for simple content and `children` for complex content; the
/// parser guarantees that at most one of them is populated, setters do not.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    tag_name: QName,
    kind: ElementKind,
    attributes: Vec<Attribute<'static>>,
    text: String,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl Node {
    pub(crate) fn new(tag_name: QName, kind: ElementKind, parent: Option<NodeId>) -> Self {
        Self {
            tag_name,
            kind,
            attributes: Vec::new(),
            text: String::new(),
            children: Vec::new(),
            parent,
        }
    }

    pub(crate) fn with_attributes(mut self, attributes: Vec<Attribute<'static>>) -> Self {
        self.attributes = attributes;
        self
    }

    /// The tag name as written.
    #[inline]
    pub fn tag_name(&self) -> &QName {
        &self.tag_name
    }

    /// The concrete element kind, or [`ElementKind::Generic`].
    #[inline]
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// All attributes in insertion order.
    #[inline]
    pub fn attributes(&self) -> &[Attribute<'static>] {
        &self.attributes
    }

    /// Looks up an attribute value by name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_ref())
    }

    /// Sets an attribute. An existing key keeps its position.
    pub fn set_attribute<V: Into<String>>(&mut self, name: &str, value: V) {
        let value = Cow::Owned(value.into());
        match self.attributes.iter_mut().find(|a| a.name == name) {
            Some(existing) => existing.value = value,
            None => self.attributes.push(Attribute {
                name: Cow::Owned(name.to_string()),
                value,
            }),
        }
    }

    /// Removes an attribute, returning its previous value.
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        let index = self.attributes.iter().position(|a| a.name == name)?;
        Some(self.attributes.remove(index).value.into_owned())
    }

    /// The text content.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replaces the text content.
    pub fn set_text<S: Into<String>>(&mut self, text: S) {
        self.text = text.into();
    }

    pub(crate) fn text_mut(&mut self) -> &mut String {
        &mut self.text
    }

    /// Child elements in document order.
    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub(crate) fn push_child(&mut self, child: NodeId) {
        self.children.push(child);
    }

    /// The owning element, `None` for the root.
    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}
