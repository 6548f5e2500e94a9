//! The document arena.

use crate::catalog::{AttributeKind, Catalog};
use crate::element::{Descendants, Element, ElementMut};
use crate::elements::{ElementKind, ElementType, Score};
use crate::error::{Error, Result};
use crate::node::{Node, NodeId, QName};
use std::fmt;
use std::sync::Arc;

/// A parsed or programmatically built BMML document.
///
/// Every node lives in one arena owned by the document; [`NodeId`]s index
/// into it. The root is always a `score` element.
#[derive(Debug, Clone)]
pub struct Document {
    name: String,
    nodes: Vec<Node>,
    root: NodeId,
    catalog: Arc<Catalog>,
}

impl Document {
    /// Creates a document holding an empty `score` against the built-in
    /// catalog.
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self::with_catalog(name, Arc::new(Catalog::bmml()))
    }

    /// Creates a document holding an empty `score` against `catalog`.
    pub fn with_catalog<S: Into<String>>(name: S, catalog: Arc<Catalog>) -> Self {
        let root = Node::new(QName::new(Score::TAG), Score::KIND, None);
        Self {
            name: name.into(),
            nodes: vec![root],
            root: NodeId::new(0),
            catalog,
        }
    }

    pub(crate) fn from_parts(
        name: String,
        nodes: Vec<Node>,
        root: NodeId,
        catalog: Arc<Catalog>,
    ) -> Self {
        Self {
            name,
            nodes,
            root,
            catalog,
        }
    }

    /// The name given when the document was parsed or created.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The schema catalog the document was built against.
    #[inline]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Arena index of the root element.
    #[inline]
    pub fn root_id(&self) -> NodeId {
        self.root
    }

    /// The root element.
    #[inline]
    pub fn root(&self) -> Element<'_> {
        Element::new(self, self.root)
    }

    /// The root element, typed.
    #[inline]
    pub fn score(&self) -> Element<'_, Score> {
        Element::new(self, self.root)
    }

    /// Number of elements in the document.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The node at `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this document.
    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// The node at `id`, mutably.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this document.
    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// A view of the element at `id`.
    #[inline]
    pub fn element(&self, id: NodeId) -> Element<'_> {
        Element::new(self, id)
    }

    /// An editable view of the element at `id`.
    #[inline]
    pub fn element_mut(&mut self, id: NodeId) -> ElementMut<'_> {
        ElementMut::new(self, id)
    }

    /// The subtree rooted at `from`, depth-first in document order.
    pub fn descendants(&self, from: NodeId) -> Descendants<'_> {
        Descendants::new(self, from)
    }

    /// Appends a new, empty element as the last child of `parent`.
    ///
    /// The element kind follows the tag; unknown tags become
    /// [`ElementKind::Generic`].
    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes
            .push(Node::new(QName::new(tag), ElementKind::from_tag(tag), Some(parent)));
        self.nodes[parent.index()].push_child(id);
        id
    }

    /// Checks every element against its catalog declaration.
    ///
    /// Reports the first required attribute that is absent, or the first
    /// stored value outside its declared set, in document order. Elements
    /// the catalog does not know are not checked.
    pub fn validate(&self) -> Result<()> {
        for element in self.descendants(self.root) {
            let node = element.node();
            let tag = node.tag_name().as_str();
            let Some(decl) = self.catalog.element(tag) else {
                continue;
            };

            for attr in &decl.attributes {
                match node.attribute(&attr.name) {
                    None if attr.required => {
                        return Err(Error::missing_attribute(tag, attr.name.as_str()));
                    }
                    Some(value) if !attr.accepts(value) => {
                        return Err(match attr.kind {
                            AttributeKind::Id | AttributeKind::IdRef => Error::invalid_value(
                                format!("empty '{}' on <{}>", attr.name, tag),
                            ),
                            _ => Error::illegal_enumeration(tag, attr.name.as_str(), value),
                        });
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }
}

/// Writes the braille text of the whole score.
impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.root(), f)
    }
}
