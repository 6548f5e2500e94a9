//! Identifiers, identifier references and their resolution.

use crate::document::Document;
use crate::element::Element;
use crate::error::{Error, Result};
use crate::node::NodeId;
use std::collections::BTreeMap;
use std::fmt;

/// A non-empty identifier naming an element.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identifier(String);

impl Identifier {
    /// Validates and wraps an identifier.
    pub fn new<S: Into<String>>(value: S) -> Result<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(Error::invalid_value("empty identifier"));
        }
        Ok(Self(value))
    }

    /// The identifier text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A non-empty reference to an [`Identifier`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IdRef(String);

impl IdRef {
    /// Validates and wraps a reference.
    pub fn new<S: Into<String>>(value: S) -> Result<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(Error::invalid_value("empty identifier reference"));
        }
        Ok(Self(value))
    }

    /// The referenced identifier text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if this reference names `id`.
    pub fn refers_to(&self, id: &Identifier) -> bool {
        self.0 == id.0
    }

    /// Finds the element this reference names.
    ///
    /// The search starts at the outermost ancestor of `from` and visits the
    /// whole tree depth-first in document order; the first element whose
    /// declared identifier attribute equals the reference wins. A dangling
    /// reference yields `None`.
    pub fn resolve(&self, document: &Document, from: NodeId) -> Option<NodeId> {
        let mut top = from;
        while let Some(parent) = document.node(top).parent() {
            top = parent;
        }

        let found = document
            .descendants(top)
            .map(|element| element.node_id())
            .find(|&id| identifier_of(document, id) == Some(self.as_str()));
        if found.is_none() {
            tracing::debug!(reference = %self, "identifier reference not found");
        }
        found
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for IdRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Identifier> for IdRef {
    fn from(id: Identifier) -> Self {
        Self(id.0)
    }
}

/// Value of the catalog-declared identifier attribute of `id`.
fn identifier_of(document: &Document, id: NodeId) -> Option<&str> {
    let node = document.node(id);
    let name = document.catalog().identifier_attribute(node.tag_name().as_str())?;
    node.attribute(name)
}

impl Document {
    /// Finds the first element, in document order, whose identifier is `id`.
    pub fn find_by_id(&self, id: &str) -> Option<Element<'_>> {
        self.descendants(self.root_id())
            .find(|element| identifier_of(self, element.node_id()) == Some(id))
    }

    /// Identifier values held by more than one element, with their holders
    /// in document order.
    pub fn duplicate_identifiers(&self) -> Vec<(String, Vec<NodeId>)> {
        let mut holders: BTreeMap<&str, Vec<NodeId>> = BTreeMap::new();
        for element in self.descendants(self.root_id()) {
            let node = element.node_id();
            if let Some(id) = identifier_of(self, node) {
                holders.entry(id).or_default().push(node);
            }
        }

        holders
            .into_iter()
            .filter(|(_, nodes)| nodes.len() > 1)
            .map(|(id, nodes)| (id.to_string(), nodes))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    const SCORE: &str = concat!(
        r#"<score version="2010.1"><score_data><part id="p1"><part_data>"#,
        r#"<note id="n1"><duration>4</duration></note>"#,
        r#"<slur_ref id="n1" type="start"/>"#,
        r#"<note id="n2"/>"#,
        r#"<tie_ref id="missing" start_ref="n2" type="stop"/>"#,
        r#"</part_data></part></score_data></score>"#,
    );

    #[test]
    fn test_empty_values_rejected() {
        assert!(Identifier::new("").is_err());
        assert!(IdRef::new("").is_err());
        assert_eq!(Identifier::new("n1").unwrap().to_string(), "n1");
    }

    #[test]
    fn test_resolve_from_anywhere() {
        let doc = parse(SCORE, "refs").unwrap();
        let target = doc.find_by_id("n1").unwrap();

        let reference = IdRef::new("n1").unwrap();
        for from in doc.descendants(doc.root_id()) {
            assert_eq!(reference.resolve(&doc, from.node_id()), Some(target.node_id()));
        }
    }

    #[test]
    fn test_reference_elements_are_not_targets() {
        let doc = parse(SCORE, "refs").unwrap();
        // The slur_ref carries id="n1" as a reference; only the note matches.
        let target = doc.find_by_id("n1").unwrap();
        assert_eq!(target.tag_name(), "note");
    }

    #[test]
    fn test_dangling_reference() {
        let doc = parse(SCORE, "refs").unwrap();
        let reference = IdRef::new("missing").unwrap();
        assert_eq!(reference.resolve(&doc, doc.root_id()), None);
    }

    #[test]
    fn test_duplicate_identifiers() {
        let xml = concat!(
            r#"<score version="2010.1"><score_data><part id="p1"><part_data>"#,
            r#"<note id="x"/><note id="y"/><rest id="x"/>"#,
            r#"</part_data></part></score_data></score>"#,
        );
        let doc = parse(xml, "dups").unwrap();
        let dups = doc.duplicate_identifiers();
        assert_eq!(dups.len(), 1);
        assert_eq!(dups[0].0, "x");
        let tags: Vec<_> = dups[0]
            .1
            .iter()
            .map(|&id| doc.node(id).tag_name().as_str())
            .collect();
        assert_eq!(tags, ["note", "rest"]);

        assert!(parse(SCORE, "refs").unwrap().duplicate_identifiers().is_empty());
    }

    #[test]
    fn test_first_match_in_document_order() {
        let xml = concat!(
            r#"<score version="2010.1"><score_data><part id="p1"><part_data>"#,
            r#"<note id="x"><duration>1</duration></note><note id="x"><duration>2</duration></note>"#,
            r#"</part_data></part></score_data></score>"#,
        );
        let doc = parse(xml, "order").unwrap();
        let found = doc.find_by_id("x").unwrap();
        assert_eq!(found.to_string(), "1");
    }
}
