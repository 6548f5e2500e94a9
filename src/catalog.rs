//! Declarative schema data: content categories and attribute declarations.
//!
//! The built-in catalog is assembled from the element table in
//! [`elements`](crate::elements). A catalog is plain serde data, so a table
//! produced by an external generator can be loaded from any serde format.

use crate::content::Content;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The declared type of an attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AttributeKind {
    /// Free text.
    String,
    /// A document-unique identifier.
    Id,
    /// A reference to an identifier.
    IdRef,
    /// `"true"` or `"false"`.
    Boolean,
    /// One token out of a closed, ordered set.
    Enumeration {
        /// Name of the legal-value set.
        name: String,
        /// Legal tokens in declared order.
        values: Vec<String>,
    },
}

/// Declaration of one attribute on one element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDecl {
    /// Attribute name.
    pub name: String,
    /// Declared value type.
    pub kind: AttributeKind,
    /// Whether reads fail when the attribute is absent.
    #[serde(default)]
    pub required: bool,
}

impl AttributeDecl {
    /// Returns true if `value` is acceptable for this declaration.
    pub fn accepts(&self, value: &str) -> bool {
        match &self.kind {
            AttributeKind::String => true,
            AttributeKind::Id | AttributeKind::IdRef => !value.is_empty(),
            AttributeKind::Boolean => value == "true" || value == "false",
            AttributeKind::Enumeration { values, .. } => values.iter().any(|v| v == value),
        }
    }
}

/// Declaration of one element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementDecl {
    /// Declared content category.
    pub content: Content,
    /// Attribute declarations in declared order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<AttributeDecl>,
}

/// A schema catalog keyed by tag name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    elements: BTreeMap<String, ElementDecl>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in BMML catalog.
    pub fn bmml() -> Self {
        let mut catalog = Self::new();
        for (tag, content, attributes) in crate::elements::declarations() {
            catalog.declare(tag, ElementDecl { content, attributes });
        }
        catalog
    }

    /// Adds or replaces an element declaration.
    pub fn declare<S: Into<String>>(&mut self, tag: S, decl: ElementDecl) {
        self.elements.insert(tag.into(), decl);
    }

    /// Looks up an element declaration.
    pub fn element(&self, tag: &str) -> Option<&ElementDecl> {
        self.elements.get(tag)
    }

    /// Declared content category of `tag`.
    pub fn content(&self, tag: &str) -> Option<Content> {
        self.element(tag).map(|decl| decl.content)
    }

    /// Looks up an attribute declaration.
    pub fn attribute(&self, tag: &str, name: &str) -> Option<&AttributeDecl> {
        self.element(tag)?.attributes.iter().find(|a| a.name == name)
    }

    /// Name of the identifier attribute declared on `tag`, if any.
    pub fn identifier_attribute(&self, tag: &str) -> Option<&str> {
        self.element(tag)?
            .attributes
            .iter()
            .find(|a| a.kind == AttributeKind::Id)
            .map(|a| a.name.as_str())
    }

    /// All declared tags in sorted order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.elements.keys().map(String::as_str)
    }

    /// Number of declared elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true if nothing is declared.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builtin_size() {
        let catalog = Catalog::bmml();
        assert_eq!(catalog.len(), 121);
        assert!(catalog.tags().any(|t| t == "string"));
    }

    #[test]
    fn test_content_categories() {
        let catalog = Catalog::bmml();
        assert_eq!(catalog.content("score"), Some(Content::Complex));
        assert_eq!(catalog.content("barline"), Some(Content::Complex));
        assert_eq!(catalog.content("duration"), Some(Content::Simple));
        assert_eq!(catalog.content("tie_ref"), Some(Content::Empty));
        assert_eq!(catalog.content("meta_data"), Some(Content::Mixed));
        assert_eq!(catalog.content("no_such_tag"), None);
    }

    #[test]
    fn test_identifier_attributes() {
        let catalog = Catalog::bmml();
        assert_eq!(catalog.identifier_attribute("note"), Some("id"));
        // `id` on reference elements is a reference, not an identifier.
        assert_eq!(catalog.identifier_attribute("note_ref"), None);
        assert_eq!(
            catalog.attribute("slur_ref", "start_ref").map(|a| &a.kind),
            Some(&AttributeKind::IdRef)
        );
    }

    #[test]
    fn test_enumeration_declaration() {
        let catalog = Catalog::bmml();
        let decl = catalog.attribute("accidental", "placement").unwrap();
        assert!(!decl.required);
        assert_eq!(
            decl.kind,
            AttributeKind::Enumeration {
                name: "above_below".to_string(),
                values: vec!["above".to_string(), "below".to_string()],
            }
        );
        assert!(decl.accepts("below"));
        assert!(!decl.accepts("beside"));
    }

    #[test]
    fn test_serde_roundtrip() {
        let catalog = Catalog::bmml();
        let json = serde_json::to_string(&catalog).unwrap();
        let back: Catalog = serde_json::from_str(&json).unwrap();
        assert_eq!(catalog, back);
    }

    #[test]
    fn test_deserialize_generator_output() {
        let json = r#"{
            "elements": {
                "fermata": {
                    "content": "simple",
                    "attributes": [
                        {"name": "id", "kind": {"type": "id"}, "required": true},
                        {"name": "shape", "kind": {"type": "string"}}
                    ]
                }
            }
        }"#;
        let catalog: Catalog = serde_json::from_str(json).unwrap();
        assert_eq!(catalog.content("fermata"), Some(Content::Simple));
        assert_eq!(catalog.identifier_attribute("fermata"), Some("id"));
        assert!(!catalog.attribute("fermata", "shape").unwrap().required);
    }
}
