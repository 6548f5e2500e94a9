//! The element factory table.
//!
//! A [`Registry`] maps tag names to the content category and element kind
//! the parser builds for them. It is an explicit value handed to the
//! [`Parser`](crate::Parser); there is no process-wide table.

use crate::catalog::Catalog;
use crate::content::{effective_content, Content};
use crate::elements::ElementKind;
use std::collections::HashMap;
use std::sync::Arc;

/// What the parser builds for one tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registration {
    /// Declared content category.
    pub content: Content,
    /// Kind attached to nodes built for the tag.
    pub kind: ElementKind,
}

/// Tag-to-element dispatch table.
#[derive(Debug, Clone)]
pub struct Registry {
    entries: HashMap<String, Registration>,
    catalog: Arc<Catalog>,
}

impl Registry {
    /// Registers every element declared in `catalog`.
    pub fn new(catalog: Arc<Catalog>) -> Self {
        let entries = catalog
            .tags()
            .filter_map(|tag| {
                let content = catalog.content(tag)?;
                let registration = Registration {
                    content,
                    kind: ElementKind::from_tag(tag),
                };
                Some((tag.to_string(), registration))
            })
            .collect::<HashMap<_, _>>();
        tracing::debug!(elements = entries.len(), "element registry built");

        Self { entries, catalog }
    }

    /// The registry for the built-in BMML catalog.
    pub fn bmml() -> Self {
        Self::new(Arc::new(Catalog::bmml()))
    }

    /// Adds or replaces the registration for `tag`.
    pub fn register<S: Into<String>>(&mut self, tag: S, content: Content, kind: ElementKind) {
        self.entries.insert(tag.into(), Registration { content, kind });
    }

    /// Looks up the registration for `tag`.
    pub fn lookup(&self, tag: &str) -> Option<Registration> {
        self.entries.get(tag).copied()
    }

    /// Content category expected for `tag` given its attribute names, after
    /// the attribute-dependent override. `None` for unregistered tags.
    pub fn expected_content<'a, I>(&self, tag: &str, attribute_names: I) -> Option<Content>
    where
        I: Iterator<Item = &'a str>,
    {
        let registration = self.lookup(tag)?;
        Some(effective_content(tag, registration.content, attribute_names))
    }

    /// The catalog documents parsed with this registry refer to.
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Number of registered tags.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bmml_registry() {
        let registry = Registry::bmml();
        assert_eq!(registry.len(), 121);
        assert_eq!(
            registry.lookup("note"),
            Some(Registration {
                content: Content::Complex,
                kind: ElementKind::Note,
            })
        );
        assert_eq!(
            registry.lookup("string").map(|r| r.kind),
            Some(ElementKind::InstrumentString)
        );
        assert_eq!(registry.lookup("no_such_tag"), None);
    }

    #[test]
    fn test_expected_content_barline_override() {
        let registry = Registry::bmml();
        assert_eq!(
            registry.expected_content("barline", ["id", "value"].into_iter()),
            Some(Content::Simple)
        );
        assert_eq!(
            registry.expected_content("barline", ["id"].into_iter()),
            Some(Content::Complex)
        );
        assert_eq!(registry.expected_content("no_such_tag", std::iter::empty()), None);
    }

    #[test]
    fn test_register_override() {
        let mut registry = Registry::bmml();
        registry.register("custom_mark", Content::Simple, ElementKind::Generic);
        assert_eq!(registry.len(), 122);
        assert_eq!(
            registry.expected_content("custom_mark", std::iter::empty()),
            Some(Content::Simple)
        );
    }
}
