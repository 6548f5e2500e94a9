//! Typed views over document nodes.
//!
//! [`Element`] is a cheap, copyable handle pairing a document with a node.
//! The type parameter names the concrete element type when it is known
//! statically; named attribute getters such as `placement()` exist only on
//! the matching `Element<'_, T>`. [`ElementMut`] is the exclusive
//! counterpart used for edits.

use crate::attribute::{Accessor, RequiredIdRef};
use crate::document::Document;
use crate::elements::{ElementKind, ElementType};
use crate::error::Result;
use crate::node::{Node, NodeId, QName};
use std::fmt;
use std::marker::PhantomData;

/// Marker for an element whose concrete type is not known statically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnyElement;

/// A shared view of one element.
pub struct Element<'a, T = AnyElement> {
    doc: &'a Document,
    id: NodeId,
    _type: PhantomData<fn() -> T>,
}

impl<'a, T> Clone for Element<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for Element<'a, T> {}

impl<'a, T> PartialEq for Element<'a, T> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.id == other.id
    }
}

impl<'a, T> Eq for Element<'a, T> {}

impl<'a, T> Element<'a, T> {
    #[inline]
    pub(crate) fn new(doc: &'a Document, id: NodeId) -> Self {
        Self {
            doc,
            id,
            _type: PhantomData,
        }
    }

    /// The owning document.
    #[inline]
    pub fn document(&self) -> &'a Document {
        self.doc
    }

    /// The arena index of this element.
    #[inline]
    pub fn node_id(&self) -> NodeId {
        self.id
    }

    /// The underlying node.
    #[inline]
    pub fn node(&self) -> &'a Node {
        self.doc.node(self.id)
    }

    /// The tag name as written.
    #[inline]
    pub fn tag_name(&self) -> &'a QName {
        self.node().tag_name()
    }

    /// The concrete element kind.
    #[inline]
    pub fn kind(&self) -> ElementKind {
        self.node().kind()
    }

    /// Untyped attribute lookup.
    #[inline]
    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        self.node().attribute(name)
    }

    /// The text content.
    #[inline]
    pub fn text(&self) -> &'a str {
        self.node().text()
    }

    /// Child elements in document order.
    pub fn children(&self) -> Children<'a> {
        Children {
            doc: self.doc,
            ids: self.node().children().iter(),
        }
    }

    /// The owning element, `None` for the root.
    pub fn parent(&self) -> Option<Element<'a>> {
        self.node().parent().map(|id| Element::new(self.doc, id))
    }

    /// The outermost ancestor.
    pub fn document_root(&self) -> Element<'a> {
        let mut top = self.id;
        while let Some(parent) = self.doc.node(top).parent() {
            top = parent;
        }
        Element::new(self.doc, top)
    }

    /// This element and everything below it, depth-first in document order.
    pub fn descendants(&self) -> Descendants<'a> {
        self.doc.descendants(self.id)
    }

    /// Returns true if this element is a `U`.
    #[inline]
    pub fn is<U: ElementType>(&self) -> bool {
        self.kind() == U::KIND
    }

    /// Views this element as a `U` if it is one.
    pub fn cast<U: ElementType>(&self) -> Option<Element<'a, U>> {
        self.is::<U>().then(|| Element::new(self.doc, self.id))
    }

    /// Forgets the static element type.
    #[inline]
    pub fn erase(&self) -> Element<'a> {
        Element::new(self.doc, self.id)
    }

    /// The first direct child of type `U`.
    pub fn find_element<U: ElementType>(&self) -> Option<Element<'a, U>> {
        self.find_elements::<U>().next()
    }

    /// All direct children of type `U`, in document order.
    pub fn find_elements<U: ElementType>(&self) -> ChildrenOfType<'a, U> {
        ChildrenOfType {
            inner: self.children(),
            _type: PhantomData,
        }
    }

    /// Reads an attribute through a typed descriptor.
    #[inline]
    pub fn get<A: Accessor>(&self, accessor: A) -> A::Output<'a> {
        accessor.read(self.node())
    }

    /// Reads a reference attribute and finds the element it names.
    ///
    /// Fails only when the attribute is missing or empty; a dangling
    /// reference yields `Ok(None)`.
    pub fn resolve(&self, accessor: RequiredIdRef) -> Result<Option<Element<'a>>> {
        let reference = accessor.read(self.node())?;
        Ok(reference
            .resolve(self.doc, self.id)
            .map(|id| Element::new(self.doc, id)))
    }
}

impl<'a, T> fmt::Debug for Element<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("tag", &self.tag_name().as_str())
            .field("id", &self.id)
            .finish()
    }
}

/// Writes the braille text below `id`. Note, rest and header data carry
/// analysis rather than braille and are skipped.
fn write_braille(doc: &Document, id: NodeId, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let node = doc.node(id);
    if matches!(
        node.kind(),
        ElementKind::NoteData | ElementKind::RestData | ElementKind::ScoreHeader
    ) {
        return Ok(());
    }
    if !node.text().is_empty() {
        return f.write_str(node.text());
    }
    for &child in node.children() {
        write_braille(doc, child, f)?;
    }
    Ok(())
}

impl<'a, T> fmt::Display for Element<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_braille(self.doc, self.id, f)
    }
}

/// Iterator over the children of an element.
#[derive(Debug, Clone)]
pub struct Children<'a> {
    doc: &'a Document,
    ids: std::slice::Iter<'a, NodeId>,
}

impl<'a> Iterator for Children<'a> {
    type Item = Element<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.ids.next().map(|&id| Element::new(self.doc, id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ids.size_hint()
    }
}

/// Iterator over the children of an element that are of type `U`.
pub struct ChildrenOfType<'a, U> {
    inner: Children<'a>,
    _type: PhantomData<fn() -> U>,
}

impl<'a, U: ElementType> Iterator for ChildrenOfType<'a, U> {
    type Item = Element<'a, U>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.by_ref().find_map(|child| child.cast::<U>())
    }
}

/// Depth-first, pre-order iterator over a subtree.
#[derive(Debug, Clone)]
pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl<'a> Descendants<'a> {
    pub(crate) fn new(doc: &'a Document, from: NodeId) -> Self {
        Self {
            doc,
            stack: vec![from],
        }
    }
}

impl<'a> Iterator for Descendants<'a> {
    type Item = Element<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.doc.node(id).children().iter().rev().copied());
        Some(Element::new(self.doc, id))
    }
}

/// An exclusive view of one element, for edits.
pub struct ElementMut<'a, T = AnyElement> {
    doc: &'a mut Document,
    id: NodeId,
    _type: PhantomData<fn() -> T>,
}

impl<'a, T> ElementMut<'a, T> {
    #[inline]
    pub(crate) fn new(doc: &'a mut Document, id: NodeId) -> Self {
        Self {
            doc,
            id,
            _type: PhantomData,
        }
    }

    /// The arena index of this element.
    #[inline]
    pub fn node_id(&self) -> NodeId {
        self.id
    }

    /// The underlying node.
    #[inline]
    pub fn node(&self) -> &Node {
        self.doc.node(self.id)
    }

    /// A shared view of the same element.
    #[inline]
    pub fn view(&self) -> Element<'_, T> {
        Element::new(self.doc, self.id)
    }

    /// Views this element as a `U` if it is one.
    pub fn cast<U: ElementType>(self) -> Option<ElementMut<'a, U>> {
        if self.node().kind() == U::KIND {
            Some(ElementMut::new(self.doc, self.id))
        } else {
            None
        }
    }

    /// Writes an attribute through a typed descriptor.
    pub fn set<A: Accessor>(&mut self, accessor: A, value: A::Input<'_>) -> Result<()> {
        accessor.write(self.doc.node_mut(self.id), value)
    }

    /// Untyped attribute write. An existing key keeps its position.
    pub fn set_attribute<V: Into<String>>(&mut self, name: &str, value: V) {
        self.doc.node_mut(self.id).set_attribute(name, value);
    }

    /// Untyped attribute removal.
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        self.doc.node_mut(self.id).remove_attribute(name)
    }

    /// Replaces the text content.
    pub fn set_text<S: Into<String>>(&mut self, text: S) {
        self.doc.node_mut(self.id).set_text(text);
    }

    /// Appends a new, empty child element and returns a handle to it.
    pub fn append_element(&mut self, tag: &str) -> ElementMut<'_> {
        let child = self.doc.append_element(self.id, tag);
        ElementMut::new(&mut *self.doc, child)
    }
}

impl<'a, T> fmt::Debug for ElementMut<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementMut")
            .field("tag", &self.node().tag_name().as_str())
            .field("id", &self.id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Accidental, Note, Ornament, Score};
    use crate::enumerations::AboveBelow;
    use crate::parse;
    use pretty_assertions::assert_eq;

    const SCORE: &str = concat!(
        r#"<score version="2010.1">"#,
        r#"<score_header><generic_text id="g1">header</generic_text></score_header>"#,
        r#"<score_data><part id="p1"><part_data>"#,
        r#"<note id="n1"><note_data><duration>4</duration></note_data><note_type id="t1" name="C" value="quarter_or_64th">⠹</note_type></note>"#,
        r#"<ornament id="o1"><accidental id="a1" value="sharp" placement="above">⠩</accidental><ornament_type id="ot1" value="trill">⠖</ornament_type><accidental id="a2" value="flat">⠣</accidental></ornament>"#,
        r#"<slur_ref id="n1" start_ref="n1" type="start"/>"#,
        r#"</part_data></part></score_data></score>"#,
    );

    #[test]
    fn test_navigation() {
        let doc = parse(SCORE, "nav").unwrap();
        let root = doc.root();
        assert!(root.is::<Score>());
        assert_eq!(root.parent(), None);

        let tags: Vec<_> = root.children().map(|c| c.tag_name().as_str()).collect();
        assert_eq!(tags, ["score_header", "score_data"]);

        let note = doc.find_by_id("n1").unwrap();
        assert_eq!(note.document_root(), root);
        assert_eq!(note.parent().unwrap().tag_name(), "part_data");
    }

    #[test]
    fn test_cast() {
        let doc = parse(SCORE, "cast").unwrap();
        let note = doc.find_by_id("n1").unwrap();
        assert!(note.cast::<Note>().is_some());
        assert!(note.cast::<Accidental>().is_none());
    }

    #[test]
    fn test_find_elements_of_type() {
        let doc = parse(SCORE, "find").unwrap();
        let ornament = doc.find_by_id("o1").unwrap().cast::<Ornament>().unwrap();
        let ids: Vec<_> = ornament
            .find_elements::<Accidental>()
            .map(|a| a.attribute("id").unwrap())
            .collect();
        assert_eq!(ids, ["a1", "a2"]);

        let first = ornament.find_element::<Accidental>().unwrap();
        assert_eq!(first.get(Accidental::PLACEMENT), Some(AboveBelow::Above));
    }

    #[test]
    fn test_descendants_preorder() {
        let doc = parse(SCORE, "walk").unwrap();
        let note = doc.find_by_id("n1").unwrap();
        let tags: Vec<_> = note.descendants().map(|e| e.tag_name().as_str()).collect();
        assert_eq!(tags, ["note", "note_data", "duration", "note_type"]);
    }

    #[test]
    fn test_resolve_descriptor() {
        let doc = parse(SCORE, "resolve").unwrap();
        let slur = doc
            .descendants(doc.root_id())
            .find(|e| e.tag_name() == "slur_ref")
            .unwrap();
        let target = slur
            .resolve(RequiredIdRef::new("start_ref"))
            .unwrap()
            .unwrap();
        assert_eq!(target.tag_name(), "note");
        assert!(slur.resolve(RequiredIdRef::new("absent")).is_err());
    }

    #[test]
    fn test_braille_text_skips_analysis() {
        let doc = parse(SCORE, "text").unwrap();
        assert_eq!(doc.root().to_string(), "⠹⠩⠖⠣");
    }

    #[test]
    fn test_element_mut() {
        let mut doc = parse(SCORE, "edit").unwrap();
        let id = doc.find_by_id("a1").unwrap().node_id();

        let mut accidental = doc.element_mut(id).cast::<Accidental>().unwrap();
        accidental.set(Accidental::PLACEMENT, Some(AboveBelow::Below)).unwrap();
        accidental.set(Accidental::EDITORIAL, Some("true")).unwrap();
        assert_eq!(accidental.view().placement(), Some(AboveBelow::Below));

        let names: Vec<_> = accidental
            .node()
            .attributes()
            .iter()
            .map(|a| a.name.as_ref())
            .collect();
        assert_eq!(names, ["id", "value", "placement", "editorial"]);
    }
}
