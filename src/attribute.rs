//! Typed attribute descriptors.
//!
//! Each element type exposes one descriptor constant per declared attribute,
//! for example [`Accidental::PLACEMENT`](crate::elements::Accidental::PLACEMENT).
//! A descriptor knows the attribute name and how to decode and encode its
//! value; [`Element::get`](crate::Element::get) and
//! [`ElementMut::set`](crate::ElementMut::set) apply it to a node.

use crate::catalog::{AttributeDecl, AttributeKind};
use crate::enumerations::Enumeration;
use crate::error::{Error, Result};
use crate::identifier::{IdRef, Identifier};
use crate::node::Node;
use std::fmt;
use std::marker::PhantomData;

/// Reads and writes one attribute of a node.
pub trait Accessor: Copy {
    /// What a read yields.
    type Output<'n>;
    /// What a write takes.
    type Input<'v>;

    /// The attribute name.
    fn name(&self) -> &'static str;

    /// The catalog declaration this descriptor implements.
    fn declaration(&self) -> AttributeDecl;

    /// Decodes the attribute from `node`.
    fn read<'n>(&self, node: &'n Node) -> Self::Output<'n>;

    /// Encodes `value` into `node`.
    fn write(&self, node: &mut Node, value: Self::Input<'_>) -> Result<()>;
}

fn missing(node: &Node, name: &str) -> Error {
    Error::missing_attribute(node.tag_name().as_str(), name)
}

fn declare(name: &str, kind: AttributeKind, required: bool) -> AttributeDecl {
    AttributeDecl {
        name: name.to_string(),
        kind,
        required,
    }
}

/// A string attribute that must be present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredString {
    name: &'static str,
}

impl RequiredString {
    /// Describes the attribute `name`.
    pub const fn new(name: &'static str) -> Self {
        Self { name }
    }
}

impl Accessor for RequiredString {
    type Output<'n> = Result<&'n str>;
    type Input<'v> = &'v str;

    fn name(&self) -> &'static str {
        self.name
    }

    fn declaration(&self) -> AttributeDecl {
        declare(self.name, AttributeKind::String, true)
    }

    fn read<'n>(&self, node: &'n Node) -> Result<&'n str> {
        node.attribute(self.name).ok_or_else(|| missing(node, self.name))
    }

    fn write(&self, node: &mut Node, value: &str) -> Result<()> {
        node.set_attribute(self.name, value);
        Ok(())
    }
}

/// A string attribute that may be absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionalString {
    name: &'static str,
}

impl OptionalString {
    /// Describes the attribute `name`.
    pub const fn new(name: &'static str) -> Self {
        Self { name }
    }
}

impl Accessor for OptionalString {
    type Output<'n> = Option<&'n str>;
    type Input<'v> = Option<&'v str>;

    fn name(&self) -> &'static str {
        self.name
    }

    fn declaration(&self) -> AttributeDecl {
        declare(self.name, AttributeKind::String, false)
    }

    fn read<'n>(&self, node: &'n Node) -> Option<&'n str> {
        node.attribute(self.name)
    }

    fn write(&self, node: &mut Node, value: Option<&str>) -> Result<()> {
        match value {
            Some(v) => node.set_attribute(self.name, v),
            None => {
                node.remove_attribute(self.name);
            }
        }
        Ok(())
    }
}

/// A `"true"`/`"false"` attribute that may be absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionalBool {
    name: &'static str,
}

impl OptionalBool {
    /// Describes the attribute `name`.
    pub const fn new(name: &'static str) -> Self {
        Self { name }
    }
}

impl Accessor for OptionalBool {
    type Output<'n> = Result<Option<bool>>;
    type Input<'v> = Option<bool>;

    fn name(&self) -> &'static str {
        self.name
    }

    fn declaration(&self) -> AttributeDecl {
        declare(self.name, AttributeKind::Boolean, false)
    }

    fn read<'n>(&self, node: &'n Node) -> Result<Option<bool>> {
        match node.attribute(self.name) {
            None => Ok(None),
            Some("true") => Ok(Some(true)),
            Some("false") => Ok(Some(false)),
            Some(other) => Err(Error::illegal_enumeration(
                node.tag_name().as_str(),
                self.name,
                other,
            )),
        }
    }

    fn write(&self, node: &mut Node, value: Option<bool>) -> Result<()> {
        match value {
            Some(true) => node.set_attribute(self.name, "true"),
            Some(false) => node.set_attribute(self.name, "false"),
            None => {
                node.remove_attribute(self.name);
            }
        }
        Ok(())
    }
}

fn enumeration_kind<E: Enumeration>() -> AttributeKind {
    AttributeKind::Enumeration {
        name: E::NAME.to_string(),
        values: E::tokens().into_iter().map(str::to_string).collect(),
    }
}

fn encode<E: Enumeration>(node: &mut Node, name: &str, value: E) -> Result<()> {
    if !E::VARIANTS.contains(&value) {
        return Err(Error::illegal_enumeration(
            node.tag_name().as_str(),
            name,
            value.token(),
        ));
    }
    node.set_attribute(name, value.token());
    Ok(())
}

/// An enumerated attribute that must be present.
pub struct RequiredEnum<E> {
    name: &'static str,
    _values: PhantomData<fn() -> E>,
}

impl<E> RequiredEnum<E> {
    /// Describes the attribute `name`.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _values: PhantomData,
        }
    }
}

impl<E> Clone for RequiredEnum<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for RequiredEnum<E> {}

impl<E: Enumeration> fmt::Debug for RequiredEnum<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequiredEnum")
            .field("name", &self.name)
            .field("values", &E::NAME)
            .finish()
    }
}

impl<E: Enumeration> Accessor for RequiredEnum<E> {
    type Output<'n> = Result<E>;
    type Input<'v> = E;

    fn name(&self) -> &'static str {
        self.name
    }

    fn declaration(&self) -> AttributeDecl {
        declare(self.name, enumeration_kind::<E>(), true)
    }

    fn read<'n>(&self, node: &'n Node) -> Result<E> {
        let raw = node.attribute(self.name).ok_or_else(|| missing(node, self.name))?;
        E::from_token(raw)
            .ok_or_else(|| Error::illegal_enumeration(node.tag_name().as_str(), self.name, raw))
    }

    fn write(&self, node: &mut Node, value: E) -> Result<()> {
        encode(node, self.name, value)
    }
}

/// An enumerated attribute that may be absent.
///
/// A stored token outside the legal set reads as `None`, exactly like an
/// absent attribute. Use [`Document::validate`](crate::Document::validate)
/// to detect such tokens.
pub struct OptionalEnum<E> {
    name: &'static str,
    _values: PhantomData<fn() -> E>,
}

impl<E> OptionalEnum<E> {
    /// Describes the attribute `name`.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _values: PhantomData,
        }
    }
}

impl<E> Clone for OptionalEnum<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for OptionalEnum<E> {}

impl<E: Enumeration> fmt::Debug for OptionalEnum<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionalEnum")
            .field("name", &self.name)
            .field("values", &E::NAME)
            .finish()
    }
}

impl<E: Enumeration> Accessor for OptionalEnum<E> {
    type Output<'n> = Option<E>;
    type Input<'v> = Option<E>;

    fn name(&self) -> &'static str {
        self.name
    }

    fn declaration(&self) -> AttributeDecl {
        declare(self.name, enumeration_kind::<E>(), false)
    }

    fn read<'n>(&self, node: &'n Node) -> Option<E> {
        node.attribute(self.name).and_then(E::from_token)
    }

    fn write(&self, node: &mut Node, value: Option<E>) -> Result<()> {
        match value {
            Some(v) => encode(node, self.name, v),
            None => {
                node.remove_attribute(self.name);
                Ok(())
            }
        }
    }
}

/// A required identifier attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredId {
    name: &'static str,
}

impl RequiredId {
    /// Describes the attribute `name`.
    pub const fn new(name: &'static str) -> Self {
        Self { name }
    }
}

impl Accessor for RequiredId {
    type Output<'n> = Result<Identifier>;
    type Input<'v> = &'v Identifier;

    fn name(&self) -> &'static str {
        self.name
    }

    fn declaration(&self) -> AttributeDecl {
        declare(self.name, AttributeKind::Id, true)
    }

    fn read<'n>(&self, node: &'n Node) -> Result<Identifier> {
        let raw = node.attribute(self.name).ok_or_else(|| missing(node, self.name))?;
        Identifier::new(raw)
    }

    fn write(&self, node: &mut Node, value: &Identifier) -> Result<()> {
        node.set_attribute(self.name, value.as_str());
        Ok(())
    }
}

/// A required identifier-reference attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredIdRef {
    name: &'static str,
}

impl RequiredIdRef {
    /// Describes the attribute `name`.
    pub const fn new(name: &'static str) -> Self {
        Self { name }
    }
}

impl Accessor for RequiredIdRef {
    type Output<'n> = Result<IdRef>;
    type Input<'v> = &'v IdRef;

    fn name(&self) -> &'static str {
        self.name
    }

    fn declaration(&self) -> AttributeDecl {
        declare(self.name, AttributeKind::IdRef, true)
    }

    fn read<'n>(&self, node: &'n Node) -> Result<IdRef> {
        let raw = node.attribute(self.name).ok_or_else(|| missing(node, self.name))?;
        IdRef::new(raw)
    }

    fn write(&self, node: &mut Node, value: &IdRef) -> Result<()> {
        node.set_attribute(self.name, value.as_str());
        Ok(())
    }
}
