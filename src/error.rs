//! Error types for parsing, attribute access, and serialization.

use std::fmt::{self, Display};
use std::io;

/// Result type alias for bmml operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for every fallible bmml operation.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    position: Option<Position>,
}

/// Position information for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
    /// Byte offset from start.
    pub offset: usize,
}

/// How an element's content broke its declared content category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// A child element inside simple (text-only) content.
    ElementInSimpleContent,
    /// A child element inside empty content.
    ElementInEmptyContent,
    /// Non-whitespace text inside complex (element-only) content.
    CharactersInComplexContent,
    /// Non-whitespace text inside empty content.
    CharactersInEmptyContent,
    /// The closing tag does not match the opening tag.
    MismatchedEndTag {
        /// The closing tag name that was found.
        found: String,
    },
}

/// The kind of error that occurred.
#[derive(Debug)]
pub enum ErrorKind {
    /// An I/O error occurred.
    Io(io::Error),
    /// Unexpected end of input.
    UnexpectedEof,
    /// Invalid XML syntax.
    Syntax(String),
    /// Invalid XML name.
    InvalidName(String),
    /// Invalid escape sequence.
    InvalidEscape(String),
    /// Invalid UTF-8.
    InvalidUtf8,
    /// Unclosed tag at end of input.
    UnclosedTag(String),
    /// A required attribute was absent on read.
    MissingAttribute {
        /// Tag name of the element.
        element: String,
        /// Name of the missing attribute.
        attribute: String,
    },
    /// A stored token is not among the declared legal values.
    IllegalEnumeration {
        /// Tag name of the element.
        element: String,
        /// Name of the attribute.
        attribute: String,
        /// The offending token.
        value: String,
    },
    /// Content does not fit the element's content category.
    ContentModelViolation {
        /// Tag name of the element whose content is wrong.
        element: String,
        /// What went wrong.
        violation: Violation,
    },
    /// An element appeared where a different one was required.
    UnexpectedElement(String),
    /// A value could not be decoded.
    InvalidValue(String),
    /// Custom error message.
    Custom(String),
}

impl Error {
    /// Creates a new error with the given kind.
    #[inline]
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, position: None }
    }

    /// Creates a new error with position information.
    #[inline]
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    /// Attaches a position if one is known and none is set yet.
    #[inline]
    pub(crate) fn at(mut self, position: Option<Position>) -> Self {
        if self.position.is_none() {
            self.position = position;
        }
        self
    }

    /// Returns the error kind.
    #[inline]
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Returns the position where the error occurred.
    #[inline]
    pub fn position(&self) -> Option<Position> {
        self.position
    }

    /// Returns true for `MissingAttribute`.
    pub fn is_missing_attribute(&self) -> bool {
        matches!(self.kind, ErrorKind::MissingAttribute { .. })
    }

    /// Returns true for `IllegalEnumeration`.
    pub fn is_illegal_enumeration(&self) -> bool {
        matches!(self.kind, ErrorKind::IllegalEnumeration { .. })
    }

    /// Returns true for `ContentModelViolation`.
    pub fn is_content_model_violation(&self) -> bool {
        matches!(self.kind, ErrorKind::ContentModelViolation { .. })
    }

    /// Creates an unexpected EOF error.
    #[inline]
    pub fn unexpected_eof() -> Self {
        Self::new(ErrorKind::UnexpectedEof)
    }

    /// Creates a syntax error.
    #[inline]
    pub fn syntax<S: Into<String>>(msg: S) -> Self {
        Self::new(ErrorKind::Syntax(msg.into()))
    }

    /// Creates an invalid name error.
    #[inline]
    pub fn invalid_name<S: Into<String>>(name: S) -> Self {
        Self::new(ErrorKind::InvalidName(name.into()))
    }

    /// Creates an invalid escape error.
    #[inline]
    pub fn invalid_escape<S: Into<String>>(seq: S) -> Self {
        Self::new(ErrorKind::InvalidEscape(seq.into()))
    }

    /// Creates an unclosed tag error.
    #[inline]
    pub fn unclosed_tag<S: Into<String>>(tag: S) -> Self {
        Self::new(ErrorKind::UnclosedTag(tag.into()))
    }

    /// Creates a missing attribute error.
    pub fn missing_attribute<E: Into<String>, A: Into<String>>(element: E, attribute: A) -> Self {
        Self::new(ErrorKind::MissingAttribute {
            element: element.into(),
            attribute: attribute.into(),
        })
    }

    /// Creates an illegal enumeration error.
    pub fn illegal_enumeration<E, A, V>(element: E, attribute: A, value: V) -> Self
    where
        E: Into<String>,
        A: Into<String>,
        V: Into<String>,
    {
        Self::new(ErrorKind::IllegalEnumeration {
            element: element.into(),
            attribute: attribute.into(),
            value: value.into(),
        })
    }

    /// Creates a content model violation.
    pub fn content_model<E: Into<String>>(element: E, violation: Violation) -> Self {
        Self::new(ErrorKind::ContentModelViolation {
            element: element.into(),
            violation,
        })
    }

    /// Creates an unexpected element error.
    #[inline]
    pub fn unexpected_element<S: Into<String>>(name: S) -> Self {
        Self::new(ErrorKind::UnexpectedElement(name.into()))
    }

    /// Creates an invalid value error.
    #[inline]
    pub fn invalid_value<S: Into<String>>(msg: S) -> Self {
        Self::new(ErrorKind::InvalidValue(msg.into()))
    }

    /// Creates a custom error.
    #[inline]
    pub fn custom<S: Into<String>>(msg: S) -> Self {
        Self::new(ErrorKind::Custom(msg.into()))
    }
}

impl Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::ElementInSimpleContent => f.write_str("element in simple content"),
            Violation::ElementInEmptyContent => f.write_str("element in empty content"),
            Violation::CharactersInComplexContent => f.write_str("characters in complex content"),
            Violation::CharactersInEmptyContent => f.write_str("characters in empty content"),
            Violation::MismatchedEndTag { found } => write!(f, "mismatched closing tag </{}>", found),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::Io(e) => write!(f, "I/O error: {}", e),
            ErrorKind::UnexpectedEof => write!(f, "unexpected end of input"),
            ErrorKind::Syntax(msg) => write!(f, "syntax error: {}", msg),
            ErrorKind::InvalidName(name) => write!(f, "invalid XML name: {}", name),
            ErrorKind::InvalidEscape(seq) => write!(f, "invalid escape sequence: {}", seq),
            ErrorKind::InvalidUtf8 => write!(f, "invalid UTF-8"),
            ErrorKind::UnclosedTag(tag) => write!(f, "unclosed tag: <{}>", tag),
            ErrorKind::MissingAttribute { element, attribute } => {
                write!(f, "missing attribute '{}' on <{}>", attribute, element)
            }
            ErrorKind::IllegalEnumeration { element, attribute, value } => write!(
                f,
                "illegal enumeration value '{}' for attribute '{}' on <{}>",
                value, attribute, element
            ),
            ErrorKind::ContentModelViolation { element, violation } => {
                write!(f, "content model violation in <{}>: {}", element, violation)
            }
            ErrorKind::UnexpectedElement(name) => write!(f, "unexpected element: <{}>", name),
            ErrorKind::InvalidValue(msg) => write!(f, "invalid value: {}", msg),
            ErrorKind::Custom(msg) => write!(f, "{}", msg),
        }?;

        if let Some(pos) = self.position {
            write!(f, " at line {}, column {} (offset {})", pos.line, pos.column, pos.offset)?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            ErrorKind::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::new(ErrorKind::Io(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_attribute_display() {
        let err = Error::missing_attribute("note_type", "value");
        assert_eq!(err.to_string(), "missing attribute 'value' on <note_type>");
        assert!(err.is_missing_attribute());
    }

    #[test]
    fn test_illegal_enumeration_display() {
        let err = Error::illegal_enumeration("barre", "value", "quarter");
        assert_eq!(
            err.to_string(),
            "illegal enumeration value 'quarter' for attribute 'value' on <barre>"
        );
        assert!(err.is_illegal_enumeration());
    }

    #[test]
    fn test_content_model_with_position() {
        let err = Error::content_model("note", Violation::CharactersInComplexContent)
            .with_position(Position { line: 3, column: 7, offset: 40 });
        assert_eq!(
            err.to_string(),
            "content model violation in <note>: characters in complex content at line 3, column 7 (offset 40)"
        );
        assert!(err.is_content_model_violation());
    }

    #[test]
    fn test_mismatched_end_tag() {
        let err = Error::content_model(
            "score",
            Violation::MismatchedEndTag { found: "scor".to_string() },
        );
        assert!(err.to_string().contains("mismatched closing tag </scor>"));
    }

    #[test]
    fn test_at_keeps_first_position() {
        let first = Position { line: 1, column: 2, offset: 1 };
        let err = Error::unexpected_eof()
            .with_position(first)
            .at(Some(Position { line: 9, column: 9, offset: 99 }));
        assert_eq!(err.position(), Some(first));
    }

    #[test]
    fn test_io_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err = Error::from(io_err);
        assert!(err.to_string().contains("I/O error"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
