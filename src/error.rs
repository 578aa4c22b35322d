//! Error types for edm-csdl
//!
//! Two kinds of failure exist in this library:
//!
//! - [`Error`]: conditions that stop an operation outright (the document
//!   cannot be read, a resource limit is exceeded).
//! - [`EdmError`]: diagnostics about the *content* of a CSDL document.
//!   These never abort anything on their own; they are accumulated in a
//!   [`DiagnosticSink`] while parsing continues with a best-effort value.

use crate::locations::Location;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Result type alias using the crate [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for edm-csdl operations
#[derive(Error, Debug)]
pub enum Error {
    /// Resource loading error
    #[error("resource error: {0}")]
    Resource(String),

    /// Limit exceeded error
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error (CLI reports)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Diagnostic codes reported while reading CSDL and building the EDM model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EdmErrorCode {
    // Document structure (fatal to the parse)
    /// The document contains no root element
    EmptyFile,
    /// The XML itself is malformed, or a reader limit was hit
    XmlError,

    // Grammar
    /// An element is not allowed at this position, or was never used
    UnexpectedXmlElement,
    /// An attribute is not allowed on this element
    UnexpectedXmlAttribute,
    /// A node kind is not allowed at this position
    UnexpectedXmlNodeType,
    /// Character data appears where only elements are allowed
    TextNotAllowed,
    /// A required attribute is absent
    MissingAttribute,
    /// A required child element is absent
    MissingElement,

    // Values
    /// Not a 32-bit integer
    InvalidInteger,
    /// Not a 64-bit integer
    InvalidLong,
    /// Not `true` or `false`
    InvalidBoolean,
    /// Not a non-negative integer or `max`
    InvalidMaxLength,
    /// Not a non-negative integer or `variable`
    InvalidSrid,
    /// Not a non-negative integer or `variable`
    InvalidScale,
    /// Not a non-negative integer
    InvalidPrecision,
    /// Not one of `1`, `0..1`, `*`
    InvalidMultiplicity,
    /// Not one of `None`, `Cascade`, `SetNull`, `SetDefault`
    InvalidOnDelete,
    /// Not one of `None`, `Fixed`
    InvalidConcurrencyMode,
    /// Not one of `In`, `Out`, `InOut`
    InvalidParameterMode,
    /// A type name that violates the `Collection(T)` / `Ref(T)` grammar
    InvalidTypeName,
    /// A malformed dotted name
    InvalidQualifiedName,
    /// A malformed simple identifier
    InvalidName,
    /// A malformed `Container/EntitySet` path
    InvalidEntitySetPath,
    /// A malformed `Namespace.Enum/Member` path
    InvalidEnumMemberPath,

    // Semantic model
    /// Two elements share a name where names must be unique
    AlreadyDefined,
    /// A name resolves to more than one candidate
    BadAmbiguousElementBinding,
    /// An entity container extends itself, directly or indirectly
    BadCyclicEntityContainer,
    /// A type name does not resolve
    BadUnresolvedType,
    /// A primitive type name does not resolve
    BadUnresolvedPrimitiveType,
    /// An `Extends` reference does not resolve
    BadUnresolvedEntityContainer,
    /// A navigation property's association or role does not resolve
    BadUnresolvedNavigationPropertyPath,
    /// A spatial type reference is inconsistent
    BadSpatialTypeReference,
    /// An enum member value does not fit the underlying type
    EnumMemberValueOutOfRange,
    /// An enum underlying type is not an integral primitive
    InvalidEnumUnderlyingType,
}

impl EdmErrorCode {
    /// Whether this code terminates a document parse
    pub fn is_fatal(&self) -> bool {
        matches!(self, EdmErrorCode::EmptyFile | EdmErrorCode::XmlError)
    }
}

impl fmt::Display for EdmErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A located diagnostic: `(Location, EdmErrorCode, message)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EdmError {
    /// Where the problem was found
    pub location: Location,
    /// Machine-readable code
    pub code: EdmErrorCode,
    /// Human-readable description
    pub message: String,
}

impl EdmError {
    /// Create a new diagnostic
    pub fn new(location: Location, code: EdmErrorCode, message: impl Into<String>) -> Self {
        Self {
            location,
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for EdmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {} : {}", self.location, self.code, self.message)
    }
}

impl std::error::Error for EdmError {}

/// Destination for diagnostics produced during parsing and model building
pub trait DiagnosticSink {
    /// Record one diagnostic
    fn report(&mut self, error: EdmError);

    /// Convenience wrapper around [`DiagnosticSink::report`]
    fn report_error(&mut self, location: Location, code: EdmErrorCode, message: String) {
        self.report(EdmError::new(location, code, message));
    }
}

impl DiagnosticSink for Vec<EdmError> {
    fn report(&mut self, error: EdmError) {
        self.push(error);
    }
}
