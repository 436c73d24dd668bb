//! Error types for dxf-attribs-rs

use thiserror::Error;

/// Main error type for attribute marshaling operations
#[derive(Debug, Error)]
pub enum DxfError {
    /// Requested attribute name is not part of the bound schema
    #[error("Unknown DXF attribute: {0}")]
    UnknownAttribute(String),

    /// Attribute has no stored value and no default anywhere
    #[error("DXF attribute not set: {0}")]
    AttributeNotSet(String),

    /// A stored cross-reference handle does not resolve in the document
    #[error("Unresolved reference: {0}")]
    UnresolvedReference(String),

    /// Entity sequence violated the expected flat structure
    #[error("DXF structure error: {0}")]
    Structure(String),

    /// Operation attempted on a destroyed entity
    #[error("Use after destroy: {0}")]
    UseAfterDestroy(String),

    /// Two composed subclasses declare the same field name
    #[error("Duplicate attribute in composed schema: {0}")]
    DuplicateField(String),

    /// Handle lookup failed in the document
    #[error("Unknown handle: {0:#X}")]
    UnknownHandle(u64),

    /// Name lookup failed in a resource table
    #[error("Unknown table entry: {0}")]
    UnknownName(String),

    /// A callback attribute was accessed without a document context
    #[error("No document bound: attribute '{0}' requires document resolution")]
    NoDocument(String),

    /// Tag value has the wrong type for the requested conversion
    #[error("Invalid tag value for '{0}': expected {1}")]
    InvalidValue(String, &'static str),

    /// Unknown entity type requested from the factory
    #[error("Invalid entity type: {0}")]
    InvalidEntityType(String),

    /// Generic error with custom message
    #[error("{0}")]
    Custom(String),
}

/// Result type alias for dxf-attribs-rs operations
pub type Result<T> = std::result::Result<T, DxfError>;

impl From<String> for DxfError {
    fn from(s: String) -> Self {
        DxfError::Custom(s)
    }
}

impl From<&str> for DxfError {
    fn from(s: &str) -> Self {
        DxfError::Custom(s.to_string())
    }
}
