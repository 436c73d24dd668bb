//! Handle type for DXF objects
//!
//! Handles are document-unique identifiers used for cross-references
//! instead of embedding objects directly.  In the tag stream they travel
//! as uppercase hexadecimal text.

use crate::error::{DxfError, Result};
use std::fmt;

/// A unique identifier for DXF objects
///
/// Handle 0 is reserved: an unset or "no reference" value.  The DXF text
/// form is plain uppercase hex without a prefix (e.g. `1F`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(u64);

impl Handle {
    /// The null/invalid handle (0)
    pub const NULL: Handle = Handle(0);

    /// Create a new handle from a u64 value
    #[inline]
    pub const fn new(value: u64) -> Self {
        Handle(value)
    }

    /// Get the raw u64 value
    #[inline]
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Check if this is a null/invalid handle
    #[inline]
    pub const fn is_null(&self) -> bool {
        self.0 == 0
    }

    /// Check if this is a valid handle
    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.0 != 0
    }

    /// Parse a handle from its DXF hex text form
    pub fn parse_hex(text: &str) -> Result<Handle> {
        u64::from_str_radix(text.trim(), 16)
            .map(Handle)
            .map_err(|_| DxfError::Custom(format!("invalid handle text: '{}'", text)))
    }

    /// DXF hex text form (uppercase, no prefix)
    pub fn to_hex(&self) -> String {
        format!("{:X}", self.0)
    }
}

impl Default for Handle {
    fn default() -> Self {
        Handle::NULL
    }
}

impl From<u64> for Handle {
    fn from(value: u64) -> Self {
        Handle(value)
    }
}

impl From<Handle> for u64 {
    fn from(handle: Handle) -> Self {
        handle.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#X}", self.0)
    }
}

impl fmt::UpperHex for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.0, f)
    }
}
