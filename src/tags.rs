//! Tagged record stream primitives
//!
//! A DXF record is an ordered sequence of `(group code, value)` pairs,
//! partitioned into named subclasses by sentinel marker tags.  This
//! module defines the tag type, the writer abstraction the export path
//! targets, and an in-memory collector used by the export pipeline and
//! the tests.

use crate::error::Result;
use crate::types::{DxfVersion, TagValue};

/// Group code of the subclass marker tag (`100`, value = subclass name)
pub const SUBCLASS_MARKER: i32 = 100;

/// Group code of the entity type tag (`0`, value = DXFTYPE)
pub const STRUCTURE_MARKER: i32 = 0;

/// One tagged record: group code plus value
#[derive(Debug, Clone, PartialEq)]
pub struct DxfTag {
    /// Group code identifying the semantic slot of the value
    pub code: i32,
    /// The payload
    pub value: TagValue,
}

impl DxfTag {
    /// Create a new tag
    pub fn new(code: i32, value: impl Into<TagValue>) -> Self {
        DxfTag {
            code,
            value: value.into(),
        }
    }

    /// True for subclass marker tags
    pub fn is_subclass_marker(&self) -> bool {
        self.code == SUBCLASS_MARKER
    }
}

/// Sink for exported tags
///
/// The export direction of the processor writes version-filtered tags
/// through this trait; the target version drives which attributes are
/// emitted at all.
pub trait TagWriter {
    /// Target format version of the export pass
    fn dxfversion(&self) -> DxfVersion;

    /// Emit one tag
    fn write_tag(&mut self, code: i32, value: TagValue) -> Result<()>;

    /// Emit a string tag
    fn write_str(&mut self, code: i32, value: &str) -> Result<()> {
        self.write_tag(code, TagValue::Str(value.to_string()))
    }

    /// Emit a subclass marker
    fn write_subclass_marker(&mut self, name: &str) -> Result<()> {
        self.write_str(SUBCLASS_MARKER, name)
    }
}

/// In-memory tag writer collecting the exported sequence
#[derive(Debug)]
pub struct TagCollector {
    version: DxfVersion,
    tags: Vec<DxfTag>,
}

impl TagCollector {
    /// Create a collector targeting the given format version
    pub fn new(version: DxfVersion) -> Self {
        TagCollector {
            version,
            tags: Vec::new(),
        }
    }

    /// Collected tags so far
    pub fn tags(&self) -> &[DxfTag] {
        &self.tags
    }

    /// Consume the collector into its tag sequence
    pub fn into_tags(self) -> Vec<DxfTag> {
        self.tags
    }

    /// True if a tag with this group code was emitted
    pub fn has_code(&self, code: i32) -> bool {
        self.tags.iter().any(|t| t.code == code)
    }

    /// First value emitted under this group code
    pub fn find_code(&self, code: i32) -> Option<&TagValue> {
        self.tags.iter().find(|t| t.code == code).map(|t| &t.value)
    }
}

impl TagWriter for TagCollector {
    fn dxfversion(&self) -> DxfVersion {
        self.version
    }

    fn write_tag(&mut self, code: i32, value: TagValue) -> Result<()> {
        self.tags.push(DxfTag { code, value });
        Ok(())
    }
}
