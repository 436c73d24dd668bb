//! Attribute descriptors
//!
//! A descriptor is the static declaration of one field: its group code,
//! default value, minimum format version, and — for callback attributes
//! — the getter/setter pair that computes the logical value from raw
//! storage.  Descriptors are immutable, shared metadata; schemas hand
//! out references to them.

use crate::attribs::namespace::DxfNamespace;
use crate::document::DocumentContext;
use crate::error::Result;
use crate::types::{DxfVersion, TagValue};

/// Sentinel group code for virtual attributes
///
/// Virtual attributes never materialize as raw tags; they exist only
/// through their callbacks.  Real group codes are non-negative, so the
/// loader can never match this.
pub const VIRTUAL_CODE: i32 = -1;

/// Getter callback: computes the logical value from raw storage,
/// resolving cross-references through the document
pub type AttrGetter = fn(&DxfNamespace, &dyn DocumentContext) -> Result<TagValue>;

/// Setter callback: resolves the logical value (usually a name) and
/// stores the raw form (usually a handle) under the backing field
pub type AttrSetter = fn(&mut DxfNamespace, &mut dyn DocumentContext, TagValue) -> Result<()>;

/// Descriptor kind
///
/// A callback descriptor always carries both halves of its pair; the
/// invariant is enforced by construction.
#[derive(Clone, Copy)]
pub enum AttrKind {
    /// Plain stored value
    Normal,
    /// Callback-computed value
    Callback {
        /// Resolves raw storage to the logical value
        getter: AttrGetter,
        /// Resolves the logical value into raw storage
        setter: AttrSetter,
    },
}

impl std::fmt::Debug for AttrKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttrKind::Normal => write!(f, "Normal"),
            AttrKind::Callback { .. } => write!(f, "Callback"),
        }
    }
}

/// Value grouping of an attribute in the tag stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XType {
    /// One tag, one value
    Scalar,
    /// Coordinate pair at codes (c, c+10)
    Point2d,
    /// Coordinate triplet at codes (c, c+10, c+20)
    Point3d,
}

/// Static declaration of one DXF attribute
#[derive(Debug, Clone)]
pub struct DxfAttr {
    /// Group code in the tag stream (or [`VIRTUAL_CODE`])
    pub code: i32,
    /// Normal or callback
    pub kind: AttrKind,
    /// Default value when unset
    pub default: Option<TagValue>,
    /// Minimum format version; `None` means present in all versions
    pub dxfversion: Option<DxfVersion>,
    /// Optional attributes are omitted on export when unset
    pub optional: bool,
    /// Value grouping
    pub xtype: XType,
    /// Raw field a callback attribute reads/writes (e.g. `dimtxsty`
    /// resolves through `dimtxsty_handle`)
    pub backing: Option<&'static str>,
}

impl DxfAttr {
    /// New normal scalar descriptor with no default and no version gate
    pub fn new(code: i32) -> Self {
        DxfAttr {
            code,
            kind: AttrKind::Normal,
            default: None,
            dxfversion: None,
            optional: false,
            xtype: XType::Scalar,
            backing: None,
        }
    }

    /// Set the default value
    pub fn default(mut self, value: impl Into<TagValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Gate the attribute on a minimum format version
    pub fn dxfversion(mut self, version: DxfVersion) -> Self {
        self.dxfversion = Some(version);
        self
    }

    /// Mark the attribute optional
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Set the value grouping
    pub fn xtype(mut self, xtype: XType) -> Self {
        self.xtype = xtype;
        self
    }

    /// Turn the descriptor into a callback attribute
    pub fn callback(mut self, getter: AttrGetter, setter: AttrSetter) -> Self {
        self.kind = AttrKind::Callback { getter, setter };
        self
    }

    /// Name the backing raw field of a callback attribute
    pub fn backing(mut self, field: &'static str) -> Self {
        self.backing = Some(field);
        self
    }

    /// True for callback descriptors
    pub fn is_callback(&self) -> bool {
        matches!(self.kind, AttrKind::Callback { .. })
    }

    /// True for virtual descriptors (callback with the sentinel code)
    pub fn is_virtual(&self) -> bool {
        self.code == VIRTUAL_CODE
    }

    /// True if the attribute exists in the given target version
    pub fn supported_in(&self, version: DxfVersion) -> bool {
        self.dxfversion.map_or(true, |min| min <= version)
    }
}
