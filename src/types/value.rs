//! Tag value payload
//!
//! The attribute namespace stores one dynamic value per field.  The
//! variant set mirrors the group-code value families of the tag stream:
//! strings, reals, three integer widths, booleans, handles and grouped
//! point coordinates.

use crate::error::{DxfError, Result};
use crate::types::{Handle, Vector2, Vector3};
use std::fmt;

/// Dynamic value stored under a group code or an attribute name
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    /// String value (codes 0-9, 100, 300-309, ...)
    Str(String),
    /// Floating point value (codes 10-59, 140-149, ...)
    F64(f64),
    /// 16-bit integer (codes 60-79, 170-179, 270-289, ...)
    I16(i16),
    /// 32-bit integer (codes 90-99, 420-429, ...)
    I32(i32),
    /// 64-bit integer (codes 160-169)
    I64(i64),
    /// Boolean (codes 290-299)
    Bool(bool),
    /// Object handle (codes 5, 105, 320-369)
    Handle(Handle),
    /// Grouped 2D point (code c with c+10)
    Point2(Vector2),
    /// Grouped 3D point (code c with c+10, c+20)
    Point3(Vector3),
}

impl TagValue {
    /// Short type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            TagValue::Str(_) => "string",
            TagValue::F64(_) => "double",
            TagValue::I16(_) => "i16",
            TagValue::I32(_) => "i32",
            TagValue::I64(_) => "i64",
            TagValue::Bool(_) => "bool",
            TagValue::Handle(_) => "handle",
            TagValue::Point2(_) => "point2d",
            TagValue::Point3(_) => "point3d",
        }
    }

    /// String access
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TagValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Floating point access; integers widen losslessly
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            TagValue::F64(v) => Some(*v),
            TagValue::I16(v) => Some(*v as f64),
            TagValue::I32(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// 64-bit integer access; narrower integers and booleans widen
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            TagValue::I16(v) => Some(*v as i64),
            TagValue::I32(v) => Some(*v as i64),
            TagValue::I64(v) => Some(*v),
            TagValue::Bool(v) => Some(*v as i64),
            _ => None,
        }
    }

    /// Boolean access; integers follow the DXF 0/non-0 convention
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            TagValue::Bool(v) => Some(*v),
            TagValue::I16(v) => Some(*v != 0),
            TagValue::I32(v) => Some(*v != 0),
            _ => None,
        }
    }

    /// Handle access; hex strings parse on demand (legacy streams store
    /// handle references as plain text tags)
    pub fn as_handle(&self) -> Option<Handle> {
        match self {
            TagValue::Handle(h) => Some(*h),
            TagValue::Str(s) => Handle::parse_hex(s).ok(),
            _ => None,
        }
    }

    /// 3D point access
    pub fn as_point3(&self) -> Option<Vector3> {
        match self {
            TagValue::Point3(p) => Some(*p),
            TagValue::Point2(p) => Some(Vector3::new(p.x, p.y, 0.0)),
            _ => None,
        }
    }

    /// Checked string access with attribute context for the error
    pub fn expect_str(&self, attr: &str) -> Result<&str> {
        self.as_str()
            .ok_or_else(|| DxfError::InvalidValue(attr.to_string(), "string"))
    }

    /// Checked handle access with attribute context for the error
    pub fn expect_handle(&self, attr: &str) -> Result<Handle> {
        self.as_handle()
            .ok_or_else(|| DxfError::InvalidValue(attr.to_string(), "handle"))
    }
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagValue::Str(s) => f.write_str(s),
            TagValue::F64(v) => write!(f, "{}", v),
            TagValue::I16(v) => write!(f, "{}", v),
            TagValue::I32(v) => write!(f, "{}", v),
            TagValue::I64(v) => write!(f, "{}", v),
            TagValue::Bool(v) => write!(f, "{}", *v as u8),
            TagValue::Handle(h) => f.write_str(&h.to_hex()),
            TagValue::Point2(p) => write!(f, "{}", p),
            TagValue::Point3(p) => write!(f, "{}", p),
        }
    }
}

impl From<&str> for TagValue {
    fn from(v: &str) -> Self {
        TagValue::Str(v.to_string())
    }
}

impl From<String> for TagValue {
    fn from(v: String) -> Self {
        TagValue::Str(v)
    }
}

impl From<f64> for TagValue {
    fn from(v: f64) -> Self {
        TagValue::F64(v)
    }
}

impl From<i16> for TagValue {
    fn from(v: i16) -> Self {
        TagValue::I16(v)
    }
}

impl From<i32> for TagValue {
    fn from(v: i32) -> Self {
        TagValue::I32(v)
    }
}

impl From<i64> for TagValue {
    fn from(v: i64) -> Self {
        TagValue::I64(v)
    }
}

impl From<bool> for TagValue {
    fn from(v: bool) -> Self {
        TagValue::Bool(v)
    }
}

impl From<Handle> for TagValue {
    fn from(v: Handle) -> Self {
        TagValue::Handle(v)
    }
}

impl From<Vector2> for TagValue {
    fn from(v: Vector2) -> Self {
        TagValue::Point2(v)
    }
}

impl From<Vector3> for TagValue {
    fn from(v: Vector3) -> Self {
        TagValue::Point3(v)
    }
}
