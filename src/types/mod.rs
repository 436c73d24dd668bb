//! Core value types shared across the crate

pub mod handle;
pub mod value;
pub mod vector;
pub mod version;

pub use handle::Handle;
pub use value::TagValue;
pub use vector::{Vector2, Vector3};
pub use version::{
    DxfVersion, DXF_R12, DXF_R2000, DXF_R2004, DXF_R2007, DXF_R2013, DXF_R2018,
};
