//! Declarative attribute system
//!
//! The marshaling core: static descriptors declare each field's group
//! code, default, version gate and optional callback pair; subclass
//! schemas group descriptors; the namespace stores per-entity values;
//! the processor moves values between tag streams and namespaces.

pub mod descriptor;
pub mod namespace;
pub mod processor;
pub mod schema;

pub use descriptor::{AttrGetter, AttrKind, AttrSetter, DxfAttr, XType, VIRTUAL_CODE};
pub use namespace::DxfNamespace;
pub use processor::SubclassProcessor;
pub use schema::{DxfAttributes, SubclassDef};
