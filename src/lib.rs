//! Versioned marshaling engine for DXF-style tagged records
//!
//! Entity state lives in dynamic per-entity attribute namespaces that
//! are validated against static, subclass-grouped schemas.  The same
//! schema drives both directions: loading splits a record's tag stream
//! on subclass markers and matches group codes against descriptors;
//! exporting walks version-keyed field lists and emits only what the
//! target format version supports.
//!
//! Cross-reference attributes (text styles, arrowhead blocks,
//! linetypes) store handles but are addressed by name through callback
//! descriptors; the surrounding document is injected behind the
//! [`document::DocumentContext`] trait.
//!
//! ```
//! use dxf_attribs_rs::entities::EntityFactory;
//! use dxf_attribs_rs::tags::TagCollector;
//! use dxf_attribs_rs::types::DXF_R2000;
//!
//! let factory = EntityFactory::standard();
//! let mut style = factory.new_entity("DIMSTYLE")?;
//! style.dxf.set("name", "Architectural")?;
//! style.dxf.set("dimtxt", 3.5)?;
//!
//! let mut writer = TagCollector::new(DXF_R2000);
//! style.export(&mut writer, None)?;
//! assert!(writer.has_code(140));
//! # Ok::<(), dxf_attribs_rs::error::DxfError>(())
//! ```

pub mod arrows;
pub mod attribs;
pub mod document;
pub mod error;
pub mod notification;
pub mod tags;
pub mod types;

pub mod entities;

pub use attribs::{DxfAttr, DxfAttributes, DxfNamespace, SubclassDef, SubclassProcessor};
pub use document::{DocumentContext, ResourceTable, SimpleDocument};
pub use entities::{DxfEntity, EntityFactory, EntityLinker};
pub use error::{DxfError, Result};
pub use notification::{Notification, NotificationCollection, NotificationType};
pub use tags::{DxfTag, TagCollector, TagWriter};
pub use types::{DxfVersion, Handle, TagValue, Vector2, Vector3};
