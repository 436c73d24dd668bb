//! Shared helpers for the integration tests

use dxf_attribs_rs::document::{ResourceTable, SimpleDocument};
use dxf_attribs_rs::entities::EntityFactory;
use dxf_attribs_rs::tags::DxfTag;
use dxf_attribs_rs::types::DxfVersion;

/// Document preloaded with the resources the standard entity types
/// reference by name
pub fn test_document(version: DxfVersion) -> SimpleDocument {
    let mut doc = SimpleDocument::new(version);
    doc.add_entry(ResourceTable::TextStyles, "Standard");
    doc.add_entry(ResourceTable::TextStyles, "Arial");
    doc.add_entry(ResourceTable::LineTypes, "Continuous");
    doc.add_entry(ResourceTable::LineTypes, "DASHED");
    doc
}

/// Factory with the built-in entity set
pub fn factory() -> EntityFactory {
    EntityFactory::standard()
}

/// Shorthand tag constructor
pub fn tag(code: i32, value: impl Into<dxf_attribs_rs::types::TagValue>) -> DxfTag {
    DxfTag::new(code, value)
}
