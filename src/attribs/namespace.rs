//! Attribute namespace
//!
//! The namespace is the per-entity value store: a map from field name
//! to dynamic value, validated against the entity type's composed
//! definition.  Access splits into a document-free API (`get`, `set`)
//! that refuses callback fields, and a document-aware API (`get_with`,
//! `set_with`) that dispatches through their getter/setter pairs.

use indexmap::IndexMap;

use crate::attribs::descriptor::{AttrKind, DxfAttr, XType};
use crate::attribs::schema::DxfAttributes;
use crate::document::DocumentContext;
use crate::error::{DxfError, Result};
use crate::tags::TagWriter;
use crate::types::TagValue;

/// Per-entity attribute value store
#[derive(Debug)]
pub struct DxfNamespace {
    attribs: &'static DxfAttributes,
    values: IndexMap<&'static str, TagValue>,
    destroyed: bool,
}

impl DxfNamespace {
    /// Empty namespace over the given definition
    pub fn new(attribs: &'static DxfAttributes) -> Self {
        DxfNamespace {
            attribs,
            values: IndexMap::new(),
            destroyed: false,
        }
    }

    /// Release storage and refuse all further access
    ///
    /// Entity teardown calls this; afterwards every accessor except
    /// `discard` fails with `UseAfterDestroy`.
    pub(crate) fn poison(&mut self) {
        self.values.clear();
        self.destroyed = true;
    }

    fn ensure_alive(&self, field: &str) -> Result<()> {
        if self.destroyed {
            Err(DxfError::UseAfterDestroy(field.to_string()))
        } else {
            Ok(())
        }
    }

    /// The composed definition this namespace validates against
    pub fn attribs(&self) -> &'static DxfAttributes {
        self.attribs
    }

    /// Get a field value without document access
    ///
    /// Stored value first, descriptor default second.  Callback fields
    /// need a document and fail here with `NoDocument`.
    pub fn get(&self, field: &str) -> Result<TagValue> {
        self.ensure_alive(field)?;
        let (key, attr) = self.attribs.resolve_entry(field)?;
        if attr.is_callback() {
            return Err(DxfError::NoDocument(field.to_string()));
        }
        if let Some(v) = self.values.get(key) {
            return Ok(v.clone());
        }
        attr.default
            .clone()
            .ok_or_else(|| DxfError::AttributeNotSet(field.to_string()))
    }

    /// Get a field value, falling back to `default` when neither a
    /// stored value nor a descriptor default exists
    pub fn get_or(&self, field: &str, default: impl Into<TagValue>) -> Result<TagValue> {
        match self.get(field) {
            Ok(v) => Ok(v),
            Err(DxfError::AttributeNotSet(_)) => Ok(default.into()),
            Err(e) => Err(e),
        }
    }

    /// Get a field value with document access, dispatching callbacks
    pub fn get_with(&self, doc: &dyn DocumentContext, field: &str) -> Result<TagValue> {
        self.ensure_alive(field)?;
        let (_, attr) = self.attribs.resolve_entry(field)?;
        match attr.kind {
            AttrKind::Callback { getter, .. } => getter(self, doc),
            AttrKind::Normal => self.get(field),
        }
    }

    /// Set a field value without document access
    ///
    /// Callback fields need a document and fail with `NoDocument`.
    pub fn set(&mut self, field: &str, value: impl Into<TagValue>) -> Result<()> {
        self.ensure_alive(field)?;
        let (key, attr) = self.attribs.resolve_entry(field)?;
        if attr.is_callback() {
            return Err(DxfError::NoDocument(field.to_string()));
        }
        self.values.insert(key, value.into());
        Ok(())
    }

    /// Set a field value with document access, dispatching callbacks
    pub fn set_with(
        &mut self,
        doc: &mut dyn DocumentContext,
        field: &str,
        value: impl Into<TagValue>,
    ) -> Result<()> {
        self.ensure_alive(field)?;
        let (key, attr) = self.attribs.resolve_entry(field)?;
        match attr.kind {
            AttrKind::Callback { setter, .. } => setter(self, doc, value.into()),
            AttrKind::Normal => {
                self.values.insert(key, value.into());
                Ok(())
            }
        }
    }

    /// Store a raw value, bypassing callback dispatch
    ///
    /// The loader and the callback setters use this to fill backing
    /// fields and to keep legacy text forms of callback attributes.
    pub fn set_raw(&mut self, field: &str, value: impl Into<TagValue>) -> Result<()> {
        self.ensure_alive(field)?;
        let (key, _) = self.attribs.resolve_entry(field)?;
        self.values.insert(key, value.into());
        Ok(())
    }

    /// Raw stored value, ignoring defaults and callbacks
    pub fn get_raw(&self, field: &str) -> Option<&TagValue> {
        self.values.get(field)
    }

    /// True if the field carries a stored value
    ///
    /// For callback fields with a backing raw field, presence of the
    /// backing value counts.
    pub fn has(&self, field: &str) -> bool {
        if self.values.contains_key(field) {
            return true;
        }
        match self.attribs.resolve(field) {
            Ok(attr) => attr
                .backing
                .map_or(false, |raw| self.values.contains_key(raw)),
            Err(_) => false,
        }
    }

    /// Remove a stored value; never fails, unknown fields are ignored
    pub fn discard(&mut self, field: &str) {
        self.values.shift_remove(field);
    }

    /// Number of stored values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if nothing is stored
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate stored values in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &TagValue)> {
        self.values.iter().map(|(k, v)| (*k, v))
    }

    /// Export the named fields in order
    ///
    /// Per field: virtual fields never emit; fields above the writer's
    /// target version are dropped; unset optional fields are skipped
    /// unless `force` is set; unset required fields fall back to their
    /// descriptor default.  Point fields expand into their coordinate
    /// tag group.
    pub fn export_dxf_attribs(
        &self,
        w: &mut dyn TagWriter,
        fields: &[&str],
        force: bool,
    ) -> Result<()> {
        for field in fields {
            self.export_dxf_attribute(w, field, force)?;
        }
        Ok(())
    }

    /// Export a single field, applying version and default policy
    pub fn export_dxf_attribute(
        &self,
        w: &mut dyn TagWriter,
        field: &str,
        force: bool,
    ) -> Result<()> {
        self.ensure_alive(field)?;
        let (key, attr) = self.attribs.resolve_entry(field)?;
        if attr.is_virtual() || !attr.supported_in(w.dxfversion()) {
            return Ok(());
        }
        let value = match self.values.get(key) {
            Some(v) => v.clone(),
            None => {
                if attr.optional && !force {
                    return Ok(());
                }
                match &attr.default {
                    Some(d) => d.clone(),
                    None => return Ok(()),
                }
            }
        };
        emit(w, attr, value)
    }
}

fn emit(w: &mut dyn TagWriter, attr: &DxfAttr, value: TagValue) -> Result<()> {
    match attr.xtype {
        XType::Scalar => w.write_tag(attr.code, value),
        XType::Point2d => {
            let p = value
                .as_point3()
                .ok_or_else(|| DxfError::InvalidValue(attr.code.to_string(), "point2d"))?;
            w.write_tag(attr.code, TagValue::F64(p.x))?;
            w.write_tag(attr.code + 10, TagValue::F64(p.y))
        }
        XType::Point3d => {
            let p = value
                .as_point3()
                .ok_or_else(|| DxfError::InvalidValue(attr.code.to_string(), "point3d"))?;
            w.write_tag(attr.code, TagValue::F64(p.x))?;
            w.write_tag(attr.code + 10, TagValue::F64(p.y))?;
            w.write_tag(attr.code + 20, TagValue::F64(p.z))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribs::descriptor::VIRTUAL_CODE;
    use crate::attribs::schema::SubclassDef;
    use crate::document::SimpleDocument;
    use crate::tags::TagCollector;
    use crate::types::{Vector3, DXF_R12, DXF_R2000, DXF_R2007};
    use once_cell::sync::Lazy;

    fn get_upper(ns: &DxfNamespace, _: &dyn DocumentContext) -> Result<TagValue> {
        match ns.get_raw("raw_name") {
            Some(v) => Ok(TagValue::Str(v.to_string().to_uppercase())),
            None => Err(DxfError::AttributeNotSet("display_name".to_string())),
        }
    }

    fn set_lower(
        ns: &mut DxfNamespace,
        _: &mut dyn DocumentContext,
        value: TagValue,
    ) -> Result<()> {
        let name = value.expect_str("display_name")?.to_lowercase();
        ns.set_raw("raw_name", name)
    }

    static BASE: Lazy<SubclassDef> =
        Lazy::new(|| SubclassDef::new(None, vec![("handle", DxfAttr::new(5).optional())]));

    static SUB: Lazy<SubclassDef> = Lazy::new(|| {
        SubclassDef::new(
            Some("AcDbTest"),
            vec![
                ("name", DxfAttr::new(2).default("Standard")),
                ("height", DxfAttr::new(40).default(2.5).optional()),
                ("width", DxfAttr::new(41)),
                ("center", DxfAttr::new(10).xtype(XType::Point3d)),
                ("modern", DxfAttr::new(290).default(true).dxfversion(DXF_R2007)),
                ("raw_name", DxfAttr::new(3).optional()),
                (
                    "display_name",
                    DxfAttr::new(VIRTUAL_CODE)
                        .callback(get_upper, set_lower)
                        .backing("raw_name"),
                ),
            ],
        )
    });

    static ATTRIBS: Lazy<DxfAttributes> =
        Lazy::new(|| DxfAttributes::compose(vec![&*BASE, &*SUB]).unwrap());

    #[test]
    fn test_get_set_with_defaults() {
        let mut ns = DxfNamespace::new(&ATTRIBS);
        assert_eq!(ns.get("name").unwrap().as_str(), Some("Standard"));
        ns.set("name", "Custom").unwrap();
        assert_eq!(ns.get("name").unwrap().as_str(), Some("Custom"));
        assert!(matches!(
            ns.get("width"),
            Err(DxfError::AttributeNotSet(_))
        ));
        assert_eq!(ns.get_or("width", 9.0).unwrap().as_f64(), Some(9.0));
        assert!(matches!(
            ns.get("no_such_field"),
            Err(DxfError::UnknownAttribute(_))
        ));
    }

    #[test]
    fn test_callback_requires_document() {
        let mut ns = DxfNamespace::new(&ATTRIBS);
        assert!(matches!(
            ns.get("display_name"),
            Err(DxfError::NoDocument(_))
        ));
        assert!(matches!(
            ns.set("display_name", "x"),
            Err(DxfError::NoDocument(_))
        ));
    }

    #[test]
    fn test_callback_dispatch() {
        let mut doc = SimpleDocument::new(DXF_R2000);
        let mut ns = DxfNamespace::new(&ATTRIBS);
        ns.set_with(&mut doc, "display_name", "MixedCase").unwrap();
        assert_eq!(ns.get_raw("raw_name").unwrap().as_str(), Some("mixedcase"));
        assert_eq!(
            ns.get_with(&doc, "display_name").unwrap().as_str(),
            Some("MIXEDCASE")
        );
    }

    #[test]
    fn test_has_sees_backing_field() {
        let mut ns = DxfNamespace::new(&ATTRIBS);
        assert!(!ns.has("display_name"));
        ns.set("raw_name", "x").unwrap();
        assert!(ns.has("display_name"));
        ns.discard("raw_name");
        assert!(!ns.has("display_name"));
        ns.discard("raw_name"); // idempotent
    }

    #[test]
    fn test_export_version_filter() {
        let mut ns = DxfNamespace::new(&ATTRIBS);
        ns.set("modern", false).unwrap();

        let mut w = TagCollector::new(DXF_R12);
        ns.export_dxf_attribs(&mut w, &["modern"], false).unwrap();
        assert!(w.tags().is_empty());

        let mut w = TagCollector::new(DXF_R2007);
        ns.export_dxf_attribs(&mut w, &["modern"], false).unwrap();
        assert_eq!(w.find_code(290), Some(&TagValue::Bool(false)));
    }

    #[test]
    fn test_export_optional_and_force() {
        let ns = DxfNamespace::new(&ATTRIBS);
        let mut w = TagCollector::new(DXF_R2000);
        ns.export_dxf_attribs(&mut w, &["name", "height", "width"], false)
            .unwrap();
        // required 'name' falls back to its default, optional unset
        // 'height' is skipped, 'width' has no default at all
        assert_eq!(w.tags().len(), 1);
        assert_eq!(w.find_code(2).and_then(|v| v.as_str()), Some("Standard"));

        let mut w = TagCollector::new(DXF_R2000);
        ns.export_dxf_attribs(&mut w, &["height"], true).unwrap();
        assert_eq!(w.find_code(40), Some(&TagValue::F64(2.5)));
    }

    #[test]
    fn test_export_point_expands_to_triplet() {
        let mut ns = DxfNamespace::new(&ATTRIBS);
        ns.set("center", Vector3::new(1.0, 2.0, 3.0)).unwrap();
        let mut w = TagCollector::new(DXF_R2000);
        ns.export_dxf_attribs(&mut w, &["center"], false).unwrap();
        assert_eq!(w.find_code(10), Some(&TagValue::F64(1.0)));
        assert_eq!(w.find_code(20), Some(&TagValue::F64(2.0)));
        assert_eq!(w.find_code(30), Some(&TagValue::F64(3.0)));
    }

    #[test]
    fn test_poisoned_namespace_rejects_access() {
        let mut doc = SimpleDocument::new(DXF_R2000);
        let mut ns = DxfNamespace::new(&ATTRIBS);
        ns.set("name", "Custom").unwrap();
        ns.poison();

        assert!(matches!(ns.get("name"), Err(DxfError::UseAfterDestroy(_))));
        assert!(matches!(
            ns.set("name", "Zombie"),
            Err(DxfError::UseAfterDestroy(_))
        ));
        assert!(matches!(
            ns.set_raw("raw_name", "x"),
            Err(DxfError::UseAfterDestroy(_))
        ));
        assert!(matches!(
            ns.get_with(&doc, "display_name"),
            Err(DxfError::UseAfterDestroy(_))
        ));
        assert!(matches!(
            ns.set_with(&mut doc, "display_name", "x"),
            Err(DxfError::UseAfterDestroy(_))
        ));
        let mut w = TagCollector::new(DXF_R2000);
        assert!(ns.export_dxf_attribs(&mut w, &["name"], true).is_err());
        // storage is released, discard stays a no-op
        assert!(ns.is_empty());
        assert!(!ns.has("name"));
        ns.discard("name");
    }

    #[test]
    fn test_virtual_field_never_exports() {
        let mut ns = DxfNamespace::new(&ATTRIBS);
        ns.set("raw_name", "x").unwrap();
        let mut w = TagCollector::new(DXF_R2000);
        ns.export_dxf_attribs(&mut w, &["display_name"], true).unwrap();
        assert!(w.tags().is_empty());
    }
}
