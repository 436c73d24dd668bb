//! Subclass schemas and composed attribute definitions
//!
//! A subclass schema declares the fields of one named subclass in
//! declaration order; an entity type composes its schemas (base class
//! first, then the named subclasses) into one flat field table.  Field
//! names must be unique across a composed definition, and group-code
//! lookup is per-subclass so loading can stay within subclass bounds.

use indexmap::IndexMap;

use crate::attribs::descriptor::DxfAttr;
use crate::error::{DxfError, Result};

/// Field declarations of one subclass
#[derive(Debug)]
pub struct SubclassDef {
    /// Subclass marker name; `None` for the unnamed base class
    pub name: Option<&'static str>,
    attribs: IndexMap<&'static str, DxfAttr>,
    by_code: IndexMap<i32, Vec<&'static str>>,
    export_order: Option<&'static [&'static str]>,
}

impl SubclassDef {
    /// Build a subclass from its field declarations
    ///
    /// Virtual fields never enter the group-code map.  Duplicate group
    /// codes are legal (DIMSTYLE declares code 70 twice); candidates
    /// keep declaration order so the loader can fill them in sequence.
    pub fn new(name: Option<&'static str>, fields: Vec<(&'static str, DxfAttr)>) -> Self {
        let mut attribs = IndexMap::with_capacity(fields.len());
        let mut by_code: IndexMap<i32, Vec<&'static str>> = IndexMap::new();
        for (field, attr) in fields {
            debug_assert!(
                !attribs.contains_key(field),
                "duplicate field '{}' in subclass {:?}",
                field,
                name
            );
            if !attr.is_virtual() {
                by_code.entry(attr.code).or_default().push(field);
            }
            attribs.insert(field, attr);
        }
        SubclassDef {
            name,
            attribs,
            by_code,
            export_order: None,
        }
    }

    /// Override the export field order
    ///
    /// Writers emit some subclasses in an order differing from the
    /// declaration order; without an override, declaration order is
    /// used.
    pub fn with_export_order(mut self, order: &'static [&'static str]) -> Self {
        self.export_order = Some(order);
        self
    }

    /// Fields in export order, virtual fields excluded
    pub fn export_fields(&self) -> Vec<&'static str> {
        match self.export_order {
            Some(order) => order.to_vec(),
            None => self
                .attribs
                .iter()
                .filter(|(_, a)| !a.is_virtual())
                .map(|(k, _)| *k)
                .collect(),
        }
    }

    /// Number of declared fields
    pub fn len(&self) -> usize {
        self.attribs.len()
    }

    /// True if the subclass declares no fields
    pub fn is_empty(&self) -> bool {
        self.attribs.is_empty()
    }

    /// Descriptor of a field, if declared here
    pub fn get(&self, field: &str) -> Option<&DxfAttr> {
        self.attribs.get(field)
    }

    /// Fields declared under a group code, in declaration order
    pub fn candidates_for_code(&self, code: i32) -> &[&'static str] {
        self.by_code.get(&code).map_or(&[], Vec::as_slice)
    }

    /// Iterate fields in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &DxfAttr)> {
        self.attribs.iter().map(|(k, v)| (*k, v))
    }

    /// Field names in declaration order
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.attribs.keys().copied()
    }
}

/// Composed attribute definition of one entity type
///
/// Holds the subclass list in composition order plus a flat field
/// table for name resolution.  Composition fails on a field name
/// declared by more than one subclass.
#[derive(Debug)]
pub struct DxfAttributes {
    subclasses: Vec<&'static SubclassDef>,
    fields: IndexMap<&'static str, &'static DxfAttr>,
}

impl DxfAttributes {
    /// Compose subclasses into one definition
    pub fn compose(subclasses: Vec<&'static SubclassDef>) -> Result<Self> {
        let mut fields = IndexMap::new();
        for sub in &subclasses {
            for (field, attr) in sub.attribs.iter() {
                if fields.insert(*field, attr).is_some() {
                    return Err(DxfError::DuplicateField(field.to_string()));
                }
            }
        }
        Ok(DxfAttributes { subclasses, fields })
    }

    /// Subclasses in composition order
    pub fn subclasses(&self) -> &[&'static SubclassDef] {
        &self.subclasses
    }

    /// The unnamed base class (always composed first)
    pub fn base_class(&self) -> &'static SubclassDef {
        self.subclasses[0]
    }

    /// True if the definition declares this field
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Resolve a field name to its descriptor
    pub fn resolve(&self, field: &str) -> Result<&'static DxfAttr> {
        self.fields
            .get(field)
            .copied()
            .ok_or_else(|| DxfError::UnknownAttribute(field.to_string()))
    }

    /// Resolve a field name to its interned key and descriptor
    ///
    /// The namespace stores values under the `'static` key so callers
    /// can pass transient strings.
    pub fn resolve_entry(&self, field: &str) -> Result<(&'static str, &'static DxfAttr)> {
        self.fields
            .get_key_value(field)
            .map(|(k, v)| (*k, *v))
            .ok_or_else(|| DxfError::UnknownAttribute(field.to_string()))
    }

    /// Number of declared fields across all subclasses
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True if no fields are declared
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use once_cell::sync::Lazy;

    static BASE: Lazy<SubclassDef> = Lazy::new(|| {
        SubclassDef::new(
            None,
            vec![
                ("handle", DxfAttr::new(5).optional()),
                ("owner", DxfAttr::new(330).optional()),
            ],
        )
    });

    static SUB_A: Lazy<SubclassDef> = Lazy::new(|| {
        SubclassDef::new(
            Some("AcDbTestA"),
            vec![
                ("name", DxfAttr::new(2).default("Standard")),
                ("flags", DxfAttr::new(70).default(0i16)),
                ("fill", DxfAttr::new(70).optional()),
            ],
        )
    });

    static SUB_DUP: Lazy<SubclassDef> = Lazy::new(|| {
        SubclassDef::new(Some("AcDbTestB"), vec![("name", DxfAttr::new(3))])
    });

    #[test]
    fn test_compose_and_resolve() {
        let attribs = DxfAttributes::compose(vec![&*BASE, &*SUB_A]).unwrap();
        assert_eq!(attribs.len(), 5);
        assert_eq!(attribs.resolve("name").unwrap().code, 2);
        assert!(matches!(
            attribs.resolve("nonsense"),
            Err(DxfError::UnknownAttribute(_))
        ));
    }

    #[test]
    fn test_compose_rejects_duplicate_field() {
        let err = DxfAttributes::compose(vec![&*BASE, &*SUB_A, &*SUB_DUP]).unwrap_err();
        assert!(matches!(err, DxfError::DuplicateField(ref f) if f == "name"));
    }

    #[test]
    fn test_code_candidates_keep_declaration_order() {
        assert_eq!(SUB_A.candidates_for_code(70), &["flags", "fill"]);
        assert!(SUB_A.candidates_for_code(999).is_empty());
    }
}
