//! Subclass processor: the load direction of the marshaler
//!
//! Splits a raw tag stream into its subclass slices and matches tags
//! against subclass schemas, filling an attribute namespace.  Modern
//! streams address subclasses by marker name; legacy (R12) streams have
//! no markers and load everything from the single base slice.

use crate::attribs::descriptor::XType;
use crate::attribs::namespace::DxfNamespace;
use crate::attribs::schema::SubclassDef;
use crate::error::Result;
use crate::notification::NotificationCollection;
use crate::tags::{DxfTag, STRUCTURE_MARKER};
use crate::types::{DxfVersion, TagValue};

/// Tag stream of one entity record, split into subclass slices
#[derive(Debug)]
pub struct SubclassProcessor {
    subclasses: Vec<Vec<DxfTag>>,
    names: Vec<Option<String>>,
    /// Version of the source stream, if known
    pub dxfversion: Option<DxfVersion>,
    /// Legacy mode: no subclass structure, version gates are ignored
    pub r12: bool,
}

impl SubclassProcessor {
    /// Split a record's tags on subclass markers
    ///
    /// Slice 0 is the unnamed base class (everything before the first
    /// marker); each marker opens a new named slice.  Marker tags are
    /// consumed by the split.  With no version given, legacy mode is
    /// inferred from the absence of markers.
    pub fn new(tags: Vec<DxfTag>, dxfversion: Option<DxfVersion>) -> Self {
        let mut subclasses: Vec<Vec<DxfTag>> = vec![Vec::new()];
        let mut names: Vec<Option<String>> = vec![None];
        for tag in tags {
            if tag.is_subclass_marker() {
                names.push(tag.value.as_str().map(str::to_string));
                subclasses.push(Vec::new());
            } else {
                subclasses.last_mut().unwrap().push(tag);
            }
        }
        let r12 = match dxfversion {
            Some(v) => v.is_r12(),
            None => subclasses.len() < 2,
        };
        SubclassProcessor {
            subclasses,
            names,
            dxfversion,
            r12,
        }
    }

    /// Number of subclass slices (base class included)
    pub fn subclass_count(&self) -> usize {
        self.subclasses.len()
    }

    /// Tags of a subclass slice
    pub fn subclass(&self, index: usize) -> Option<&[DxfTag]> {
        self.subclasses.get(index).map(Vec::as_slice)
    }

    /// Find a subclass slice by marker name
    pub fn find_subclass(&self, name: &str) -> Option<usize> {
        self.names
            .iter()
            .position(|n| n.as_deref() == Some(name))
    }

    /// Fold leftover base class tags into the AcDbEntity slice
    ///
    /// Some writers mix base class tags into the entity subclass area
    /// and vice versa; graphic entities tolerate this by moving the
    /// unconsumed base tags behind the first named subclass before it
    /// is matched.  No-op in legacy mode or without named subclasses.
    pub fn append_base_class_to_acdb_entity(&mut self) {
        if self.r12 || self.subclasses.len() < 2 {
            return;
        }
        let base: Vec<DxfTag> = std::mem::take(&mut self.subclasses[0])
            .into_iter()
            .filter(|t| t.code != STRUCTURE_MARKER)
            .collect();
        self.subclasses[1].extend(base);
    }

    /// Match one subclass slice against a schema and fill the namespace
    ///
    /// Consumed tags are removed from the slice; the unconsumed rest is
    /// kept in place and returned for diagnostics.  In legacy mode the
    /// base slice is always used and version gates are ignored.  A
    /// group code declared by several fields fills them in declaration
    /// order; once all are filled the last one is overwritten
    /// (last-write-wins).
    pub fn load_dxfattribs_into_namespace(
        &mut self,
        ns: &mut DxfNamespace,
        def: &SubclassDef,
        index: Option<usize>,
    ) -> Result<Vec<DxfTag>> {
        let idx = if self.r12 {
            Some(0)
        } else {
            index.or_else(|| def.name.and_then(|n| self.find_subclass(n)))
        };
        let idx = match idx {
            Some(i) if i < self.subclasses.len() => i,
            _ => return Ok(Vec::new()),
        };

        let tags = std::mem::take(&mut self.subclasses[idx]);
        let mut unconsumed = Vec::new();
        let mut i = 0;
        while i < tags.len() {
            let tag = &tags[i];
            if tag.code == STRUCTURE_MARKER {
                // the (0, DXFTYPE) tag of the base slice carries no
                // attribute value
                i += 1;
                continue;
            }
            let field = match self.select_field(ns, def, tag.code) {
                Some(f) => f,
                None => {
                    unconsumed.push(tag.clone());
                    i += 1;
                    continue;
                }
            };
            let attr = def.get(field).unwrap();
            match attr.xtype {
                XType::Scalar => {
                    ns.set_raw(field, tag.value.clone())?;
                }
                XType::Point2d | XType::Point3d => {
                    // producers may pre-group coordinates; otherwise
                    // gather the axis tags that follow in sequence
                    if matches!(tag.value, TagValue::Point2(_) | TagValue::Point3(_)) {
                        ns.set_raw(field, tag.value.clone())?;
                    } else {
                        let x = tag.value.as_f64().unwrap_or(0.0);
                        let mut y = 0.0;
                        let mut z = 0.0;
                        if i + 1 < tags.len() && tags[i + 1].code == tag.code + 10 {
                            y = tags[i + 1].value.as_f64().unwrap_or(0.0);
                            i += 1;
                        }
                        if attr.xtype == XType::Point3d
                            && i + 1 < tags.len()
                            && tags[i + 1].code == tag.code + 20
                        {
                            z = tags[i + 1].value.as_f64().unwrap_or(0.0);
                            i += 1;
                        }
                        if attr.xtype == XType::Point3d {
                            ns.set_raw(field, crate::types::Vector3::new(x, y, z))?;
                        } else {
                            ns.set_raw(field, crate::types::Vector2::new(x, y))?;
                        }
                    }
                }
            }
            i += 1;
        }
        self.subclasses[idx] = unconsumed.clone();
        Ok(unconsumed)
    }

    /// Pick the target field for a group code
    ///
    /// Candidates are tried in declaration order, skipping fields whose
    /// minimum version exceeds the stream version; the first unfilled
    /// eligible candidate wins, else the last eligible one is
    /// overwritten.
    fn select_field(
        &self,
        ns: &DxfNamespace,
        def: &SubclassDef,
        code: i32,
    ) -> Option<&'static str> {
        let mut fallback = None;
        for &field in def.candidates_for_code(code) {
            let attr = def.get(field)?;
            let eligible = self.r12
                || self
                    .dxfversion
                    .map_or(true, |stream| attr.supported_in(stream));
            if !eligible {
                continue;
            }
            if ns.get_raw(field).is_none() {
                return Some(field);
            }
            fallback = Some(field);
        }
        fallback
    }

    /// Record unconsumed tags as diagnostics
    pub fn log_unprocessed_tags(
        &self,
        tags: &[DxfTag],
        subclass: Option<&str>,
        notes: &mut NotificationCollection,
    ) {
        for tag in tags {
            log::debug!(
                "ignored tag ({}, '{}') in subclass {}",
                tag.code,
                tag.value,
                subclass.unwrap_or("<base>")
            );
            notes.unprocessed_tag(subclass, tag);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribs::descriptor::DxfAttr;
    use crate::attribs::schema::DxfAttributes;
    use crate::notification::NotificationType;
    use crate::types::{Vector3, DXF_R12, DXF_R2000, DXF_R2007};
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

    static SUB: Lazy<SubclassDef> = Lazy::new(|| {
        SubclassDef::new(
            Some("AcDbTest"),
            vec![
                ("name", DxfAttr::new(2).default("Standard")),
                ("flags", DxfAttr::new(70).default(0i16)),
                ("fill", DxfAttr::new(70).dxfversion(DXF_R2007).optional()),
                ("height", DxfAttr::new(40).optional()),
                ("center", DxfAttr::new(10).xtype(XType::Point3d)),
                ("modern", DxfAttr::new(290).dxfversion(DXF_R2007).optional()),
            ],
        )
    });

    static ATTRIBS: Lazy<DxfAttributes> =
        Lazy::new(|| DxfAttributes::compose(vec![&*BASE, &*SUB]).unwrap());

    fn modern_tags() -> Vec<DxfTag> {
        vec![
            DxfTag::new(0, "TEST"),
            DxfTag::new(5, "1F"),
            DxfTag::new(330, "2"),
            DxfTag::new(100, "AcDbTest"),
            DxfTag::new(2, "MyStyle"),
            DxfTag::new(70, 4i16),
            DxfTag::new(10, 1.0),
            DxfTag::new(20, 2.0),
            DxfTag::new(30, 3.0),
            DxfTag::new(999, "junk"),
        ]
    }

    #[test]
    fn test_subclass_split() {
        let p = SubclassProcessor::new(modern_tags(), Some(DXF_R2000));
        assert_eq!(p.subclass_count(), 2);
        assert!(!p.r12);
        assert_eq!(p.find_subclass("AcDbTest"), Some(1));
        assert_eq!(p.find_subclass("AcDbMissing"), None);
        // markers themselves are consumed by the split
        assert!(p.subclass(1).unwrap().iter().all(|t| !t.is_subclass_marker()));
    }

    #[test]
    fn test_r12_inferred_from_missing_markers() {
        let p = SubclassProcessor::new(vec![DxfTag::new(2, "x")], None);
        assert!(p.r12);
        let p = SubclassProcessor::new(modern_tags(), None);
        assert!(!p.r12);
    }

    #[test]
    fn test_load_modern_stream() {
        let mut p = SubclassProcessor::new(modern_tags(), Some(DXF_R2000));
        let mut ns = DxfNamespace::new(&ATTRIBS);

        let rest = p
            .load_dxfattribs_into_namespace(&mut ns, &BASE, Some(0))
            .unwrap();
        assert!(rest.is_empty());
        assert_eq!(ns.get_raw("handle").unwrap().as_str(), Some("1F"));

        let rest = p.load_dxfattribs_into_namespace(&mut ns, &SUB, None).unwrap();
        assert_eq!(ns.get("name").unwrap().as_str(), Some("MyStyle"));
        assert_eq!(ns.get("flags").unwrap().as_i64(), Some(4));
        assert_eq!(
            ns.get("center").unwrap().as_point3(),
            Some(Vector3::new(1.0, 2.0, 3.0))
        );
        // the junk tag is left over
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].code, 999);
    }

    #[test]
    fn test_load_r12_sequential_from_base_slice() {
        let tags = vec![
            DxfTag::new(0, "TEST"),
            DxfTag::new(2, "Legacy"),
            DxfTag::new(40, 1.5),
        ];
        let mut p = SubclassProcessor::new(tags, Some(DXF_R12));
        assert!(p.r12);
        let mut ns = DxfNamespace::new(&ATTRIBS);
        p.load_dxfattribs_into_namespace(&mut ns, &BASE, Some(0))
            .unwrap();
        // named subclass loads from the same base slice in legacy mode
        let rest = p.load_dxfattribs_into_namespace(&mut ns, &SUB, None).unwrap();
        assert!(rest.is_empty());
        assert_eq!(ns.get("name").unwrap().as_str(), Some("Legacy"));
        assert_eq!(ns.get("height").unwrap().as_f64(), Some(1.5));
    }

    #[test]
    fn test_version_gate_skips_descriptor() {
        // code 290 is gated behind R2007: a R2000 stream leaves it over
        let tags = vec![DxfTag::new(100, "AcDbTest"), DxfTag::new(290, true)];
        let mut p = SubclassProcessor::new(tags, Some(DXF_R2000));
        let mut ns = DxfNamespace::new(&ATTRIBS);
        let rest = p.load_dxfattribs_into_namespace(&mut ns, &SUB, None).unwrap();
        assert_eq!(rest.len(), 1);
        assert!(ns.get_raw("modern").is_none());

        // the same stream at R2007 consumes it
        let tags = vec![DxfTag::new(100, "AcDbTest"), DxfTag::new(290, true)];
        let mut p = SubclassProcessor::new(tags, Some(DXF_R2007));
        let mut ns = DxfNamespace::new(&ATTRIBS);
        let rest = p.load_dxfattribs_into_namespace(&mut ns, &SUB, None).unwrap();
        assert!(rest.is_empty());
        assert_eq!(ns.get_raw("modern").unwrap().as_bool(), Some(true));
    }

    #[test]
    fn test_duplicate_code_fills_in_declaration_order() {
        let tags = vec![
            DxfTag::new(100, "AcDbTest"),
            DxfTag::new(70, 1i16),
            DxfTag::new(70, 2i16),
        ];
        let mut p = SubclassProcessor::new(tags, Some(DXF_R2007));
        let mut ns = DxfNamespace::new(&ATTRIBS);
        p.load_dxfattribs_into_namespace(&mut ns, &SUB, None).unwrap();
        assert_eq!(ns.get("flags").unwrap().as_i64(), Some(1));
        assert_eq!(ns.get("fill").unwrap().as_i64(), Some(2));
    }

    #[test]
    fn test_duplicate_code_last_write_wins_when_filled() {
        // below R2007 'fill' is gated out, so both 70s target 'flags'
        let tags = vec![
            DxfTag::new(100, "AcDbTest"),
            DxfTag::new(70, 1i16),
            DxfTag::new(70, 2i16),
        ];
        let mut p = SubclassProcessor::new(tags, Some(DXF_R2000));
        let mut ns = DxfNamespace::new(&ATTRIBS);
        p.load_dxfattribs_into_namespace(&mut ns, &SUB, None).unwrap();
        assert_eq!(ns.get("flags").unwrap().as_i64(), Some(2));
        assert!(ns.get_raw("fill").is_none());
    }

    #[test]
    fn test_fold_base_into_entity_slice() {
        // layer tag misplaced before the first marker
        let tags = vec![
            DxfTag::new(0, "TEST"),
            DxfTag::new(40, 7.5),
            DxfTag::new(100, "AcDbTest"),
            DxfTag::new(2, "X"),
        ];
        let mut p = SubclassProcessor::new(tags, Some(DXF_R2000));
        let mut ns = DxfNamespace::new(&ATTRIBS);
        p.load_dxfattribs_into_namespace(&mut ns, &BASE, Some(0))
            .unwrap();
        p.append_base_class_to_acdb_entity();
        let rest = p.load_dxfattribs_into_namespace(&mut ns, &SUB, None).unwrap();
        assert!(rest.is_empty());
        assert_eq!(ns.get("height").unwrap().as_f64(), Some(7.5));
    }

    #[test]
    fn test_unprocessed_tags_are_reported() {
        let mut p = SubclassProcessor::new(modern_tags(), Some(DXF_R2000));
        let mut ns = DxfNamespace::new(&ATTRIBS);
        p.load_dxfattribs_into_namespace(&mut ns, &BASE, Some(0))
            .unwrap();
        let rest = p.load_dxfattribs_into_namespace(&mut ns, &SUB, None).unwrap();
        let mut notes = NotificationCollection::new();
        p.log_unprocessed_tags(&rest, Some("AcDbTest"), &mut notes);
        assert_eq!(notes.len(), 1);
        assert!(notes.has_type(NotificationType::UnprocessedTag));
    }
}
