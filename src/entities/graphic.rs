//! Graphic entities
//!
//! The shared AcDbEntity subclass carries the display properties of
//! every graphic entity; the type definitions here cover the entity
//! set the sequence linker works with plus a few plain standalone
//! types.

use indexmap::IndexMap;
use once_cell::sync::Lazy;

use crate::attribs::descriptor::{DxfAttr, XType};
use crate::attribs::schema::{DxfAttributes, SubclassDef};
use crate::entities::{DxfEntity, EntityDef, LinkRole};
use crate::types::{TagValue, Vector3, DXF_R2000, DXF_R2004, DXF_R2007};

/// Base class of graphic entities: handle at code 5
pub static BASE_CLASS: Lazy<SubclassDef> = Lazy::new(|| {
    SubclassDef::new(
        None,
        vec![
            ("handle", DxfAttr::new(5).optional()),
            ("owner", DxfAttr::new(330).optional()),
        ],
    )
});

/// Display properties shared by all graphic entities
pub static ACDB_ENTITY: Lazy<SubclassDef> = Lazy::new(|| {
    SubclassDef::new(
        Some("AcDbEntity"),
        vec![
            ("layer", DxfAttr::new(8).default("0")),
            ("linetype", DxfAttr::new(6).default("BYLAYER").optional()),
            ("color", DxfAttr::new(62).default(256i16).optional()),
            ("paperspace", DxfAttr::new(67).default(0i16).optional()),
            ("lineweight", DxfAttr::new(370).default(-1i16).dxfversion(DXF_R2000).optional()),
            ("ltscale", DxfAttr::new(48).default(1.0).dxfversion(DXF_R2000).optional()),
            ("invisible", DxfAttr::new(60).default(0i16).dxfversion(DXF_R2000).optional()),
            ("true_color", DxfAttr::new(420).dxfversion(DXF_R2004).optional()),
            ("color_name", DxfAttr::new(430).dxfversion(DXF_R2004).optional()),
            ("transparency", DxfAttr::new(440).dxfversion(DXF_R2004).optional()),
            ("shadow_mode", DxfAttr::new(284).dxfversion(DXF_R2007).optional()),
            ("material_handle", DxfAttr::new(347).dxfversion(DXF_R2007).optional()),
            ("visualstyle_handle", DxfAttr::new(348).dxfversion(DXF_R2007).optional()),
            ("plotstyle_enum", DxfAttr::new(380).default(1i16).dxfversion(DXF_R2007).optional()),
            ("plotstyle_handle", DxfAttr::new(390).dxfversion(DXF_R2007).optional()),
        ],
    )
    .with_export_order(&[
        "paperspace",
        "layer",
        "linetype",
        "material_handle",
        "color",
        "lineweight",
        "ltscale",
        "true_color",
        "color_name",
        "transparency",
        "plotstyle_enum",
        "plotstyle_handle",
        "shadow_mode",
        "visualstyle_handle",
    ])
});

static ACDB_LINE: Lazy<SubclassDef> = Lazy::new(|| {
    SubclassDef::new(
        Some("AcDbLine"),
        vec![
            ("start", DxfAttr::new(10).xtype(XType::Point3d).default(Vector3::ZERO)),
            ("end", DxfAttr::new(11).xtype(XType::Point3d).default(Vector3::ZERO)),
            ("thickness", DxfAttr::new(39).default(0.0).optional()),
            (
                "extrusion",
                DxfAttr::new(210).xtype(XType::Point3d).default(Vector3::UNIT_Z).optional(),
            ),
        ],
    )
});

static ACDB_POINT: Lazy<SubclassDef> = Lazy::new(|| {
    SubclassDef::new(
        Some("AcDbPoint"),
        vec![
            ("location", DxfAttr::new(10).xtype(XType::Point3d).default(Vector3::ZERO)),
            ("thickness", DxfAttr::new(39).default(0.0).optional()),
            (
                "extrusion",
                DxfAttr::new(210).xtype(XType::Point3d).default(Vector3::UNIT_Z).optional(),
            ),
        ],
    )
});

static ACDB_POLYLINE: Lazy<SubclassDef> = Lazy::new(|| {
    SubclassDef::new(
        Some("AcDb2dPolyline"),
        vec![
            (
                "elevation",
                DxfAttr::new(10).xtype(XType::Point3d).default(Vector3::ZERO).optional(),
            ),
            ("flags", DxfAttr::new(70).default(0i16)),
            ("default_start_width", DxfAttr::new(40).default(0.0).optional()),
            ("default_end_width", DxfAttr::new(41).default(0.0).optional()),
        ],
    )
});

static ACDB_VERTEX: Lazy<SubclassDef> = Lazy::new(|| {
    SubclassDef::new(
        Some("AcDbVertex"),
        vec![
            ("location", DxfAttr::new(10).xtype(XType::Point3d).default(Vector3::ZERO)),
            ("start_width", DxfAttr::new(40).default(0.0).optional()),
            ("end_width", DxfAttr::new(41).default(0.0).optional()),
            ("bulge", DxfAttr::new(42).default(0.0).optional()),
            ("flags", DxfAttr::new(70).default(0i16)),
        ],
    )
});

static ACDB_BLOCK_REFERENCE: Lazy<SubclassDef> = Lazy::new(|| {
    SubclassDef::new(
        Some("AcDbBlockReference"),
        vec![
            ("attribs_follow", DxfAttr::new(66).default(0i16).optional()),
            ("name", DxfAttr::new(2)),
            ("insert", DxfAttr::new(10).xtype(XType::Point3d).default(Vector3::ZERO)),
            ("xscale", DxfAttr::new(41).default(1.0).optional()),
            ("yscale", DxfAttr::new(42).default(1.0).optional()),
            ("zscale", DxfAttr::new(43).default(1.0).optional()),
            ("rotation", DxfAttr::new(50).default(0.0).optional()),
        ],
    )
});

static ACDB_TEXT: Lazy<SubclassDef> = Lazy::new(|| {
    SubclassDef::new(
        Some("AcDbText"),
        vec![
            ("insert", DxfAttr::new(10).xtype(XType::Point3d).default(Vector3::ZERO)),
            ("height", DxfAttr::new(40).default(2.5)),
            ("text", DxfAttr::new(1).default("")),
        ],
    )
});

static ACDB_ATTRIBUTE: Lazy<SubclassDef> = Lazy::new(|| {
    SubclassDef::new(
        Some("AcDbAttribute"),
        vec![
            ("tag", DxfAttr::new(2).default("")),
            ("flags", DxfAttr::new(70).default(0i16)),
        ],
    )
});

static ACDB_MTEXT: Lazy<SubclassDef> = Lazy::new(|| {
    SubclassDef::new(
        Some("AcDbMText"),
        vec![
            ("insert", DxfAttr::new(10).xtype(XType::Point3d).default(Vector3::ZERO)),
            ("char_height", DxfAttr::new(40).default(2.5)),
            ("width", DxfAttr::new(41).optional()),
            ("attachment_point", DxfAttr::new(71).default(1i16)),
            ("text", DxfAttr::new(1).default("")),
        ],
    )
});

/// Snapshot of the display properties currently set on an entity
///
/// Collects the AcDbEntity fields with a stored value, in schema order,
/// for transferring display state between entities.
pub fn graphic_properties(entity: &DxfEntity) -> IndexMap<&'static str, TagValue> {
    ACDB_ENTITY
        .field_names()
        .filter_map(|field| entity.dxf.get_raw(field).map(|v| (field, v.clone())))
        .collect()
}

fn graphic_attribs(subclasses: Vec<&'static SubclassDef>) -> DxfAttributes {
    let mut all: Vec<&'static SubclassDef> = vec![&*BASE_CLASS, &*ACDB_ENTITY];
    all.extend(subclasses);
    DxfAttributes::compose(all).expect("graphic schema field names are unique")
}

macro_rules! graphic_def {
    ($def:ident, $attrs:ident, $dxftype:literal, [$($sub:expr),*], $link:expr) => {
        static $attrs: Lazy<DxfAttributes> =
            Lazy::new(|| graphic_attribs(vec![$(&*$sub),*]));

        /// Entity definition
        pub static $def: Lazy<EntityDef> = Lazy::new(|| EntityDef {
            dxftype: $dxftype,
            attribs: &$attrs,
            link: $link,
            fold_base_class: true,
            pre_export: None,
            export_maps: None,
        });
    };
}

graphic_def!(LINE, LINE_ATTRIBS, "LINE", [ACDB_LINE], LinkRole::Standalone);
graphic_def!(POINT, POINT_ATTRIBS, "POINT", [ACDB_POINT], LinkRole::Standalone);
graphic_def!(
    POLYLINE,
    POLYLINE_ATTRIBS,
    "POLYLINE",
    [ACDB_POLYLINE],
    LinkRole::Container {
        member: "VERTEX",
        flag_attr: None,
    }
);
graphic_def!(VERTEX, VERTEX_ATTRIBS, "VERTEX", [ACDB_VERTEX], LinkRole::Standalone);
graphic_def!(SEQEND, SEQEND_ATTRIBS, "SEQEND", [], LinkRole::Terminator);
graphic_def!(
    INSERT,
    INSERT_ATTRIBS,
    "INSERT",
    [ACDB_BLOCK_REFERENCE],
    LinkRole::Container {
        member: "ATTRIB",
        flag_attr: Some("attribs_follow"),
    }
);
graphic_def!(
    ATTRIB,
    ATTRIB_ATTRIBS,
    "ATTRIB",
    [ACDB_TEXT, ACDB_ATTRIBUTE],
    LinkRole::Standalone
);
graphic_def!(MTEXT, MTEXT_ATTRIBS, "MTEXT", [ACDB_MTEXT], LinkRole::Attachable);

/// All graphic entity definitions, for factory registration
pub static GRAPHIC_DEFS: Lazy<Vec<&'static EntityDef>> = Lazy::new(|| {
    vec![
        &*LINE, &*POINT, &*POLYLINE, &*VERTEX, &*SEQEND, &*INSERT, &*ATTRIB, &*MTEXT,
    ]
});
