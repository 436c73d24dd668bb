//! DIMSTYLE table record
//!
//! The dimension style record is the largest attribute catalog in the
//! crate and the showcase for callback attributes: the text style and
//! the arrowhead/linetype references are stored as handles but exposed
//! by name, with on-demand creation of standard arrow blocks.

use once_cell::sync::Lazy;

use crate::arrows;
use crate::attribs::descriptor::{DxfAttr, VIRTUAL_CODE};
use crate::attribs::namespace::DxfNamespace;
use crate::attribs::schema::{DxfAttributes, SubclassDef};
use crate::document::{DocumentContext, ResourceTable};
use crate::entities::{DxfEntity, EntityDef, ExportMaps, LinkRole};
use crate::error::{DxfError, Result};
use crate::types::{TagValue, DXF_R2000, DXF_R2007};

/// Lineweight enum value for BYBLOCK
const LINEWEIGHT_BYBLOCK: i16 = -2;

/// Base class of a DIMSTYLE record: the handle lives at the historic
/// group code 105 instead of 5
pub static BASE_CLASS: Lazy<SubclassDef> = Lazy::new(|| {
    SubclassDef::new(
        None,
        vec![
            ("handle", DxfAttr::new(105).optional()),
            ("owner", DxfAttr::new(330).optional()),
        ],
    )
});

/// Empty marker subclass shared by all symbol table records
pub static ACDB_SYMBOL_TABLE_RECORD: Lazy<SubclassDef> =
    Lazy::new(|| SubclassDef::new(Some("AcDbSymbolTableRecord"), Vec::new()));

/// The AcDbDimStyleTableRecord attribute catalog
pub static ACDB_DIMSTYLE: Lazy<SubclassDef> = Lazy::new(|| {
    SubclassDef::new(
        Some("AcDbDimStyleTableRecord"),
        vec![
            ("name", DxfAttr::new(2).default("Standard")),
            ("flags", DxfAttr::new(70).default(0i16)),
            ("dimpost", DxfAttr::new(3).default("")),
            ("dimapost", DxfAttr::new(4).default("")),
            // arrow names at the legacy text codes; resolved through
            // the *_handle fields when a document is available
            (
                "dimblk",
                DxfAttr::new(5)
                    .default("")
                    .callback(get_dimblk, set_dimblk)
                    .backing("dimblk_handle"),
            ),
            (
                "dimblk1",
                DxfAttr::new(6)
                    .default("")
                    .callback(get_dimblk1, set_dimblk1)
                    .backing("dimblk1_handle"),
            ),
            (
                "dimblk2",
                DxfAttr::new(7)
                    .default("")
                    .callback(get_dimblk2, set_dimblk2)
                    .backing("dimblk2_handle"),
            ),
            ("dimscale", DxfAttr::new(40).default(1.0)),
            ("dimasz", DxfAttr::new(41).default(2.5)),
            ("dimexo", DxfAttr::new(42).default(0.625)),
            ("dimdli", DxfAttr::new(43).default(3.75)),
            ("dimexe", DxfAttr::new(44).default(1.25)),
            ("dimrnd", DxfAttr::new(45).default(0.0)),
            ("dimdle", DxfAttr::new(46).default(0.0)),
            ("dimtp", DxfAttr::new(47).default(0.0)),
            ("dimtm", DxfAttr::new(48).default(0.0)),
            // length of the extension line when dimfxlon is set
            ("dimfxl", DxfAttr::new(49).dxfversion(DXF_R2007).default(2.5)),
            ("dimtxt", DxfAttr::new(140).default(2.5)),
            ("dimcen", DxfAttr::new(141).default(2.5)),
            ("dimtsz", DxfAttr::new(142).default(0.0)),
            ("dimaltf", DxfAttr::new(143).default(0.03937007874)),
            ("dimlfac", DxfAttr::new(144).default(1.0)),
            ("dimtvp", DxfAttr::new(145).default(0.0)),
            ("dimtfac", DxfAttr::new(146).dxfversion(DXF_R2000).default(1.0)),
            ("dimgap", DxfAttr::new(147).default(0.625)),
            ("dimaltrnd", DxfAttr::new(148).dxfversion(DXF_R2000).default(0.0)),
            // 0 = none, 1 = canvas color, 2 = dimtfillclr
            ("dimtfill", DxfAttr::new(69).dxfversion(DXF_R2007).default(0i16)),
            ("dimtfillclr", DxfAttr::new(70).dxfversion(DXF_R2007).default(0i16)),
            ("dimtol", DxfAttr::new(71).default(0i16)),
            ("dimlim", DxfAttr::new(72).default(0i16)),
            ("dimtih", DxfAttr::new(73).default(0i16)),
            ("dimtoh", DxfAttr::new(74).default(0i16)),
            ("dimse1", DxfAttr::new(75).default(0i16)),
            ("dimse2", DxfAttr::new(76).default(0i16)),
            ("dimtad", DxfAttr::new(77).default(1i16)),
            ("dimzin", DxfAttr::new(78).default(8i16)),
            ("dimazin", DxfAttr::new(79).dxfversion(DXF_R2000).default(8i16)),
            ("dimalt", DxfAttr::new(170).default(0i16)),
            ("dimaltd", DxfAttr::new(171).default(3i16)),
            ("dimtofl", DxfAttr::new(172).default(1i16)),
            ("dimsah", DxfAttr::new(173).default(0i16)),
            ("dimtix", DxfAttr::new(174).default(0i16)),
            ("dimsoxd", DxfAttr::new(175).default(0i16)),
            ("dimclrd", DxfAttr::new(176).default(0i16)),
            ("dimclre", DxfAttr::new(177).default(0i16)),
            ("dimclrt", DxfAttr::new(178).default(0i16)),
            ("dimadec", DxfAttr::new(179).dxfversion(DXF_R2000).default(0i16)),
            // obsolete since R14
            ("dimunit", DxfAttr::new(270).optional()),
            ("dimdec", DxfAttr::new(271).dxfversion(DXF_R2000).default(0i16)),
            ("dimtdec", DxfAttr::new(272).dxfversion(DXF_R2000).default(2i16)),
            ("dimaltu", DxfAttr::new(273).dxfversion(DXF_R2000).default(2i16)),
            ("dimalttd", DxfAttr::new(274).dxfversion(DXF_R2000).default(3i16)),
            ("dimaunit", DxfAttr::new(275).dxfversion(DXF_R2000).default(0i16)),
            ("dimfrac", DxfAttr::new(276).dxfversion(DXF_R2000).default(0i16)),
            ("dimlunit", DxfAttr::new(277).dxfversion(DXF_R2000).default(2i16)),
            ("dimdsep", DxfAttr::new(278).dxfversion(DXF_R2000).default(44i16)),
            ("dimtmove", DxfAttr::new(279).dxfversion(DXF_R2000).default(0i16)),
            ("dimjust", DxfAttr::new(280).dxfversion(DXF_R2000).default(0i16)),
            ("dimsd1", DxfAttr::new(281).dxfversion(DXF_R2000).default(0i16)),
            ("dimsd2", DxfAttr::new(282).dxfversion(DXF_R2000).default(0i16)),
            ("dimtolj", DxfAttr::new(283).dxfversion(DXF_R2000).default(0i16)),
            ("dimtzin", DxfAttr::new(284).dxfversion(DXF_R2000).default(8i16)),
            ("dimaltz", DxfAttr::new(285).dxfversion(DXF_R2000).default(0i16)),
            ("dimalttz", DxfAttr::new(286).dxfversion(DXF_R2000).default(0i16)),
            // obsolete, split into dimatfit and dimtmove
            ("dimfit", DxfAttr::new(287).optional()),
            ("dimupt", DxfAttr::new(288).dxfversion(DXF_R2000).default(0i16)),
            ("dimatfit", DxfAttr::new(289).dxfversion(DXF_R2000).default(3i16)),
            // 1 = fixed extension line length
            ("dimfxlon", DxfAttr::new(290).dxfversion(DXF_R2007).default(false)),
            // handle of the referenced STYLE entry
            ("dimtxsty_handle", DxfAttr::new(340).dxfversion(DXF_R2000).optional()),
            (
                "dimtxsty",
                DxfAttr::new(VIRTUAL_CODE)
                    .callback(get_text_style, set_text_style)
                    .backing("dimtxsty_handle"),
            ),
            (
                "dimldrblk",
                DxfAttr::new(VIRTUAL_CODE)
                    .callback(get_dimldrblk, set_dimldrblk)
                    .backing("dimldrblk_handle"),
            ),
            // handles of the referenced arrow BLOCK_RECORD entries
            ("dimldrblk_handle", DxfAttr::new(341).dxfversion(DXF_R2000).optional()),
            ("dimblk_handle", DxfAttr::new(342).dxfversion(DXF_R2000).optional()),
            ("dimblk1_handle", DxfAttr::new(343).dxfversion(DXF_R2000).optional()),
            ("dimblk2_handle", DxfAttr::new(344).dxfversion(DXF_R2000).optional()),
            // linetype handles for dimension and extension lines
            ("dimltype_handle", DxfAttr::new(345).dxfversion(DXF_R2007).optional()),
            (
                "dimltype",
                DxfAttr::new(VIRTUAL_CODE)
                    .dxfversion(DXF_R2007)
                    .callback(get_linetype, set_linetype)
                    .backing("dimltype_handle"),
            ),
            ("dimltex1_handle", DxfAttr::new(346).dxfversion(DXF_R2007).optional()),
            (
                "dimltex1",
                DxfAttr::new(VIRTUAL_CODE)
                    .dxfversion(DXF_R2007)
                    .callback(get_ext1_linetype, set_ext1_linetype)
                    .backing("dimltex1_handle"),
            ),
            ("dimltex2_handle", DxfAttr::new(347).dxfversion(DXF_R2007).optional()),
            (
                "dimltex2",
                DxfAttr::new(VIRTUAL_CODE)
                    .dxfversion(DXF_R2007)
                    .callback(get_ext2_linetype, set_ext2_linetype)
                    .backing("dimltex2_handle"),
            ),
            ("dimlwd", DxfAttr::new(371).dxfversion(DXF_R2000).default(LINEWEIGHT_BYBLOCK)),
            ("dimlwe", DxfAttr::new(372).dxfversion(DXF_R2000).default(LINEWEIGHT_BYBLOCK)),
        ],
    )
});

static DIMSTYLE_ATTRIBS: Lazy<DxfAttributes> = Lazy::new(|| {
    DxfAttributes::compose(vec![&*BASE_CLASS, &*ACDB_SYMBOL_TABLE_RECORD, &*ACDB_DIMSTYLE])
        .expect("DIMSTYLE schema field names are unique")
});

static EXPORT_MAP_R12: &[&str] = &[
    "name", "flags", "dimpost", "dimapost", "dimblk", "dimblk1", "dimblk2", "dimscale", "dimasz",
    "dimexo", "dimdli", "dimexe", "dimrnd", "dimdle", "dimtp", "dimtm", "dimtxt", "dimcen",
    "dimtsz", "dimaltf", "dimlfac", "dimtvp", "dimtfac", "dimgap", "dimtol", "dimlim", "dimtih",
    "dimtoh", "dimse1", "dimse2", "dimtad", "dimzin", "dimalt", "dimaltd", "dimtofl", "dimsah",
    "dimtix", "dimsoxd", "dimclrd", "dimclre", "dimclrt",
];

static EXPORT_MAP_R2000: &[&str] = &[
    "name", "flags", "dimpost", "dimapost", "dimscale", "dimasz", "dimexo", "dimdli", "dimexe",
    "dimrnd", "dimdle", "dimtp", "dimtm", "dimtxt", "dimcen", "dimtsz", "dimaltf", "dimlfac",
    "dimtvp", "dimtfac", "dimgap", "dimaltrnd", "dimtol", "dimlim", "dimtih", "dimtoh", "dimse1",
    "dimse2", "dimtad", "dimzin", "dimazin", "dimalt", "dimaltd", "dimtofl", "dimsah", "dimtix",
    "dimsoxd", "dimclrd", "dimclre", "dimclrt", "dimadec", "dimdec", "dimtdec", "dimaltu",
    "dimalttd", "dimaunit", "dimfrac", "dimlunit", "dimdsep", "dimtmove", "dimjust", "dimsd1",
    "dimsd2", "dimtolj", "dimtzin", "dimaltz", "dimalttz", "dimupt", "dimatfit",
    "dimtxsty_handle", "dimldrblk_handle", "dimblk_handle", "dimblk1_handle", "dimblk2_handle",
    "dimlwd", "dimlwe",
];

static EXPORT_MAP_R2007: &[&str] = &[
    "name", "flags", "dimscale", "dimasz", "dimexo", "dimdli", "dimexe", "dimrnd", "dimdle",
    "dimtp", "dimtm", "dimfxl", "dimtxt", "dimcen", "dimtsz", "dimaltf", "dimlfac", "dimtvp",
    "dimtfac", "dimgap", "dimaltrnd", "dimtfill", "dimtfillclr", "dimtol", "dimlim", "dimtih",
    "dimtoh", "dimse1", "dimse2", "dimtad", "dimzin", "dimazin", "dimalt", "dimaltd", "dimtofl",
    "dimsah", "dimtix", "dimsoxd", "dimclrd", "dimclre", "dimclrt", "dimadec", "dimdec",
    "dimtdec", "dimaltu", "dimalttd", "dimaunit", "dimfrac", "dimlunit", "dimdsep", "dimtmove",
    "dimjust", "dimsd1", "dimsd2", "dimtolj", "dimtzin", "dimaltz", "dimalttz", "dimupt",
    "dimatfit", "dimfxlon", "dimtxsty_handle", "dimldrblk_handle", "dimblk_handle",
    "dimblk1_handle", "dimblk2_handle", "dimltype_handle", "dimltex1_handle", "dimltex2_handle",
    "dimlwd", "dimlwe",
];

static DIMSTYLE_EXPORT_MAPS: ExportMaps = ExportMaps {
    r12: EXPORT_MAP_R12,
    r2000: EXPORT_MAP_R2000,
    r2007: EXPORT_MAP_R2007,
};

/// The DIMSTYLE entity definition
pub static DIMSTYLE: Lazy<EntityDef> = Lazy::new(|| EntityDef {
    dxftype: "DIMSTYLE",
    attribs: &DIMSTYLE_ATTRIBS,
    link: LinkRole::Standalone,
    fold_base_class: false,
    pre_export: Some(inject_text_style_handle),
    export_maps: Some(&DIMSTYLE_EXPORT_MAPS),
});

/// Make sure the exported record references a text style
///
/// Writers expect code 340 to be present from R2000 on; fall back to
/// the Standard style when the user never set one.
fn inject_text_style_handle(ns: &mut DxfNamespace, doc: &mut dyn DocumentContext) -> Result<()> {
    if ns.get_raw("dimtxsty_handle").is_none() {
        match doc.lookup_named(ResourceTable::TextStyles, "Standard") {
            Ok(handle) => ns.set_raw("dimtxsty_handle", handle)?,
            Err(_) => log::warn!("no Standard text style available for dimtxsty"),
        }
    }
    Ok(())
}

fn get_text_style(ns: &DxfNamespace, doc: &dyn DocumentContext) -> Result<TagValue> {
    let handle = ns
        .get_raw("dimtxsty_handle")
        .and_then(TagValue::as_handle)
        .filter(|h| !h.is_null());
    let name = match handle {
        Some(h) => match doc.lookup_by_handle(h) {
            Ok(name) => name,
            Err(_) => {
                log::warn!("invalid text style handle '{}'", h);
                "Standard".to_string()
            }
        },
        None => {
            log::warn!(
                "DIMSTYLE '{}': text style handle not set",
                ns.get_or("name", "").unwrap_or(TagValue::Str(String::new()))
            );
            "Standard".to_string()
        }
    };
    Ok(TagValue::Str(name))
}

fn set_text_style(
    ns: &mut DxfNamespace,
    doc: &mut dyn DocumentContext,
    value: TagValue,
) -> Result<()> {
    let name = value.expect_str("dimtxsty")?;
    let handle = doc.lookup_named(ResourceTable::TextStyles, name)?;
    ns.set_raw("dimtxsty_handle", handle)
}

/// Resolve an arrow block handle back to an arrow name
///
/// Unset or null handles mean the default closed-filled arrow; a
/// dangling handle degrades to the empty name.  A legacy text name
/// stored under the attribute itself (R12 streams) takes over when no
/// handle exists.
fn get_arrow_block_name(ns: &DxfNamespace, doc: &dyn DocumentContext, attr: &str) -> Result<TagValue> {
    let raw = format!("{}_handle", attr);
    let handle = ns
        .get_raw(&raw)
        .and_then(TagValue::as_handle)
        .filter(|h| !h.is_null());
    if let Some(h) = handle {
        let block = match doc.lookup_by_handle(h) {
            Ok(block) => block,
            Err(_) => {
                log::warn!("invalid {} block handle '{}'", attr, h);
                String::new()
            }
        };
        return Ok(TagValue::Str(arrows::arrow_name(&block)));
    }
    if let Some(name) = ns.get_raw(attr).and_then(TagValue::as_str) {
        return Ok(TagValue::Str(name.to_string()));
    }
    Ok(TagValue::Str(arrows::CLOSED_FILLED.to_string()))
}

/// Store an arrow by name
///
/// The closed-filled arrow needs no block and clears the handle slot;
/// standard arrows create their block record on demand; anything else
/// must name an existing block.  The plain name is kept alongside the
/// handle for legacy export.
fn set_blk_handle(
    ns: &mut DxfNamespace,
    doc: &mut dyn DocumentContext,
    attr: &'static str,
    value: TagValue,
) -> Result<()> {
    let name = value.expect_str(attr)?.to_string();
    let raw = format!("{}_handle", attr);
    if name == arrows::CLOSED_FILLED {
        ns.discard(&raw);
        ns.set_raw(attr, name)?;
        return Ok(());
    }
    let handle = if arrows::is_acad_arrow(&name) {
        doc.create_named(ResourceTable::Blocks, &arrows::block_name(&name))?
    } else {
        doc.lookup_named(ResourceTable::Blocks, &name)?
    };
    ns.set_raw(&raw, handle)?;
    ns.set_raw(attr, name)
}

fn get_dimblk(ns: &DxfNamespace, doc: &dyn DocumentContext) -> Result<TagValue> {
    get_arrow_block_name(ns, doc, "dimblk")
}

fn set_dimblk(ns: &mut DxfNamespace, doc: &mut dyn DocumentContext, value: TagValue) -> Result<()> {
    set_blk_handle(ns, doc, "dimblk", value)
}

fn get_dimblk1(ns: &DxfNamespace, doc: &dyn DocumentContext) -> Result<TagValue> {
    get_arrow_block_name(ns, doc, "dimblk1")
}

fn set_dimblk1(ns: &mut DxfNamespace, doc: &mut dyn DocumentContext, value: TagValue) -> Result<()> {
    set_blk_handle(ns, doc, "dimblk1", value)
}

fn get_dimblk2(ns: &DxfNamespace, doc: &dyn DocumentContext) -> Result<TagValue> {
    get_arrow_block_name(ns, doc, "dimblk2")
}

fn set_dimblk2(ns: &mut DxfNamespace, doc: &mut dyn DocumentContext, value: TagValue) -> Result<()> {
    set_blk_handle(ns, doc, "dimblk2", value)
}

fn get_dimldrblk(ns: &DxfNamespace, doc: &dyn DocumentContext) -> Result<TagValue> {
    get_arrow_block_name(ns, doc, "dimldrblk")
}

fn set_dimldrblk(ns: &mut DxfNamespace, doc: &mut dyn DocumentContext, value: TagValue) -> Result<()> {
    // dimldrblk is virtual, only the handle slot exists
    let name = value.expect_str("dimldrblk")?.to_string();
    if name == arrows::CLOSED_FILLED {
        ns.discard("dimldrblk_handle");
        return Ok(());
    }
    let handle = if arrows::is_acad_arrow(&name) {
        doc.create_named(ResourceTable::Blocks, &arrows::block_name(&name))?
    } else {
        doc.lookup_named(ResourceTable::Blocks, &name)?
    };
    ns.set_raw("dimldrblk_handle", handle)
}

fn get_ltype_name(ns: &DxfNamespace, doc: &dyn DocumentContext, attr: &str) -> Result<TagValue> {
    if doc.dxfversion() < DXF_R2007 {
        log::debug!("linetype support for DIMSTYLE requires DXF R2007 or later");
    }
    let raw = format!("{}_handle", attr);
    match ns.get_raw(&raw).and_then(TagValue::as_handle) {
        Some(handle) => {
            let name = doc
                .lookup_by_handle(handle)
                .map_err(|_| DxfError::UnresolvedReference(format!("{}: {}", attr, handle)))?;
            Ok(TagValue::Str(name))
        }
        None => Err(DxfError::AttributeNotSet(attr.to_string())),
    }
}

fn set_ltype_handle(
    ns: &mut DxfNamespace,
    doc: &mut dyn DocumentContext,
    attr: &str,
    value: TagValue,
) -> Result<()> {
    let name = value.expect_str(attr)?;
    let handle = doc.lookup_named(ResourceTable::LineTypes, name)?;
    ns.set_raw(&format!("{}_handle", attr), handle)
}

fn get_linetype(ns: &DxfNamespace, doc: &dyn DocumentContext) -> Result<TagValue> {
    get_ltype_name(ns, doc, "dimltype")
}

fn set_linetype(ns: &mut DxfNamespace, doc: &mut dyn DocumentContext, value: TagValue) -> Result<()> {
    set_ltype_handle(ns, doc, "dimltype", value)
}

fn get_ext1_linetype(ns: &DxfNamespace, doc: &dyn DocumentContext) -> Result<TagValue> {
    get_ltype_name(ns, doc, "dimltex1")
}

fn set_ext1_linetype(
    ns: &mut DxfNamespace,
    doc: &mut dyn DocumentContext,
    value: TagValue,
) -> Result<()> {
    set_ltype_handle(ns, doc, "dimltex1", value)
}

fn get_ext2_linetype(ns: &DxfNamespace, doc: &dyn DocumentContext) -> Result<TagValue> {
    get_ltype_name(ns, doc, "dimltex2")
}

fn set_ext2_linetype(
    ns: &mut DxfNamespace,
    doc: &mut dyn DocumentContext,
    value: TagValue,
) -> Result<()> {
    set_ltype_handle(ns, doc, "dimltex2", value)
}

/// Set the dimension/extension linetypes by name
///
/// Quietly does nothing below R2007, where the records cannot store
/// linetype references.
pub fn set_linetypes(
    entity: &mut DxfEntity,
    doc: &mut dyn DocumentContext,
    dimline: Option<&str>,
    ext1: Option<&str>,
    ext2: Option<&str>,
) -> Result<()> {
    if doc.dxfversion() < DXF_R2007 {
        log::debug!("linetype support requires DXF R2007 or later");
        return Ok(());
    }
    if let Some(name) = dimline {
        entity.dxf.set_with(doc, "dimltype", name)?;
    }
    if let Some(name) = ext1 {
        entity.dxf.set_with(doc, "dimltex1", name)?;
    }
    if let Some(name) = ext2 {
        entity.dxf.set_with(doc, "dimltex2", name)?;
    }
    Ok(())
}

/// Set the arrowhead blocks by name
///
/// Setting individual first/second arrows enables dimsah; a tick size
/// switches the style to tick marks instead of arrows.
pub fn set_arrows(
    entity: &mut DxfEntity,
    doc: &mut dyn DocumentContext,
    blk: Option<&str>,
    blk1: Option<&str>,
    blk2: Option<&str>,
    ldrblk: Option<&str>,
) -> Result<()> {
    if let Some(name) = blk {
        entity.dxf.set_with(doc, "dimblk", name)?;
    }
    if let Some(name) = blk1 {
        entity.dxf.set_with(doc, "dimblk1", name)?;
    }
    if let Some(name) = blk2 {
        entity.dxf.set_with(doc, "dimblk2", name)?;
    }
    if let Some(name) = ldrblk {
        entity.dxf.set_with(doc, "dimldrblk", name)?;
    }
    if blk1.is_some() || blk2.is_some() {
        entity.dxf.set("dimsah", 1i16)?;
    }
    Ok(())
}
