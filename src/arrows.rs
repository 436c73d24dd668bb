//! Standard arrowhead catalog
//!
//! Dimension styles reference arrowhead blocks by handle, but users work
//! with the well-known AutoCAD arrow names.  Standard arrows live in
//! blocks named `_<ARROWNAME>`; the closed-filled arrow is special: it
//! has the empty name and needs no block at all (its handle slot stays
//! unset).

/// The default closed-filled arrow, identified by the empty name
pub const CLOSED_FILLED: &str = "";

/// Block name backing the closed-filled arrow when one is materialized
pub const CLOSED_FILLED_BLOCK: &str = "_CLOSEDFILLED";

const ACAD_ARROWS: &[&str] = &[
    "ARCHTICK",
    "BOXBLANK",
    "BOXFILLED",
    "CLOSED",
    "CLOSEDBLANK",
    "DATUMBLANK",
    "DATUMFILLED",
    "DOT",
    "DOTBLANK",
    "DOTSMALL",
    "INTEGRAL",
    "NONE",
    "OBLIQUE",
    "OPEN",
    "OPEN30",
    "OPEN90",
    "ORIGIN",
    "ORIGIN2",
    "SMALL",
];

/// True if `name` is one of the AutoCAD standard arrow names
pub fn is_acad_arrow(name: &str) -> bool {
    let upper = name.to_uppercase();
    ACAD_ARROWS.iter().any(|a| *a == upper)
}

/// Block name for a standard arrow (`OPEN` → `_OPEN`)
pub fn block_name(arrow_name: &str) -> String {
    format!("_{}", arrow_name.to_uppercase())
}

/// Arrow name for a block name: standard arrow blocks map back to their
/// arrow name, the closed-filled block maps to the empty name, anything
/// else is a user-defined block and passes through unchanged
pub fn arrow_name(block: &str) -> String {
    if block.eq_ignore_ascii_case(CLOSED_FILLED_BLOCK) {
        return CLOSED_FILLED.to_string();
    }
    if let Some(stripped) = block.strip_prefix('_') {
        if is_acad_arrow(stripped) {
            return stripped.to_uppercase();
        }
    }
    block.to_string()
}
