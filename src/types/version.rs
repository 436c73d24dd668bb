//! DXF format versions
//!
//! A format version is a discrete, ordered tag identifying which revision
//! of the file format's field set and encoding rules apply.  Attribute
//! descriptors carry a minimum version; export filters compare against
//! the target version.

use std::fmt;

/// DXF format version, ordered oldest to newest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DxfVersion {
    /// AutoCAD R12 (DXF R12) — no subclass markers, no handles on references
    AC1009,
    /// AutoCAD 2000 (DXF R2000)
    AC1015,
    /// AutoCAD 2004 (DXF R2004)
    AC1018,
    /// AutoCAD 2007 (DXF R2007)
    AC1021,
    /// AutoCAD 2010 (DXF R2010)
    AC1024,
    /// AutoCAD 2013 (DXF R2013)
    AC1027,
    /// AutoCAD 2018 (DXF R2018)
    AC1032,
}

impl DxfVersion {
    /// Version marker string as it appears in the $ACADVER header variable
    pub fn as_str(&self) -> &'static str {
        match self {
            DxfVersion::AC1009 => "AC1009",
            DxfVersion::AC1015 => "AC1015",
            DxfVersion::AC1018 => "AC1018",
            DxfVersion::AC1021 => "AC1021",
            DxfVersion::AC1024 => "AC1024",
            DxfVersion::AC1027 => "AC1027",
            DxfVersion::AC1032 => "AC1032",
        }
    }

    /// Parse a version marker string
    pub fn parse(s: &str) -> Option<DxfVersion> {
        match s {
            "AC1009" => Some(DxfVersion::AC1009),
            "AC1015" => Some(DxfVersion::AC1015),
            "AC1018" => Some(DxfVersion::AC1018),
            "AC1021" => Some(DxfVersion::AC1021),
            "AC1024" => Some(DxfVersion::AC1024),
            "AC1027" => Some(DxfVersion::AC1027),
            "AC1032" => Some(DxfVersion::AC1032),
            _ => None,
        }
    }

    /// True for formats without subclass markers (legacy streams)
    pub fn is_r12(&self) -> bool {
        *self <= DxfVersion::AC1009
    }
}

/// Shorthand aliases matching the common DXF release names
pub const DXF_R12: DxfVersion = DxfVersion::AC1009;
/// DXF R2000
pub const DXF_R2000: DxfVersion = DxfVersion::AC1015;
/// DXF R2004
pub const DXF_R2004: DxfVersion = DxfVersion::AC1018;
/// DXF R2007
pub const DXF_R2007: DxfVersion = DxfVersion::AC1021;
/// DXF R2013
pub const DXF_R2013: DxfVersion = DxfVersion::AC1027;
/// DXF R2018
pub const DXF_R2018: DxfVersion = DxfVersion::AC1032;

impl fmt::Display for DxfVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_ordering() {
        assert!(DxfVersion::AC1009 < DxfVersion::AC1015);
        assert!(DxfVersion::AC1015 < DxfVersion::AC1021);
        assert!(DxfVersion::AC1021 < DxfVersion::AC1032);
    }

    #[test]
    fn test_parse_roundtrip() {
        for v in [
            DxfVersion::AC1009,
            DxfVersion::AC1015,
            DxfVersion::AC1021,
            DxfVersion::AC1032,
        ] {
            assert_eq!(DxfVersion::parse(v.as_str()), Some(v));
        }
        assert_eq!(DxfVersion::parse("AC9999"), None);
    }

    #[test]
    fn test_r12_detection() {
        assert!(DXF_R12.is_r12());
        assert!(!DXF_R2000.is_r12());
    }
}
