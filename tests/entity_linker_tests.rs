//! Sequence linking over loaded entity streams

mod common;

use common::{factory, tag, test_document};
use dxf_attribs_rs::entities::EntityLinker;
use dxf_attribs_rs::error::DxfError;
use dxf_attribs_rs::notification::NotificationCollection;
use dxf_attribs_rs::tags::{DxfTag, TagCollector};
use dxf_attribs_rs::types::{Handle, Vector3, DXF_R2000};

/// Load a stream of records and feed it through the linker
fn link_stream(records: Vec<Vec<DxfTag>>) -> Result<Vec<dxf_attribs_rs::DxfEntity>, DxfError> {
    let f = factory();
    let mut notes = NotificationCollection::new();
    let mut linker = EntityLinker::new();
    for record in records {
        let entity = f.from_tags(record, Some(DXF_R2000), &mut notes)?;
        linker.push(entity)?;
    }
    Ok(linker.finish())
}

fn vertex_record(handle: &str, x: f64, y: f64) -> Vec<DxfTag> {
    vec![
        tag(0, "VERTEX"),
        tag(5, handle),
        tag(100, "AcDbEntity"),
        tag(8, "0"),
        tag(100, "AcDbVertex"),
        tag(10, x),
        tag(20, y),
        tag(30, 0.0),
    ]
}

#[test]
fn test_polyline_stream_rebuilds_sequence() {
    let space = link_stream(vec![
        vec![
            tag(0, "POLYLINE"),
            tag(5, "40"),
            tag(100, "AcDbEntity"),
            tag(8, "Walls"),
            tag(100, "AcDb2dPolyline"),
            tag(70, 1i16),
        ],
        vertex_record("41", 0.0, 0.0),
        vertex_record("42", 10.0, 0.0),
        vertex_record("43", 10.0, 5.0),
        vec![tag(0, "SEQEND"), tag(5, "44"), tag(100, "AcDbEntity"), tag(8, "Walls")],
        vec![
            tag(0, "LINE"),
            tag(5, "45"),
            tag(100, "AcDbEntity"),
            tag(8, "0"),
            tag(100, "AcDbLine"),
            tag(10, 0.0),
            tag(20, 0.0),
            tag(30, 0.0),
            tag(11, 1.0),
            tag(21, 1.0),
            tag(31, 0.0),
        ],
    ])
    .unwrap();

    assert_eq!(space.len(), 2);
    let polyline = &space[0];
    assert_eq!(polyline.dxftype(), "POLYLINE");
    assert_eq!(polyline.linked_entities().len(), 3);
    assert_eq!(
        polyline.linked_entities()[1].dxf.get("location").unwrap().as_point3(),
        Some(Vector3::new(10.0, 0.0, 0.0))
    );
    assert_eq!(polyline.seqend().unwrap().dxftype(), "SEQEND");
    assert_eq!(space[1].dxftype(), "LINE");
}

#[test]
fn test_insert_with_attribs() {
    let space = link_stream(vec![
        vec![
            tag(0, "INSERT"),
            tag(5, "50"),
            tag(100, "AcDbEntity"),
            tag(8, "0"),
            tag(100, "AcDbBlockReference"),
            tag(66, 1i16),
            tag(2, "DOOR"),
            tag(10, 4.0),
            tag(20, 2.0),
            tag(30, 0.0),
        ],
        vec![
            tag(0, "ATTRIB"),
            tag(5, "51"),
            tag(100, "AcDbEntity"),
            tag(8, "0"),
            tag(100, "AcDbText"),
            tag(10, 4.0),
            tag(20, 2.0),
            tag(30, 0.0),
            tag(1, "D-101"),
            tag(100, "AcDbAttribute"),
            tag(2, "DOOR_NO"),
            tag(70, 0i16),
        ],
        vec![tag(0, "SEQEND"), tag(5, "52"), tag(100, "AcDbEntity"), tag(8, "0")],
    ])
    .unwrap();

    assert_eq!(space.len(), 1);
    let insert = &space[0];
    assert_eq!(insert.dxf.get("name").unwrap().as_str(), Some("DOOR"));
    let attrib = &insert.linked_entities()[0];
    assert_eq!(attrib.dxf.get("tag").unwrap().as_str(), Some("DOOR_NO"));
    assert_eq!(attrib.dxf.get("text").unwrap().as_str(), Some("D-101"));
}

#[test]
fn test_insert_without_follow_flag_owns_nothing() {
    let space = link_stream(vec![
        vec![
            tag(0, "INSERT"),
            tag(5, "50"),
            tag(100, "AcDbEntity"),
            tag(8, "0"),
            tag(100, "AcDbBlockReference"),
            tag(2, "DOOR"),
            tag(10, 0.0),
            tag(20, 0.0),
            tag(30, 0.0),
        ],
        vec![
            tag(0, "POINT"),
            tag(5, "51"),
            tag(100, "AcDbEntity"),
            tag(8, "0"),
            tag(100, "AcDbPoint"),
            tag(10, 0.0),
            tag(20, 0.0),
            tag(30, 0.0),
        ],
    ])
    .unwrap();

    assert_eq!(space.len(), 2);
    assert!(space[0].linked_entities().is_empty());
}

#[test]
fn test_member_of_wrong_type_fails_at_offending_record() {
    let err = link_stream(vec![
        vec![
            tag(0, "POLYLINE"),
            tag(5, "40"),
            tag(100, "AcDbEntity"),
            tag(8, "0"),
            tag(100, "AcDb2dPolyline"),
            tag(70, 1i16),
        ],
        vec![
            tag(0, "LINE"),
            tag(5, "41"),
            tag(100, "AcDbEntity"),
            tag(8, "0"),
            tag(100, "AcDbLine"),
        ],
    ])
    .unwrap_err();
    match err {
        DxfError::Structure(msg) => {
            assert!(msg.contains("VERTEX"));
            assert!(msg.contains("LINE"));
        }
        other => panic!("expected structure error, got {:?}", other),
    }
}

#[test]
fn test_handleless_mtext_becomes_satellite() {
    let space = link_stream(vec![
        vec![
            tag(0, "LINE"),
            tag(5, "45"),
            tag(100, "AcDbEntity"),
            tag(8, "0"),
            tag(100, "AcDbLine"),
        ],
        // no handle tag at all: this MTEXT belongs to the LINE
        vec![
            tag(0, "MTEXT"),
            tag(100, "AcDbEntity"),
            tag(8, "0"),
            tag(100, "AcDbMText"),
            tag(1, "note"),
        ],
    ])
    .unwrap();

    assert_eq!(space.len(), 1);
    let satellites = space[0].attached_entities();
    assert_eq!(satellites.len(), 1);
    assert_eq!(satellites[0].dxf.get("text").unwrap().as_str(), Some("note"));
}

#[test]
fn test_mtext_with_handle_stays_standalone() {
    let space = link_stream(vec![
        vec![
            tag(0, "LINE"),
            tag(5, "45"),
            tag(100, "AcDbEntity"),
            tag(8, "0"),
            tag(100, "AcDbLine"),
        ],
        vec![
            tag(0, "MTEXT"),
            tag(5, "46"),
            tag(100, "AcDbEntity"),
            tag(8, "0"),
            tag(100, "AcDbMText"),
            tag(1, "label"),
        ],
    ])
    .unwrap();
    assert_eq!(space.len(), 2);
    assert!(space[0].attached_entities().is_empty());
}

#[test]
fn test_leading_orphan_mtext_is_a_structure_error() {
    let err = link_stream(vec![vec![
        tag(0, "MTEXT"),
        tag(100, "AcDbEntity"),
        tag(8, "0"),
        tag(100, "AcDbMText"),
        tag(1, "orphan"),
    ]])
    .unwrap_err();
    assert!(matches!(err, DxfError::Structure(_)));
}

#[test]
fn test_linked_sequence_binds_and_exports_in_order() {
    let f = factory();
    let mut doc = test_document(DXF_R2000);

    let mut polyline = f.new_entity("POLYLINE").unwrap();
    let mut vertex = f.new_entity("VERTEX").unwrap();
    vertex.dxf.set("location", Vector3::new(1.0, 2.0, 0.0)).unwrap();
    polyline.link_entity(vertex);
    polyline.link_seqend(f.new_entity("SEQEND").unwrap());

    polyline.bind(&mut doc).unwrap();
    polyline.set_owner(Handle::new(0x1), 0).unwrap();
    assert!(polyline.linked_entities()[0].handle().is_some());
    assert_eq!(
        polyline
            .seqend()
            .unwrap()
            .dxf
            .get_raw("owner")
            .and_then(dxf_attribs_rs::TagValue::as_handle),
        Some(Handle::new(0x1))
    );

    let mut w = TagCollector::new(DXF_R2000);
    polyline.export(&mut w, None).unwrap();
    let records: Vec<_> = w
        .tags()
        .iter()
        .filter(|t| t.code == 0)
        .map(|t| t.value.as_str().unwrap().to_string())
        .collect();
    assert_eq!(records, ["POLYLINE", "VERTEX", "SEQEND"]);
}
