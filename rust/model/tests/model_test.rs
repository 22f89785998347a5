// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use ifc_view_core::SchemaVersion;
use ifc_view_model::{ElementId, ElementSet, IfcModel, ModelError, PropertyKind, QueryError, VisibilitySet};
use std::path::PathBuf;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("ifc")
        .join("small_house.ifc")
}

fn load() -> IfcModel {
    IfcModel::open(fixture_path()).expect("fixture should load")
}

fn ids(raw: &[u32]) -> ElementSet {
    raw.iter().copied().map(ElementId).collect()
}

#[test]
fn test_open_names_model_after_file() {
    let model = load();
    let summary = model.summary();

    assert_eq!(model.name(), "small_house.ifc");
    assert_eq!(model.schema(), SchemaVersion::Ifc4);
    assert_eq!(summary.entity_count, 28);
    assert_eq!(summary.element_count, 9);
    assert_eq!(summary.property_set_count, 4);
    assert_eq!(model.key().len(), 64);
}

#[test]
fn test_elements_exclude_definitions_and_types() {
    let model = load();
    let found: Vec<u32> = model.element_ids().map(|id| id.0).collect();
    assert_eq!(found, vec![1, 3, 4, 10, 11, 12, 13, 14, 15]);
    assert!(model.element(ElementId(52)).is_none());

    let wall = model.element(ElementId(10)).unwrap();
    assert_eq!(wall.name.as_deref(), Some("Wall; north"));
    assert_eq!(wall.global_id.as_deref(), Some("1Xl4DSvBL7fQb0ZzCL3Fkb"));
}

#[test]
fn test_category_and_property_queries() {
    let model = load();

    assert_eq!(model.find("Wall", "Material").unwrap(), ids(&[10, 11]));
    assert_eq!(model.find("Door", "Width").unwrap(), ids(&[12]));
    assert_eq!(model.find("", "width").unwrap(), ids(&[12, 13]));
    assert_eq!(model.find("slab", "area").unwrap(), ids(&[14]));
    assert_eq!(model.find("proxy", "").unwrap(), ids(&[15]));
    assert!(model.find("proxy", ".").unwrap().is_empty());
}

#[test]
fn test_type_object_properties_are_inherited() {
    let model = load();
    let window = model.element(ElementId(13)).unwrap();
    let width = window.property("Width").unwrap();

    assert_eq!(width.set_name, "Pset_WindowCommon");
    assert_eq!(width.value, "1.2");
    assert_eq!(width.kind, PropertyKind::Number);
}

#[test]
fn test_invalid_pattern_is_a_query_error() {
    let model = load();
    assert!(matches!(
        model.find("[", "Width"),
        Err(QueryError::InvalidPattern { .. })
    ));
}

#[test]
fn test_property_table_groups_by_set() {
    let model = load();

    let door = model.property_table(ElementId(12)).unwrap();
    assert_eq!(door.type_name, "IfcDoor");
    assert_eq!(door.sets.len(), 1);
    assert_eq!(door.sets[0].set_name, "Pset_DoorCommon");
    let names: Vec<&str> = door.sets[0].properties.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Width", "FireRating"]);

    let slab = model.property_table(ElementId(14)).unwrap();
    let area = &slab.sets[0].properties[0];
    assert_eq!(area.name, "NetArea");
    assert_eq!(area.value, "42.5");
    assert_eq!(area.kind, PropertyKind::Area);

    let wall = model.property_table(ElementId(10)).unwrap();
    let external = &wall.sets[0].properties[1];
    assert_eq!(external.value, "true");
    assert_eq!(external.kind, PropertyKind::Boolean);

    assert!(model.property_table(ElementId(999)).is_none());
}

#[test]
fn test_visibility_follows_query() {
    let model = load();
    let mut visibility = VisibilitySet::new(model.element_ids());
    assert_eq!(visibility.total(), 9);

    let doors = model.find("door", "").unwrap();
    visibility.set_visibility(false, None);
    visibility.set_visibility(true, Some(&doors));

    assert_eq!(visibility.visible_ids().collect::<Vec<_>>(), vec![ElementId(12)]);
}

#[test]
fn test_rejects_bad_input() {
    assert!(matches!(
        IfcModel::from_bytes("bad.ifc", vec![0xff, 0xfe, 0x00]),
        Err(ModelError::InvalidUtf8(_))
    ));
    assert!(matches!(
        IfcModel::from_content("empty.ifc", "ISO-10303-21;\nHEADER;\nFILE_SCHEMA(('IFC4'));\nENDSEC;\nDATA;\nENDSEC;\n"),
        Err(ModelError::Empty(_))
    ));
    assert!(matches!(
        IfcModel::open("/definitely/not/here.ifc"),
        Err(ModelError::Io { .. })
    ));
}

#[test]
fn test_malformed_statement_with_multibyte_text_is_skipped() {
    // 'ü' straddles byte 100 of the broken statement
    let broken = format!("#10=IFCWALL('{}\u{fc}',@);", "a".repeat(86));
    let content = format!(
        "ISO-10303-21;\nHEADER;\nFILE_SCHEMA(('IFC4'));\nENDSEC;\nDATA;\n{}\n#11=IFCWALL('2O2Fr$t4X7Zf8NOew3FNr2',$,'Wall B',$,$,$,$,$,$);\nENDSEC;\nEND-ISO-10303-21;\n",
        broken
    );

    let model = IfcModel::from_content("broken.ifc", &content).unwrap();
    assert_eq!(model.element_ids().collect::<Vec<_>>(), vec![ElementId(11)]);
}
