use super::*;
use crate::error::ParseError;
use crate::types::{DimensionValue, FloorValue, TimeWindow};

const DOCUMENT: &str = r#"{
  "meta": { "kasaneSchemaVersion": "1.0", "description": "sensors" },
  "data": [
    {
      "name": "temperature",
      "value": [21.5, "warm", { "unit": "C" }],
      "ids": [
        { "z": 4, "x": [14, 1], "y": [3], "f": [0], "ref": 0 },
        { "z": 3, "x": [2], "y": [5, 1], "ref": 1 },
        { "z": 3, "x": [1], "y": [1], "f": [0], "i": 60, "t": [2, 4], "ref": 2 }
      ]
    },
    {
      "name": "humidity",
      "value": [0.4],
      "ids": [
        { "z": 4, "x": [14, 1], "y": [3], "f": [0], "ref": 0 },
        { "z": 2, "ref": 7 }
      ]
    }
  ]
}"#;

#[test]
fn test_definitions_in_document_order() {
  let import = import_str(DOCUMENT).unwrap();
  let ids: Vec<_> = import.definitions.iter().map(|d| d.spatial_id()).collect();
  assert_eq!(ids, ["4/0/14:1/3", "3/-/2/1:5", "3/0/1/1", "2/-/0:3/0:3"]);
}

#[test]
fn test_axis_defaults() {
  let import = import_str(DOCUMENT).unwrap();
  let open = &import.definitions[3];
  assert_eq!(open.f, FloorValue::Unbounded);
  assert_eq!(open.x, DimensionValue::Range(0, 3));
  assert_eq!(open.time, None);

  let zoom_zero = import_str(
    r#"{ "meta": { "kasaneSchemaVersion": "1" }, "data": [{ "name": "a", "value": [], "ids": [{ "z": 0, "ref": 0 }] }] }"#,
  )
  .unwrap();
  assert_eq!(zoom_zero.definitions[0].x, DimensionValue::Scalar(0));
  assert_eq!(zoom_zero.definitions[0].y, DimensionValue::Scalar(0));
}

#[test]
fn test_time_from_interval_and_ticks() {
  let import = import_str(DOCUMENT).unwrap();
  assert_eq!(import.definitions[2].time, Some(TimeWindow::new(120.0, 300.0)));
}

#[test]
fn test_interval_without_ticks_is_untimed() {
  let document = r#"{ "meta": { "kasaneSchemaVersion": "1" }, "data": [
    { "name": "a", "value": [1], "ids": [{ "z": 3, "x": [1], "y": [1], "i": 10, "ref": 0 }] }
  ] }"#;
  let import = import_str(document).unwrap();
  assert_eq!(import.definitions[0].time, None);
}

#[test]
fn test_tooltips_merge_repeated_ids() {
  let import = import_str(DOCUMENT).unwrap();
  assert_eq!(
    import.tooltip("4/0/14:1/3"),
    Some("4/0/14:1/3 | temperature: 21.5\nhumidity: 0.4")
  );
}

#[test]
fn test_tooltip_value_rendering() {
  let import = import_str(DOCUMENT).unwrap();
  assert_eq!(import.tooltip("3/-/2/1:5"), Some("3/-/2/1:5 | temperature: warm"));
  assert_eq!(
    import.tooltip("3/0/1/1"),
    Some(r#"3/0/1/1 | temperature: {"unit":"C"}"#)
  );
  // Dangling ref
  assert_eq!(import.tooltip("2/-/0:3/0:3"), Some("2/-/0:3/0:3 | humidity: null"));
}

#[test]
fn test_bad_arity_is_rejected() {
  let document = r#"{ "meta": { "kasaneSchemaVersion": "1" }, "data": [
    { "name": "a", "value": [], "ids": [{ "z": 3, "x": [1, 2, 3], "ref": 0 }] }
  ] }"#;
  match import_str(document) {
    Err(ImportError::DimensionArity { axis, len, index, .. }) => {
      assert_eq!(axis, Axis::X);
      assert_eq!(len, 3);
      assert_eq!(index, 0);
    }
    other => panic!("unexpected {:?}", other),
  }
}

#[test]
fn test_out_of_range_index_is_rejected() {
  let document = r#"{ "meta": { "kasaneSchemaVersion": "1" }, "data": [
    { "name": "a", "value": [], "ids": [{ "z": 3, "x": [1], "ref": 0 }, { "z": 3, "x": [8], "ref": 0 }] }
  ] }"#;
  match import_str(document) {
    Err(ImportError::InvalidId { name, index, error }) => {
      assert_eq!(name, "a");
      assert_eq!(index, 1);
      assert!(matches!(error, ParseError::IndexOutOfRange { axis: Axis::X, .. }));
    }
    other => panic!("unexpected {:?}", other),
  }
}

#[test]
fn test_malformed_json_is_rejected() {
  assert!(matches!(import_str("{ nope"), Err(ImportError::Json(_))));
  assert!(matches!(import_str(r#"{ "data": [] }"#), Err(ImportError::Json(_))));
}

#[test]
fn test_identifier_text() {
  let id = IdEntry {
    z: 5,
    f: Some(vec![-2, 1]),
    x: None,
    y: Some(vec![7]),
    i: Some(0.5),
    t: Some(vec![3]),
    reference: 0,
  };
  assert_eq!(identifier_text("a", 0, &id).unwrap(), "5/-2:1/-/7_0.5/3");
}
