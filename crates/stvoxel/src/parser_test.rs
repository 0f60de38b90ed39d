use super::*;

fn parse_one(token: &str) -> VoxelDefinition {
  parse_identifier(token).unwrap_or_else(|e| panic!("'{}' failed: {}", token, e))
}

// =========================================================================
// Batch splitting
// =========================================================================

#[test]
fn test_empty_input_yields_nothing() {
  assert_eq!(parse_identifiers(""), ParseReport::default());
  assert_eq!(parse_identifiers("   "), ParseReport::default());
  assert_eq!(parse_identifiers(" , ,"), ParseReport::default());
}

#[test]
fn test_decoration_is_stripped() {
  let report = parse_identifiers("['4/0/14:1/3', '3/0/1/2']");
  assert!(report.is_clean());
  assert_eq!(report.definitions.len(), 2);
  assert_eq!(report.definitions[0].spatial_id(), "4/0/14:1/3");
  assert_eq!(report.definitions[1].spatial_id(), "3/0/1/2");
}

#[test]
fn test_double_quotes_are_stripped() {
  let report = parse_identifiers(r#"["5/1/2/3"]"#);
  assert!(report.is_clean());
  assert_eq!(report.definitions[0], VoxelDefinition::unit(5, 1, 2, 3));
}

#[test]
fn test_order_is_preserved() {
  let report = parse_identifiers("3/0/7/0, 3/0/0/0, 3/0/4/0");
  let xs: Vec<_> = report.definitions.iter().map(|d| d.x).collect();
  assert_eq!(
    xs,
    [
      DimensionValue::Scalar(7),
      DimensionValue::Scalar(0),
      DimensionValue::Scalar(4)
    ]
  );
}

#[test]
fn test_malformed_token_does_not_discard_batch() {
  let report = parse_identifiers("3/0/1/2, 3/0/x/2, 3/0/1, 3/0/2/2");
  assert_eq!(report.definitions.len(), 2);
  assert_eq!(report.errors.len(), 2);

  assert_eq!(report.errors[0].index, 1);
  assert_eq!(report.errors[0].token, "3/0/x/2");
  assert_eq!(
    report.errors[0].error,
    ParseError::InvalidInteger {
      axis: Axis::X,
      text: "x".to_string()
    }
  );
  assert_eq!(report.errors[1].index, 2);
  assert_eq!(report.errors[1].error, ParseError::SegmentCount { found: 3 });
}

// =========================================================================
// Axis shapes
// =========================================================================

#[test]
fn test_dash_at_zoom_zero_is_scalar_zero() {
  let def = parse_one("0/0/-/-");
  assert_eq!(def.x, DimensionValue::Scalar(0));
  assert_eq!(def.y, DimensionValue::Scalar(0));
}

#[test]
fn test_dash_at_zoom_three_is_full_range() {
  let def = parse_one("3/0/-/-");
  assert_eq!(def.x, DimensionValue::Range(0, 7));
  assert_eq!(def.y, DimensionValue::Range(0, 7));
}

#[test]
fn test_dash_floor_is_unbounded() {
  let def = parse_one("4/-/1/1");
  assert_eq!(def.f, FloorValue::Unbounded);
}

#[test]
fn test_half_open_ranges() {
  let def = parse_one("4/3:-/5:-/-:2");
  assert_eq!(def.f, FloorValue::Bounded(DimensionValue::Range(3, 15)));
  assert_eq!(def.x, DimensionValue::Range(5, 15));
  assert_eq!(def.y, DimensionValue::Range(0, 2));
}

#[test]
fn test_floor_open_start_reaches_negative_bands() {
  let def = parse_one("4/-:2/0/0");
  assert_eq!(def.f, FloorValue::Bounded(DimensionValue::Range(-16, 2)));
}

#[test]
fn test_negative_floor_scalar() {
  let def = parse_one("4/-3/0/0");
  assert_eq!(def.f, FloorValue::Bounded(DimensionValue::Scalar(-3)));
}

#[test]
fn test_x_keeps_order_y_and_f_sort() {
  let def = parse_one("4/5:2/14:1/9:3");
  assert_eq!(def.f, FloorValue::Bounded(DimensionValue::Range(2, 5)));
  assert_eq!(def.x, DimensionValue::Range(14, 1));
  assert_eq!(def.y, DimensionValue::Range(3, 9));
}

#[test]
fn test_from_str() {
  let def: VoxelDefinition = "4/0/14:1/3".parse().unwrap();
  assert_eq!(def.to_string(), "4/0/14:1/3");
}

// =========================================================================
// Validation
// =========================================================================

#[test]
fn test_negative_zoom_rejected() {
  assert!(matches!(
    parse_identifier("-1/0/0/0"),
    Err(ParseError::InvalidInteger { axis: Axis::Z, .. })
  ));
}

#[test]
fn test_zoom_past_max_rejected() {
  assert_eq!(
    parse_identifier("63/0/0/0"),
    Err(ParseError::ZoomOutOfRange { zoom: 63 })
  );
  assert!(parse_identifier("62/0/0/0").is_ok());
}

#[test]
fn test_index_out_of_range_rejected() {
  assert_eq!(
    parse_identifier("3/0/8/0"),
    Err(ParseError::IndexOutOfRange {
      axis: Axis::X,
      value: 8,
      min: 0,
      max: 7,
      zoom: 3
    })
  );
  assert!(matches!(
    parse_identifier("3/-9/0/0"),
    Err(ParseError::IndexOutOfRange { axis: Axis::F, .. })
  ));
  assert!(matches!(
    parse_identifier("3/0/0/-1"),
    Err(ParseError::InvalidInteger { axis: Axis::Y, .. })
      | Err(ParseError::IndexOutOfRange { axis: Axis::Y, .. })
  ));
}

// =========================================================================
// Time part
// =========================================================================

#[test]
fn test_single_tick() {
  let def = parse_one("3/0/1/1_60/2");
  assert_eq!(def.time, Some(TimeWindow::new(120.0, 180.0)));
}

#[test]
fn test_tick_range_upper_bound_exclusive() {
  let def = parse_one("3/0/1/1_10/2:4");
  assert_eq!(def.start_time(), Some(20.0));
  assert_eq!(def.end_time(), Some(50.0));
}

#[test]
fn test_tick_range_sorted() {
  let def = parse_one("3/0/1/1_10/4:2");
  assert_eq!(def.time, Some(TimeWindow::new(20.0, 50.0)));
}

#[test]
fn test_open_tick_ranges() {
  let def = parse_one("3/0/1/1_10/3:-");
  assert_eq!(def.start_time(), Some(30.0));
  assert_eq!(def.end_time(), Some(f64::INFINITY));

  let def = parse_one("3/0/1/1_10/-:3");
  assert_eq!(def.time, Some(TimeWindow::new(0.0, 40.0)));
}

#[test]
fn test_dash_tick_is_unconstrained() {
  let def = parse_one("3/0/1/1_10/-");
  assert_eq!(def.time, None);
}

#[test]
fn test_bad_interval_rejected() {
  assert!(matches!(
    parse_identifier("3/0/1/1_0/2"),
    Err(ParseError::InvalidInterval { .. })
  ));
  assert!(matches!(
    parse_identifier("3/0/1/1_abc/2"),
    Err(ParseError::InvalidInterval { .. })
  ));
  assert!(matches!(
    parse_identifier("3/0/1/1_10"),
    Err(ParseError::InvalidTimePart { .. })
  ));
}

#[test]
fn test_last_underscore_splits_time() {
  // Underscore inside the spatial part is not valid; the last one wins.
  assert!(parse_identifier("3/0/1/1_x_10/2").is_err());
}
