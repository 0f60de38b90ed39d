use super::*;

#[test]
fn test_altitude_extent_matches_log2() {
  assert_eq!(ALTITUDE_EXTENT, 2f64.powi(ALTITUDE_EXTENT_LOG2));
  assert_eq!(ALTITUDE_EXTENT, 33_554_432.0);
}

#[test]
fn test_tiles_per_axis() {
  assert_eq!(tiles_per_axis(0), Some(1));
  assert_eq!(tiles_per_axis(3), Some(8));
  assert_eq!(tiles_per_axis(20), Some(1 << 20));
  assert_eq!(tiles_per_axis(MAX_ZOOM), Some(1i64 << 62));
  assert_eq!(tiles_per_axis(MAX_ZOOM + 1), None);
}

#[test]
fn test_index_bounds() {
  assert_eq!(max_index(0), Some(0));
  assert_eq!(max_index(4), Some(15));
  assert_eq!(min_floor(4), Some(-16));
  assert_eq!(min_floor(200), None);
}

#[test]
fn test_band_height_halves_per_zoom() {
  assert_eq!(band_height(0), ALTITUDE_EXTENT);
  assert_eq!(band_height(20), 32.0);
  assert_eq!(band_height(25), 1.0);
  assert_eq!(band_height(26), 0.5);

  for z in 0..40u8 {
    assert_eq!(band_height(z), band_height(z + 1) * 2.0, "zoom {}", z);
  }
}
