//! Geographic bounding box with circular longitude.

use glam::DVec2;
use smallvec::{smallvec, SmallVec};

/// Wrap a longitude into `[-180, 180)`.
#[inline]
pub fn wrap_longitude(lon: f64) -> f64 {
  (lon + 180.0).rem_euclid(360.0) - 180.0
}

/// Longitude/latitude box in degrees (`x` = longitude, `y` = latitude).
///
/// `min.x > max.x` means the box crosses the antimeridian and covers
/// `[min.x, 180] ∪ [-180, max.x]`. Latitude never wraps.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoBounds {
  /// West/south corner (inclusive).
  pub min: DVec2,
  /// East/north corner (inclusive).
  pub max: DVec2,
}

impl GeoBounds {
  /// Create a box from its west/south and east/north corners.
  ///
  /// # Panics
  /// Debug-asserts that `min.y <= max.y`.
  pub fn new(min: DVec2, max: DVec2) -> Self {
    debug_assert!(min.y <= max.y, "latitude min must be <= max");
    Self { min, max }
  }

  /// Box of `half_extents` degrees around `center`.
  ///
  /// Longitude edges are wrapped into `[-180, 180)`; a box 360 degrees or
  /// wider covers every longitude. Latitude is clamped to
  /// `±max_latitude`.
  pub fn from_center_half_extents(center: DVec2, half_extents: DVec2, max_latitude: f64) -> Self {
    let (west, east) = if half_extents.x >= 180.0 {
      (-180.0, 180.0)
    } else {
      (
        wrap_longitude(center.x - half_extents.x),
        wrap_longitude(center.x + half_extents.x),
      )
    };
    let south = (center.y - half_extents.y).max(-max_latitude);
    let north = (center.y + half_extents.y).min(max_latitude);
    Self {
      min: DVec2::new(west, south.min(north)),
      max: DVec2::new(east, north.max(south)),
    }
  }

  /// Check if the box crosses the antimeridian.
  #[inline]
  pub fn wraps(&self) -> bool {
    self.min.x > self.max.x
  }

  /// Non-wrapping longitude intervals covered by the box.
  pub fn longitude_segments(&self) -> SmallVec<[(f64, f64); 2]> {
    if self.wraps() {
      smallvec![(self.min.x, 180.0), (-180.0, self.max.x)]
    } else {
      smallvec![(self.min.x, self.max.x)]
    }
  }

  /// Check if this box overlaps another, touching edges included.
  ///
  /// Longitude is compared on the circle, so either box may wrap.
  pub fn overlaps(&self, other: &GeoBounds) -> bool {
    if self.min.y > other.max.y || self.max.y < other.min.y {
      return false;
    }
    let ours = self.longitude_segments();
    let theirs = other.longitude_segments();
    ours
      .iter()
      .any(|&(a0, a1)| theirs.iter().any(|&(b0, b1)| a0 <= b1 && a1 >= b0))
  }

  /// Check if the box contains a point.
  #[inline]
  pub fn contains_point(&self, point: DVec2) -> bool {
    let in_lat = point.y >= self.min.y && point.y <= self.max.y;
    let in_lon = if self.wraps() {
      point.x >= self.min.x || point.x <= self.max.x
    } else {
      point.x >= self.min.x && point.x <= self.max.x
    };
    in_lat && in_lon
  }

  /// Width and height in degrees (width measured eastward across a wrap).
  #[inline]
  pub fn size(&self) -> DVec2 {
    let width = if self.wraps() {
      self.max.x + 360.0 - self.min.x
    } else {
      self.max.x - self.min.x
    };
    DVec2::new(width, self.max.y - self.min.y)
  }

  /// Center of the box, longitude wrapped into `[-180, 180)`.
  #[inline]
  pub fn center(&self) -> DVec2 {
    let size = self.size();
    DVec2::new(
      wrap_longitude(self.min.x + size.x * 0.5),
      self.min.y + size.y * 0.5,
    )
  }
}
