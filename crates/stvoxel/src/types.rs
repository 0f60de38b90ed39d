//! Core value types: voxel definitions, compiled tiles and output polygons.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::constants::{max_index, min_floor};

/// A single index or an inclusive index range along one axis.
///
/// On the X axis `Range(lo, hi)` with `lo > hi` is meaningful: the range
/// crosses the antimeridian. Y ranges are always stored with `lo <= hi`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DimensionValue {
  Scalar(i64),
  Range(i64, i64),
}

impl DimensionValue {
  /// Range with `lo <= hi`, swapping the bounds if needed.
  #[inline]
  pub fn sorted(a: i64, b: i64) -> Self {
    DimensionValue::Range(a.min(b), a.max(b))
  }

  /// Bounds as stored (`lo` may exceed `hi` for wrapping X ranges).
  #[inline]
  pub fn bounds(&self) -> (i64, i64) {
    match *self {
      DimensionValue::Scalar(v) => (v, v),
      DimensionValue::Range(lo, hi) => (lo, hi),
    }
  }

  /// Bounds with `lo <= hi`.
  #[inline]
  pub fn normalized(&self) -> (i64, i64) {
    let (lo, hi) = self.bounds();
    (lo.min(hi), lo.max(hi))
  }

  /// True for an X range that crosses the antimeridian.
  #[inline]
  pub fn wraps(&self) -> bool {
    matches!(*self, DimensionValue::Range(lo, hi) if lo > hi)
  }
}

impl fmt::Display for DimensionValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      DimensionValue::Scalar(v) => write!(f, "{}", v),
      DimensionValue::Range(lo, hi) => write!(f, "{}:{}", lo, hi),
    }
  }
}

/// Value of the altitude (F) axis.
///
/// `Unbounded` covers every altitude band at the definition's zoom,
/// `[-2^Z, 2^Z - 1]`. Bounded ranges are stored with `lo <= hi`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FloorValue {
  Unbounded,
  Bounded(DimensionValue),
}

impl FloorValue {
  /// Resolved `[lo, hi]` band range at `zoom`.
  ///
  /// Returns `None` if `zoom` is past [`MAX_ZOOM`](crate::constants::MAX_ZOOM).
  pub fn resolve(&self, zoom: u8) -> Option<(i64, i64)> {
    match self {
      FloorValue::Unbounded => Some((min_floor(zoom)?, max_index(zoom)?)),
      FloorValue::Bounded(value) => Some(value.normalized()),
    }
  }
}

impl fmt::Display for FloorValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      FloorValue::Unbounded => f.write_str("-"),
      FloorValue::Bounded(value) => value.fmt(f),
    }
  }
}

/// Half-open time interval `[start, end)`; `end` may be `+inf`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
  pub start: f64,
  pub end: f64,
}

impl TimeWindow {
  pub fn new(start: f64, end: f64) -> Self {
    debug_assert!(start < end, "time window start must precede end");
    Self { start, end }
  }

  /// Check if `time` falls inside the window.
  #[inline]
  pub fn contains(&self, time: f64) -> bool {
    self.start <= time && time < self.end
  }
}

/// Visibility test shared by tiles and polygons: unconstrained items are
/// always visible.
#[inline]
pub fn visible_at(time: Option<&TimeWindow>, current_time: f64) -> bool {
  time.map_or(true, |window| window.contains(current_time))
}

/// One parsed voxel identifier.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VoxelDefinition {
  /// Tile pyramid zoom level (0 = whole world).
  pub z: u8,
  /// Altitude band(s).
  pub f: FloorValue,
  /// Longitude tile(s); may wrap.
  pub x: DimensionValue,
  /// Latitude tile(s), normalized.
  pub y: DimensionValue,
  /// `None` means time-unconstrained.
  pub time: Option<TimeWindow>,
}

impl VoxelDefinition {
  /// Unit voxel without a time window.
  pub fn unit(z: u8, f: i64, x: i64, y: i64) -> Self {
    Self {
      z,
      f: FloorValue::Bounded(DimensionValue::Scalar(f)),
      x: DimensionValue::Scalar(x),
      y: DimensionValue::Scalar(y),
      time: None,
    }
  }

  pub fn with_time(mut self, time: TimeWindow) -> Self {
    self.time = Some(time);
    self
  }

  #[inline]
  pub fn start_time(&self) -> Option<f64> {
    self.time.map(|t| t.start)
  }

  #[inline]
  pub fn end_time(&self) -> Option<f64> {
    self.time.map(|t| t.end)
  }

  /// `Z/F/X/Y` with `lo:hi` ranges and `-` for an unbounded altitude.
  ///
  /// This is the identity shared by compiled fragments and the key of the
  /// import tooltip table.
  pub fn spatial_id(&self) -> String {
    self.to_string()
  }
}

impl fmt::Display for VoxelDefinition {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}/{}/{}/{}", self.z, self.f, self.x, self.y)
  }
}

/// Compiled rectangular unit of rendering: never wraps, all ranges sorted.
#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
  pub z: u8,
  pub x: i64,
  pub x2: i64,
  pub y: i64,
  pub y2: i64,
  pub f: i64,
  pub f2: i64,
  /// Spatial id of the definition this tile was compiled from.
  pub original_id: String,
  /// True for the fragments of an antimeridian split.
  pub wrapped: bool,
  pub time: Option<TimeWindow>,
}

impl Tile {
  /// Unit tile at `(f, x, y)`.
  pub fn unit(z: u8, f: i64, x: i64, y: i64) -> Self {
    Self {
      z,
      x,
      x2: x,
      y,
      y2: y,
      f,
      f2: f,
      original_id: format!("{}/{}/{}/{}", z, f, x, y),
      wrapped: false,
      time: None,
    }
  }

  /// Check if the tile covers exactly one cell.
  #[inline]
  pub fn is_unit(&self) -> bool {
    self.x == self.x2 && self.y == self.y2 && self.f == self.f2
  }

  /// Number of unit cells covered.
  pub fn cell_count(&self) -> u128 {
    let span = |lo: i64, hi: i64| (hi as i128 - lo as i128 + 1).max(0) as u128;
    span(self.x, self.x2) * span(self.y, self.y2) * span(self.f, self.f2)
  }

  /// Definition covering exactly this tile's cells.
  pub fn to_definition(&self) -> VoxelDefinition {
    let dim = |lo: i64, hi: i64| {
      if lo == hi {
        DimensionValue::Scalar(lo)
      } else {
        DimensionValue::Range(lo, hi)
      }
    };
    VoxelDefinition {
      z: self.z,
      f: FloorValue::Bounded(dim(self.f, self.f2)),
      x: dim(self.x, self.x2),
      y: dim(self.y, self.y2),
      time: self.time,
    }
  }

  /// Identifier exposed to the renderer for picking.
  ///
  /// Wrapped fragments share their source id so both halves pick as one
  /// voxel. Every other tile is named by its lower corner, `Z/F/X/Y`.
  pub fn voxel_id(&self) -> String {
    if self.wrapped {
      self.original_id.clone()
    } else {
      format!("{}/{}/{}/{}", self.z, self.f, self.x, self.y)
    }
  }
}

/// Extruded footprint handed to the renderer.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Polygon {
  /// Closed clockwise ring of `[lon, lat, base_altitude]`.
  pub points: [[f64; 3]; 5],
  /// Extrusion height in meters above the ring.
  pub elevation: f64,
  #[serde(rename = "voxelID")]
  pub voxel_id: String,
  /// Spatial id of the definition the polygon was compiled from.
  #[serde(rename = "sourceID")]
  pub source_id: String,
  pub color: Rgba,
  pub time: Option<TimeWindow>,
}

impl Polygon {
  /// Base altitude shared by every ring point.
  #[inline]
  pub fn base_altitude(&self) -> f64 {
    self.points[0][2]
  }

  #[inline]
  pub fn start_time(&self) -> Option<f64> {
    self.time.map(|t| t.start)
  }

  #[inline]
  pub fn end_time(&self) -> Option<f64> {
    self.time.map(|t| t.end)
  }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
