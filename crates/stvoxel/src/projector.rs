//! Tile projector: tile indices to geographic polygons.
//!
//! # Geometry
//!
//! ```text
//!            minLon          maxLon
//!   maxLat   [1]──────────────[0,4]     row Y         (north edge)
//!             │                 │
//!             │      tile       │
//!             │                 │
//!   minLat   [2]──────────────[3]       row Y2 + 1    (south edge)
//!          col X            col X2 + 1
//! ```
//!
//! Longitude is linear in the column, latitude is inverse Web-Mercator in the
//! row. Every ring point sits at the base altitude `F * 2^(25 - Z)` and the
//! polygon is extruded by `(F2 - F + 1) * 2^(25 - Z)` meters.

use glam::DVec2;

use crate::color::Rgba;
use crate::constants::{band_height, tiles_per_axis};
use crate::error::{Axis, ProjectError};
use crate::types::{Polygon, Tile, VoxelDefinition};
use crate::viewport::GeoBounds;

/// West edge longitude of column `col` at `zoom`.
#[inline]
pub fn lon_of_column(col: i64, zoom: u8) -> f64 {
  let n = 2f64.powi(zoom as i32);
  -180.0 + 360.0 / n * col as f64
}

/// North edge latitude of row `row` at `zoom` (inverse Web-Mercator).
#[inline]
pub fn lat_of_row(row: i64, zoom: u8) -> f64 {
  let n = 2f64.powi(zoom as i32);
  let y = std::f64::consts::PI - (row as f64 / n) * std::f64::consts::TAU;
  y.sinh().atan().to_degrees()
}

/// Altitude of the bottom of band `f` at `zoom`, in meters.
#[inline]
pub fn base_altitude(zoom: u8, f: i64) -> f64 {
  f as f64 * band_height(zoom)
}

/// Height of bands `[f, f2]` at `zoom`, in meters.
#[inline]
pub fn extrusion(zoom: u8, f: i64, f2: i64) -> f64 {
  (f2 as i128 - f as i128 + 1) as f64 * band_height(zoom)
}

/// Tiles must be ordered and inside `[0, 2^Z)` for X/Y, `[-2^Z, 2^Z)` for F.
fn check_tile(tile: &Tile) -> Result<(), ProjectError> {
  let n = tiles_per_axis(tile.z).ok_or(ProjectError::ZoomOverflow { zoom: tile.z })?;
  if tile.x > tile.x2 || tile.y > tile.y2 || tile.f > tile.f2 {
    return Err(ProjectError::InvertedRange {
      id: tile.original_id.clone(),
    });
  }

  let axes = [
    (Axis::X, tile.x, tile.x2, 0),
    (Axis::Y, tile.y, tile.y2, 0),
    (Axis::F, tile.f, tile.f2, -n),
  ];
  for (axis, lo, hi, min) in axes {
    if lo < min || hi >= n {
      return Err(ProjectError::OutOfRange {
        id: tile.original_id.clone(),
        axis,
        lo,
        hi,
        zoom: tile.z,
      });
    }
  }
  Ok(())
}

/// Geographic footprint of a tile.
pub fn tile_bounds(tile: &Tile) -> Result<GeoBounds, ProjectError> {
  check_tile(tile)?;
  Ok(GeoBounds::new(
    DVec2::new(lon_of_column(tile.x, tile.z), lat_of_row(tile.y2 + 1, tile.z)),
    DVec2::new(lon_of_column(tile.x2 + 1, tile.z), lat_of_row(tile.y, tile.z)),
  ))
}

/// Geographic footprint of a definition; wraps when its X range does.
///
/// A wrapping range that covers every column spans `[-180, 180]`.
/// Returns `None` past [`MAX_ZOOM`](crate::constants::MAX_ZOOM).
pub fn definition_bounds(definition: &VoxelDefinition) -> Option<GeoBounds> {
  let z = definition.z;
  let n = tiles_per_axis(z)?;
  let (x_lo, x_hi) = definition.x.bounds();
  let (y_lo, y_hi) = definition.y.normalized();

  let columns = if x_lo > x_hi {
    n - x_lo + x_hi + 1
  } else {
    x_hi - x_lo + 1
  };
  let (west, east) = if columns >= n {
    (-180.0, 180.0)
  } else {
    (lon_of_column(x_lo, z), lon_of_column(x_hi + 1, z))
  };

  Some(GeoBounds::new(
    DVec2::new(west, lat_of_row(y_hi + 1, z)),
    DVec2::new(east, lat_of_row(y_lo, z)),
  ))
}

/// Project one tile into an extruded polygon.
pub fn project(tile: &Tile, color: Rgba) -> Result<Polygon, ProjectError> {
  let bounds = tile_bounds(tile)?;
  let alt = base_altitude(tile.z, tile.f);
  let (west, south) = (bounds.min.x, bounds.min.y);
  let (east, north) = (bounds.max.x, bounds.max.y);

  Ok(Polygon {
    points: [
      [east, north, alt],
      [west, north, alt],
      [west, south, alt],
      [east, south, alt],
      [east, north, alt],
    ],
    elevation: extrusion(tile.z, tile.f, tile.f2),
    voxel_id: tile.voxel_id(),
    source_id: tile.original_id.clone(),
    color,
    time: tile.time,
  })
}

/// Project tiles in order, stopping at the first failure.
pub fn project_all(tiles: &[Tile], color: Rgba) -> Result<Vec<Polygon>, ProjectError> {
  tiles.iter().map(|tile| project(tile, color)).collect()
}

/// Parallel [`project_all`]; output order matches input order.
#[cfg(feature = "parallel")]
pub fn project_all_par(tiles: &[Tile], color: Rgba) -> Result<Vec<Polygon>, ProjectError> {
  use rayon::prelude::*;

  tiles.par_iter().map(|tile| project(tile, color)).collect()
}

/// Camera target for "fly to" on a set of definitions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FocusTarget {
  pub longitude: f64,
  pub latitude: f64,
  /// Start of the first definition's time window, if any.
  pub start_time: Option<f64>,
}

/// Center of the first definition plus its start time.
pub fn focus_target(definitions: &[VoxelDefinition]) -> Option<FocusTarget> {
  let first = definitions.first()?;
  let center = definition_bounds(first)?.center();
  Some(FocusTarget {
    longitude: center.x,
    latitude: center.y,
    start_time: first.start_time(),
  })
}

#[cfg(test)]
#[path = "projector_test.rs"]
mod projector_test;
