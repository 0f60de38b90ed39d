//! Viewport culling of voxel definitions.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::bounds::GeoBounds;
use super::lod::min_voxel_zoom_level;
use crate::constants::{DEFAULT_MARGIN_DEGREES, MAX_LATITUDE};
use crate::projector::definition_bounds;
use crate::types::VoxelDefinition;

/// Camera state driving culling and level of detail.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
  /// Map zoom (fractional).
  pub zoom: f64,
  /// Center longitude in degrees.
  pub longitude: f64,
  /// Center latitude in degrees.
  pub latitude: f64,
}

impl Viewport {
  pub fn new(zoom: f64, longitude: f64, latitude: f64) -> Self {
    Self {
      zoom,
      longitude,
      latitude,
    }
  }
}

/// Drops definitions that are too fine for the map zoom or lie outside a
/// margin around the viewport center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportFilter {
  /// Window half-size in degrees.
  pub margin: f64,
}

impl Default for ViewportFilter {
  fn default() -> Self {
    Self {
      margin: DEFAULT_MARGIN_DEGREES,
    }
  }
}

impl ViewportFilter {
  pub fn new(margin: f64) -> Self {
    Self { margin }
  }

  /// Window kept around the viewport center.
  pub fn window(&self, viewport: &Viewport) -> GeoBounds {
    GeoBounds::from_center_half_extents(
      DVec2::new(viewport.longitude, viewport.latitude),
      DVec2::splat(self.margin),
      MAX_LATITUDE,
    )
  }

  /// Check a single definition against the zoom cut and the window.
  pub fn keeps(&self, definition: &VoxelDefinition, max_zoom: u8, window: &GeoBounds) -> bool {
    definition.z <= max_zoom
      && definition_bounds(definition).map_or(false, |bounds| bounds.overlaps(window))
  }

  /// Definitions visible from `viewport`, in input order.
  ///
  /// Returns the input unchanged if every definition would be dropped.
  pub fn filter(&self, definitions: &[VoxelDefinition], viewport: &Viewport) -> Vec<VoxelDefinition> {
    let max_zoom = min_voxel_zoom_level(viewport.zoom);
    let window = self.window(viewport);
    let kept: Vec<VoxelDefinition> = definitions
      .iter()
      .filter(|d| self.keeps(d, max_zoom, &window))
      .copied()
      .collect();

    if kept.is_empty() && !definitions.is_empty() {
      tracing::debug!(
        definitions = definitions.len(),
        zoom = viewport.zoom,
        "viewport filter removed everything, keeping input"
      );
      return definitions.to_vec();
    }
    kept
  }
}

#[cfg(test)]
#[path = "filter_test.rs"]
mod filter_test;
