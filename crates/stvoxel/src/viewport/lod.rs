//! Zoom-driven level-of-detail rules.

use crate::budget::SubsampleBudget;
use crate::types::VoxelDefinition;

/// Finest detail level; nothing is thinned at this level.
pub const MAX_DETAIL_LEVEL: u8 = 3;

/// Finest voxel zoom worth drawing at map zoom `map_zoom`.
///
/// | map zoom | voxel zoom kept |
/// |----------|-----------------|
/// | < 3      | <= 2            |
/// | < 6      | <= 4            |
/// | < 9      | <= 8            |
/// | < 12     | <= 12           |
/// | < 15     | <= 16           |
/// | >= 15    | <= 24           |
pub fn min_voxel_zoom_level(map_zoom: f64) -> u8 {
  if map_zoom < 3.0 {
    2
  } else if map_zoom < 6.0 {
    4
  } else if map_zoom < 9.0 {
    8
  } else if map_zoom < 12.0 {
    12
  } else if map_zoom < 15.0 {
    16
  } else {
    24
  }
}

/// Detail level 0 (coarsest) to [`MAX_DETAIL_LEVEL`] for map zoom `map_zoom`.
pub fn detail_level(map_zoom: f64) -> u8 {
  if map_zoom < 5.0 {
    0
  } else if map_zoom < 10.0 {
    1
  } else if map_zoom < 15.0 {
    2
  } else {
    MAX_DETAIL_LEVEL
  }
}

/// Thin `definitions` for `detail`.
///
/// Drops definitions finer than the budget's zoom cap, then keeps a leading
/// slice of long lists at the two coarsest levels.
pub fn subsample(
  definitions: &[VoxelDefinition],
  detail: u8,
  budget: &SubsampleBudget,
) -> Vec<VoxelDefinition> {
  let mut kept: Vec<VoxelDefinition> = match budget.zoom_cap(detail) {
    Some(cap) => definitions.iter().filter(|d| d.z <= cap).copied().collect(),
    None => definitions.to_vec(),
  };
  let head = budget.head_len(detail, kept.len());
  if head < kept.len() {
    tracing::debug!(detail, from = kept.len(), to = head, "subsampling definitions");
    kept.truncate(head);
  }
  kept
}

#[cfg(test)]
#[path = "lod_test.rs"]
mod lod_test;
