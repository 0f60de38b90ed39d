//! Work limits for expansion and level-of-detail subsampling.
//!
//! Keeps a single oversized definition or an oversized item from turning one
//! frame into an unbounded amount of work.

use serde::{Deserialize, Serialize};

/// Cap on the number of unit cells one definition may expand into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpandBudget {
  /// Maximum cells per definition (0 = unlimited).
  pub max_cells: u64,
}

impl ExpandBudget {
  /// Default budget: one million cells per definition.
  pub const DEFAULT: Self = Self {
    max_cells: 1_000_000,
  };

  /// Unlimited budget for testing or offline export.
  pub const UNLIMITED: Self = Self { max_cells: 0 };

  /// Check if a definition with `cells` cells may be expanded.
  #[inline]
  pub fn allows(&self, cells: u128) -> bool {
    self.max_cells == 0 || cells <= self.max_cells as u128
  }
}

impl Default for ExpandBudget {
  fn default() -> Self {
    Self::DEFAULT
  }
}

/// How aggressively to thin a definition list at low detail levels.
///
/// Below the finest detail level, definitions finer than
/// `base_zoom + zoom_step * detail` are dropped; at detail 0 and 1 long lists
/// keep only a head fraction. This is a heuristic, not a fair sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubsampleBudget {
  /// Zoom cap at detail level 0.
  pub base_zoom: u8,
  /// Zoom cap increase per detail level.
  pub zoom_step: u8,
  /// Detail 0: lists longer than this are thinned...
  pub coarse_threshold: usize,
  /// ...to `max(coarse_floor, len / coarse_divisor)` entries.
  pub coarse_floor: usize,
  pub coarse_divisor: usize,
  /// Detail 1: lists longer than this are thinned...
  pub medium_threshold: usize,
  /// ...to `max(medium_floor, len / medium_divisor)` entries.
  pub medium_floor: usize,
  pub medium_divisor: usize,
}

impl SubsampleBudget {
  pub const DEFAULT: Self = Self {
    base_zoom: 8,
    zoom_step: 3,
    coarse_threshold: 100,
    coarse_floor: 25,
    coarse_divisor: 4,
    medium_threshold: 200,
    medium_floor: 100,
    medium_divisor: 2,
  };

  /// Finest definition zoom kept at `detail` (`None` = no cap).
  #[inline]
  pub fn zoom_cap(&self, detail: u8) -> Option<u8> {
    if detail >= 3 {
      return None;
    }
    Some(self.base_zoom.saturating_add(self.zoom_step.saturating_mul(detail)))
  }

  /// Number of leading definitions kept out of `len` at `detail`.
  pub fn head_len(&self, detail: u8, len: usize) -> usize {
    let thin = |threshold: usize, floor: usize, divisor: usize| {
      if len > threshold {
        floor.max(len / divisor.max(1)).min(len)
      } else {
        len
      }
    };
    match detail {
      0 => thin(self.coarse_threshold, self.coarse_floor, self.coarse_divisor),
      1 => thin(self.medium_threshold, self.medium_floor, self.medium_divisor),
      _ => len,
    }
  }
}

impl Default for SubsampleBudget {
  fn default() -> Self {
    Self::DEFAULT
  }
}
