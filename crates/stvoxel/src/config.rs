//! SessionConfig - tuning knobs for a render session.

use serde::{Deserialize, Serialize};

use crate::budget::{ExpandBudget, SubsampleBudget};
use crate::compile::CompileMode;
use crate::constants::{
  DEFAULT_CACHE_CAPACITY, DEFAULT_MARGIN_DEGREES, DEFAULT_MEMO_CAPACITY, DEFAULT_TIME_BUCKET,
};

/// Configuration for a [`RenderSession`](crate::session::RenderSession).
///
/// Every field has a default, so a partial document deserializes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
  /// Compact ranges or one tile per cell.
  pub mode: CompileMode,

  /// Half-size of the viewport culling window, in degrees.
  pub margin_degrees: f64,

  /// Polygon lists kept by the cache.
  pub cache_capacity: usize,

  /// Entries per range memo table.
  pub memo_capacity: usize,

  /// Width of a cache time bucket.
  pub time_bucket: f64,

  /// Map zoom below which nothing is rendered (`None` = always render).
  pub skip_below_zoom: Option<f64>,

  /// Per-definition cap for exhaustive expansion.
  pub expand: ExpandBudget,

  /// Level-of-detail thinning rules.
  pub subsample: SubsampleBudget,
}

impl Default for SessionConfig {
  fn default() -> Self {
    Self {
      mode: CompileMode::Compact,
      margin_degrees: DEFAULT_MARGIN_DEGREES,
      cache_capacity: DEFAULT_CACHE_CAPACITY,
      memo_capacity: DEFAULT_MEMO_CAPACITY,
      time_bucket: DEFAULT_TIME_BUCKET,
      skip_below_zoom: Some(3.0),
      expand: ExpandBudget::DEFAULT,
      subsample: SubsampleBudget::DEFAULT,
    }
  }
}

impl SessionConfig {
  /// Check whether a frame at `map_zoom` renders anything at all.
  #[inline]
  pub fn renders_at(&self, map_zoom: f64) -> bool {
    self.skip_below_zoom.map_or(true, |min| map_zoom >= min)
  }

  pub fn with_mode(mut self, mode: CompileMode) -> Self {
    self.mode = mode;
    self
  }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
