//! Range utilities: splitting and enumerating index ranges.
//!
//! The same ranges recur on every frame and every time tick, so [`RangeMemo`]
//! keeps the results in bounded FIFO tables keyed by `(range, zoom)`.
//!
//! ```text
//! X = 14:1 at Z = 4 (16 tiles)
//!
//!   0  1  2  ...  13 14 15
//!  [■  ■]             [■  ■]     segments: [14, 15] + [0, 1]
//!                                values:   14, 15, 0, 1
//! ```

use std::sync::Arc;

use smallvec::{smallvec, SmallVec};

use crate::constants::{max_index, DEFAULT_MEMO_CAPACITY};
use crate::fifo::FifoMap;
use crate::types::DimensionValue;

/// Non-wrapping `[lo, hi]` pieces of an X range (at most two).
pub type Segments = SmallVec<[(i64, i64); 2]>;

/// Memo key: the range as written, its zoom, and whether X wrap rules apply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RangeKey {
  pub lo: i64,
  pub hi: i64,
  pub zoom: u8,
  pub wrapping: bool,
}

/// Split an X value into non-wrapping segments.
///
/// `lo > hi` becomes `[lo, 2^Z - 1]` and `[0, hi]`. Returns `None` when `2^Z`
/// does not fit in `i64`.
pub fn split_x(x: DimensionValue, zoom: u8) -> Option<Segments> {
  let segments = match x {
    DimensionValue::Scalar(v) => smallvec![(v, v)],
    DimensionValue::Range(lo, hi) if lo <= hi => smallvec![(lo, hi)],
    DimensionValue::Range(lo, hi) => smallvec![(lo, max_index(zoom)?), (0, hi)],
  };
  Some(segments)
}

/// Every index in `value`, ascending. Range bounds are sorted first.
pub fn enumerate(value: DimensionValue) -> Vec<i64> {
  let (lo, hi) = value.normalized();
  (lo..=hi).collect()
}

/// Every index in an X value, walking through the antimeridian when
/// `lo > hi`.
pub fn enumerate_x(x: DimensionValue, zoom: u8) -> Option<Vec<i64>> {
  let segments = split_x(x, zoom)?;
  Some(
    segments
      .into_iter()
      .flat_map(|(lo, hi)| lo..=hi)
      .collect(),
  )
}

/// Memoized range splitting and enumeration.
///
/// Each table holds at most `capacity` entries and drops the oldest insert
/// when full.
#[derive(Debug, Clone)]
pub struct RangeMemo {
  segments: FifoMap<RangeKey, Segments>,
  values: FifoMap<RangeKey, Arc<[i64]>>,
  hits: u64,
  misses: u64,
}

impl Default for RangeMemo {
  fn default() -> Self {
    Self::new(DEFAULT_MEMO_CAPACITY)
  }
}

impl RangeMemo {
  pub fn new(capacity: usize) -> Self {
    Self {
      segments: FifoMap::new(capacity),
      values: FifoMap::new(capacity),
      hits: 0,
      misses: 0,
    }
  }

  /// Memoized [`split_x`].
  pub fn x_segments(&mut self, x: DimensionValue, zoom: u8) -> Option<Segments> {
    let (lo, hi) = x.bounds();
    let key = RangeKey {
      lo,
      hi,
      zoom,
      wrapping: true,
    };
    if let Some(segments) = self.segments.get(&key) {
      self.hits += 1;
      return Some(segments.clone());
    }
    self.misses += 1;
    let segments = split_x(x, zoom)?;
    self.segments.insert(key, segments.clone());
    Some(segments)
  }

  /// Memoized [`enumerate`] for Y and F values.
  pub fn expand(&mut self, value: DimensionValue, zoom: u8) -> Arc<[i64]> {
    let (lo, hi) = value.normalized();
    let key = RangeKey {
      lo,
      hi,
      zoom,
      wrapping: false,
    };
    if let Some(values) = self.values.get(&key) {
      self.hits += 1;
      return Arc::clone(values);
    }
    self.misses += 1;
    let values: Arc<[i64]> = enumerate(value).into();
    self.values.insert(key, Arc::clone(&values));
    values
  }

  /// Memoized [`enumerate_x`].
  pub fn expand_x(&mut self, x: DimensionValue, zoom: u8) -> Option<Arc<[i64]>> {
    let (lo, hi) = x.bounds();
    let key = RangeKey {
      lo,
      hi,
      zoom,
      wrapping: true,
    };
    if let Some(values) = self.values.get(&key) {
      self.hits += 1;
      return Some(Arc::clone(values));
    }
    self.misses += 1;
    let values: Arc<[i64]> = enumerate_x(x, zoom)?.into();
    self.values.insert(key, Arc::clone(&values));
    Some(values)
  }

  /// Entries currently held across both tables.
  pub fn len(&self) -> usize {
    self.segments.len() + self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn hits(&self) -> u64 {
    self.hits
  }

  pub fn misses(&self) -> u64 {
    self.misses
  }

  pub fn clear(&mut self) {
    self.segments.clear();
    self.values.clear();
  }
}

#[cfg(test)]
#[path = "range_test.rs"]
mod range_test;
