//! Engine-agnostic metrics for render sessions.
//!
//! Feature-gated and runtime-toggled: with the `metrics` feature off every
//! `record_*` call is a no-op.
//!
//! # Usage
//!
//! ```ignore
//! use stvoxel::metrics::COLLECT_METRICS;
//!
//! // Compile with --features metrics
//! // Runtime toggle:
//! COLLECT_METRICS.store(false, Ordering::Relaxed);
//!
//! // Read after a frame:
//! let avg = session.metrics().avg_build_timing_us();
//! ```

use std::collections::VecDeque;
use std::sync::atomic::AtomicBool;
#[cfg(feature = "metrics")]
use std::sync::atomic::Ordering;

use crate::viewport::MAX_DETAIL_LEVEL;

/// Runtime toggle for metrics collection.
pub static COLLECT_METRICS: AtomicBool = AtomicBool::new(true);

/// Check if metrics collection is enabled (both compile-time and runtime).
#[inline]
pub fn is_enabled() -> bool {
  #[cfg(feature = "metrics")]
  {
    COLLECT_METRICS.load(Ordering::Relaxed)
  }
  #[cfg(not(feature = "metrics"))]
  {
    false
  }
}

/// Rolling window of recent values (e.g. timing history).
#[derive(Debug, Clone)]
pub struct RollingWindow<T> {
  buffer: VecDeque<T>,
  capacity: usize,
}

impl<T> RollingWindow<T> {
  /// Create a window holding at most `capacity` values; 0 keeps nothing.
  pub fn new(capacity: usize) -> Self {
    Self {
      buffer: VecDeque::with_capacity(capacity),
      capacity,
    }
  }

  /// Push a new value, evicting the oldest if at capacity.
  pub fn push(&mut self, value: T) {
    if self.capacity == 0 {
      return;
    }
    if self.buffer.len() >= self.capacity {
      self.buffer.pop_front();
    }
    self.buffer.push_back(value);
  }

  pub fn len(&self) -> usize {
    self.buffer.len()
  }

  pub fn is_empty(&self) -> bool {
    self.buffer.is_empty()
  }

  pub fn clear(&mut self) {
    self.buffer.clear();
  }
}

impl<T: Copy + Default + std::ops::Add<Output = T>> RollingWindow<T> {
  /// Sum of all values in the window.
  pub fn sum(&self) -> T {
    self.buffer.iter().copied().fold(T::default(), |acc, x| acc + x)
  }
}

impl RollingWindow<u64> {
  /// Mean of the window, 0 when empty.
  pub fn average(&self) -> f64 {
    if self.buffer.is_empty() {
      0.0
    } else {
      self.sum() as f64 / self.buffer.len() as f64
    }
  }

  /// Smallest and largest value, `None` when empty.
  pub fn min_max(&self) -> Option<(u64, u64)> {
    let min = *self.buffer.iter().min()?;
    let max = *self.buffer.iter().max()?;
    Some((min, max))
  }
}

impl Default for RollingWindow<u64> {
  fn default() -> Self {
    Self::new(128) // ~2 seconds of frames at 60fps
  }
}

const DETAIL_SLOTS: usize = MAX_DETAIL_LEVEL as usize + 1;

/// Statistics collected by a render session.
#[derive(Debug, Clone)]
pub struct SessionMetrics {
  // Output
  /// Polygons built per detail level (index = detail).
  pub polygons_per_detail: [u64; DETAIL_SLOTS],
  /// Tiles produced by the compiler.
  pub tiles_compiled: u64,
  /// Polygons kept after the time filter.
  pub polygons_built: u64,
  /// Items rendered (hits and misses).
  pub items_rendered: u64,

  // Cache
  pub cache_hits: u64,
  pub cache_misses: u64,
  pub cache_evictions: u64,

  // Timing
  /// Rolling window of cache-miss build times in microseconds.
  pub build_timings: RollingWindow<u64>,
  /// Rolling window of whole-frame render times in microseconds.
  pub frame_timings: RollingWindow<u64>,
  pub last_build_us: u64,
  pub last_frame_us: u64,
}

impl Default for SessionMetrics {
  fn default() -> Self {
    Self {
      polygons_per_detail: [0; DETAIL_SLOTS],
      tiles_compiled: 0,
      polygons_built: 0,
      items_rendered: 0,
      cache_hits: 0,
      cache_misses: 0,
      cache_evictions: 0,
      build_timings: RollingWindow::new(128),
      frame_timings: RollingWindow::new(128),
      last_build_us: 0,
      last_frame_us: 0,
    }
  }
}

impl SessionMetrics {
  pub fn new() -> Self {
    Self::default()
  }

  /// Reset everything except the cumulative counters.
  pub fn reset(&mut self) {
    self.polygons_per_detail.fill(0);
    self.cache_hits = 0;
    self.cache_misses = 0;
    self.cache_evictions = 0;
    self.build_timings.clear();
    self.frame_timings.clear();
    self.last_build_us = 0;
    self.last_frame_us = 0;
    // tiles_compiled, polygons_built and items_rendered are cumulative
  }

  /// Record one cache-miss build.
  pub fn record_build(&mut self, detail: u8, tiles: usize, polygons: usize, timing_us: u64) {
    if !is_enabled() {
      return;
    }
    let slot = (detail as usize).min(DETAIL_SLOTS - 1);
    self.polygons_per_detail[slot] += polygons as u64;
    self.tiles_compiled += tiles as u64;
    self.polygons_built += polygons as u64;
    self.build_timings.push(timing_us);
    self.last_build_us = timing_us;
  }

  pub fn record_frame_timing(&mut self, timing_us: u64) {
    if is_enabled() {
      self.frame_timings.push(timing_us);
      self.last_frame_us = timing_us;
    }
  }

  /// Record a cache lookup and any evictions it caused.
  pub fn record_lookup(&mut self, hit: bool, evicted: usize) {
    if !is_enabled() {
      return;
    }
    self.items_rendered += 1;
    if hit {
      self.cache_hits += 1;
    } else {
      self.cache_misses += 1;
    }
    self.cache_evictions += evicted as u64;
  }

  /// Cache hit ratio in `[0, 1]`; 0 before any lookup.
  pub fn hit_ratio(&self) -> f64 {
    let total = self.cache_hits + self.cache_misses;
    if total == 0 {
      0.0
    } else {
      self.cache_hits as f64 / total as f64
    }
  }

  pub fn avg_build_timing_us(&self) -> f64 {
    self.build_timings.average()
  }

  pub fn avg_frame_timing_us(&self) -> f64 {
    self.frame_timings.average()
  }

  /// Fastest and slowest recent cache-miss build, in microseconds.
  pub fn build_timing_range_us(&self) -> Option<(u64, u64)> {
    self.build_timings.min_max()
  }

  /// Fastest and slowest recent frame, in microseconds.
  pub fn frame_timing_range_us(&self) -> Option<(u64, u64)> {
    self.frame_timings.min_max()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_rolling_window() {
    let mut window = RollingWindow::new(3);
    assert!(window.is_empty());

    window.push(10u64);
    window.push(20);
    window.push(30);
    assert_eq!(window.len(), 3);
    assert_eq!(window.sum(), 60);
    assert_eq!(window.average(), 20.0);

    // Push one more, oldest should be evicted
    window.push(40);
    assert_eq!(window.len(), 3);
    assert_eq!(window.sum(), 90);
    assert_eq!(window.min_max(), Some((20, 40)));
  }

  #[test]
  fn test_empty_window() {
    let window = RollingWindow::<u64>::default();
    assert_eq!(window.average(), 0.0);
    assert_eq!(window.min_max(), None);
  }

  #[test]
  fn test_zero_capacity_window_stays_empty() {
    let mut window = RollingWindow::new(0);
    window.push(1u64);
    assert!(window.is_empty());
  }

  #[cfg(not(feature = "metrics"))]
  #[test]
  fn test_recording_is_noop_without_feature() {
    let mut metrics = SessionMetrics::new();
    metrics.record_build(2, 10, 10, 500);
    metrics.record_lookup(true, 0);
    assert_eq!(metrics.tiles_compiled, 0);
    assert_eq!(metrics.cache_hits, 0);
    assert_eq!(metrics.build_timing_range_us(), None);
  }

  #[cfg(feature = "metrics")]
  #[test]
  fn test_session_metrics() {
    let mut metrics = SessionMetrics::new();

    metrics.record_lookup(false, 0);
    metrics.record_build(2, 12, 10, 1000);
    metrics.record_lookup(true, 0);
    metrics.record_lookup(false, 1);
    metrics.record_build(9, 4, 4, 3000);

    assert_eq!(metrics.items_rendered, 3);
    assert_eq!(metrics.cache_hits, 1);
    assert_eq!(metrics.cache_misses, 2);
    assert_eq!(metrics.cache_evictions, 1);
    assert_eq!(metrics.polygons_per_detail, [0, 0, 10, 4]);
    assert_eq!(metrics.tiles_compiled, 16);
    assert_eq!(metrics.avg_build_timing_us(), 2000.0);
    assert_eq!(metrics.build_timing_range_us(), Some((1000, 3000)));
    assert_eq!(metrics.frame_timing_range_us(), None);
    assert_eq!(metrics.last_build_us, 3000);
    assert!((metrics.hit_ratio() - 1.0 / 3.0).abs() < 1e-12);

    metrics.reset();
    assert_eq!(metrics.cache_hits, 0);
    assert_eq!(metrics.tiles_compiled, 16);
  }
}
