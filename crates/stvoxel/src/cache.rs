//! Polygon cache keyed by item, detail level and time bucket.
//!
//! Holds at most `capacity` polygon lists and evicts the oldest insert once
//! full. Lookups hand out the stored `Arc`, so two hits on the same key are
//! pointer-equal.

use std::sync::Arc;

use crate::constants::DEFAULT_CACHE_CAPACITY;
use crate::fifo::FifoMap;
use crate::session::ItemId;
use crate::types::Polygon;

/// Identity of one cached polygon list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
  pub item: ItemId,
  pub detail: u8,
  /// `floor(current_time / bucket_width)`.
  pub time_bucket: i64,
}

impl CacheKey {
  pub fn new(item: ItemId, detail: u8, current_time: f64, bucket_width: f64) -> Self {
    Self {
      item,
      detail,
      time_bucket: time_bucket(current_time, bucket_width),
    }
  }
}

/// Bucket index of `current_time`; non-finite times fall in bucket 0.
#[inline]
pub fn time_bucket(current_time: f64, bucket_width: f64) -> i64 {
  let bucket = (current_time / bucket_width).floor();
  if bucket.is_finite() {
    bucket as i64
  } else {
    0
  }
}

/// Lookup counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
  pub hits: u64,
  pub misses: u64,
  pub evictions: u64,
}

#[derive(Debug, Clone)]
pub struct PolygonCache {
  entries: FifoMap<CacheKey, Arc<[Polygon]>>,
  stats: CacheStats,
}

impl Default for PolygonCache {
  fn default() -> Self {
    Self::new(DEFAULT_CACHE_CAPACITY)
  }
}

impl PolygonCache {
  pub fn new(capacity: usize) -> Self {
    Self {
      entries: FifoMap::new(capacity),
      stats: CacheStats::default(),
    }
  }

  pub fn capacity(&self) -> usize {
    self.entries.capacity()
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn stats(&self) -> CacheStats {
    self.stats
  }

  /// Look up a key, counting the hit or miss.
  pub fn get(&mut self, key: &CacheKey) -> Option<Arc<[Polygon]>> {
    match self.entries.get(key) {
      Some(polygons) => {
        self.stats.hits += 1;
        Some(Arc::clone(polygons))
      }
      None => {
        self.stats.misses += 1;
        None
      }
    }
  }

  /// Check for a key without touching the counters.
  pub fn contains(&self, key: &CacheKey) -> bool {
    self.entries.contains_key(key)
  }

  /// Store a polygon list, returning the key evicted to make room.
  pub fn insert(&mut self, key: CacheKey, polygons: Arc<[Polygon]>) -> Option<CacheKey> {
    let (evicted, _) = self.entries.insert(key, polygons)?;
    self.stats.evictions += 1;
    tracing::debug!(?evicted, "polygon cache eviction");
    Some(evicted)
  }

  /// Return the cached list for `key`, building and storing it on a miss.
  ///
  /// A failed build stores nothing.
  pub fn get_or_try_insert_with<E>(
    &mut self,
    key: CacheKey,
    build: impl FnOnce() -> Result<Vec<Polygon>, E>,
  ) -> Result<Arc<[Polygon]>, E> {
    if let Some(polygons) = self.get(&key) {
      return Ok(polygons);
    }
    tracing::debug!(?key, "polygon cache miss");
    let polygons: Arc<[Polygon]> = build()?.into();
    self.insert(key, Arc::clone(&polygons));
    Ok(polygons)
  }

  /// Drop every entry belonging to `item`; returns how many were removed.
  pub fn invalidate(&mut self, item: ItemId) -> usize {
    let before = self.entries.len();
    self.entries.retain(|key, _| key.item != item);
    before - self.entries.len()
  }

  pub fn clear(&mut self) {
    self.entries.clear();
  }
}

#[cfg(test)]
#[path = "cache_test.rs"]
mod cache_test;
