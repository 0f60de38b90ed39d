//! Bounded insertion-ordered map with FIFO eviction.
//!
//! Backs both the range memo tables and the polygon cache. Reads do not
//! refresh an entry's position: the oldest *inserted* key is always the next
//! to go.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

/// Insertion-ordered map that evicts the oldest key once it grows past
/// `capacity`.
#[derive(Debug, Clone)]
pub struct FifoMap<K, V> {
  entries: HashMap<K, V>,
  order: VecDeque<K>,
  capacity: usize,
}

impl<K: Eq + Hash + Clone, V> FifoMap<K, V> {
  /// Create an empty map holding at most `capacity` entries.
  pub fn new(capacity: usize) -> Self {
    Self {
      entries: HashMap::with_capacity(capacity.min(4096)),
      order: VecDeque::with_capacity(capacity.min(4096)),
      capacity,
    }
  }

  #[inline]
  pub fn capacity(&self) -> usize {
    self.capacity
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  #[inline]
  pub fn get(&self, key: &K) -> Option<&V> {
    self.entries.get(key)
  }

  #[inline]
  pub fn contains_key(&self, key: &K) -> bool {
    self.entries.contains_key(key)
  }

  /// Insert a value, returning the entry evicted to stay within capacity.
  ///
  /// Re-inserting an existing key replaces its value in place and keeps its
  /// original position in the eviction order.
  pub fn insert(&mut self, key: K, value: V) -> Option<(K, V)> {
    if let Some(slot) = self.entries.get_mut(&key) {
      *slot = value;
      return None;
    }
    self.order.push_back(key.clone());
    self.entries.insert(key, value);

    if self.entries.len() > self.capacity {
      let oldest = self.order.pop_front()?;
      let value = self.entries.remove(&oldest)?;
      return Some((oldest, value));
    }
    None
  }

  /// Remove one key.
  pub fn remove(&mut self, key: &K) -> Option<V> {
    let value = self.entries.remove(key)?;
    self.order.retain(|k| k != key);
    Some(value)
  }

  /// Keep only the entries for which `keep` returns true.
  pub fn retain(&mut self, mut keep: impl FnMut(&K, &V) -> bool) {
    self.entries.retain(|k, v| keep(k, v));
    let entries = &self.entries;
    self.order.retain(|k| entries.contains_key(k));
  }

  pub fn clear(&mut self) {
    self.entries.clear();
    self.order.clear();
  }

  /// Keys from oldest to newest.
  pub fn keys(&self) -> impl Iterator<Item = &K> {
    self.order.iter()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_evicts_oldest_past_capacity() {
    let mut map = FifoMap::new(3);
    assert!(map.insert("a", 1).is_none());
    assert!(map.insert("b", 2).is_none());
    assert!(map.insert("c", 3).is_none());
    assert_eq!(map.len(), 3);

    // Fourth insert pushes out the first
    assert_eq!(map.insert("d", 4), Some(("a", 1)));
    assert_eq!(map.len(), 3);
    assert!(!map.contains_key(&"a"));
    assert_eq!(map.keys().copied().collect::<Vec<_>>(), ["b", "c", "d"]);
  }

  #[test]
  fn test_reads_do_not_refresh_order() {
    let mut map = FifoMap::new(2);
    map.insert(1, "one");
    map.insert(2, "two");
    assert_eq!(map.get(&1), Some(&"one"));

    // FIFO, not LRU: 1 is still evicted first
    assert_eq!(map.insert(3, "three"), Some((1, "one")));
  }

  #[test]
  fn test_reinsert_keeps_position() {
    let mut map = FifoMap::new(2);
    map.insert(1, 10);
    map.insert(2, 20);
    assert!(map.insert(1, 11).is_none());
    assert_eq!(map.get(&1), Some(&11));
    assert_eq!(map.insert(3, 30), Some((1, 11)));
  }

  #[test]
  fn test_remove_and_retain() {
    let mut map = FifoMap::new(8);
    for i in 0..6 {
      map.insert(i, i * 10);
    }
    assert_eq!(map.remove(&2), Some(20));
    map.retain(|k, _| k % 2 == 0);
    assert_eq!(map.keys().copied().collect::<Vec<_>>(), [0, 4]);
    map.clear();
    assert!(map.is_empty());
  }

  #[test]
  fn test_zero_capacity_keeps_nothing() {
    let mut map = FifoMap::new(0);
    assert_eq!(map.insert(1, 1), Some((1, 1)));
    assert!(map.is_empty());
  }
}
