//! Bounded name caches keyed by metadata path

use std::collections::VecDeque;

use ahash::AHashMap;

use crate::core::types::MetadataPath;

pub const DEFAULT_NAME_CACHE_CAPACITY: usize = 1000;

/// Fixed-capacity map that evicts the oldest inserted key when full.
///
/// Lookups do not refresh an entry's position; this is insertion-order
/// eviction, not LRU.
#[derive(Debug, Clone)]
pub struct BoundedCache<V> {
    capacity: usize,
    entries: AHashMap<MetadataPath, V>,
    insertion_order: VecDeque<MetadataPath>,
}

impl<V> Default for BoundedCache<V> {
    fn default() -> Self {
        Self::new(DEFAULT_NAME_CACHE_CAPACITY)
    }
}

impl<V> BoundedCache<V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: AHashMap::new(),
            insertion_order: VecDeque::new(),
        }
    }

    pub fn get(&self, key: &MetadataPath) -> Option<&V> {
        self.entries.get(key)
    }

    /// Insert or overwrite. A new key at capacity evicts exactly one entry first.
    /// Returns the evicted key, if any.
    pub fn insert(&mut self, key: MetadataPath, value: V) -> Option<MetadataPath> {
        if let Some(slot) = self.entries.get_mut(&key) {
            *slot = value;
            return None;
        }
        let evicted = if self.entries.len() >= self.capacity {
            self.evict_one()
        } else {
            None
        };
        self.insertion_order.push_back(key.clone());
        self.entries.insert(key, value);
        evicted
    }

    fn evict_one(&mut self) -> Option<MetadataPath> {
        let oldest = self.insertion_order.pop_front()?;
        self.entries.remove(&oldest);
        Some(oldest)
    }

    /// Change the bound, evicting oldest entries until the cache fits
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        while self.entries.len() > self.capacity {
            if self.evict_one().is_none() {
                break;
            }
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.insertion_order.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<V: Clone> BoundedCache<V> {
    /// Cached value, or compute and insert it
    pub fn get_or_insert_with(&mut self, key: &MetadataPath, compute: impl FnOnce() -> V) -> V {
        if let Some(value) = self.entries.get(key) {
            return value.clone();
        }
        let value = compute();
        self.insert(key.clone(), value.clone());
        value
    }
}
