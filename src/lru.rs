//! O(1) LRU Cache on top of [`ListDictionary`]
//!
//! The head of the backing list is the least recently used entry, the tail
//! the most recently used. This provides constant-time operations for:
//! - get: O(1)
//! - add: O(1)
//! - evict: O(1)

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::linked_list::Position;
use crate::list_dict::ListDictionary;

const DEFAULT_MAX_LENGTH: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LruOptions {
    /// Ceiling on stored entries. Must be at least 1.
    pub max_length: usize,
}

impl Default for LruOptions {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

/// Bounded cache that evicts the least recently used entry when full.
pub struct LruCache<V> {
    entries: ListDictionary<V>,
    max_length: NonZeroUsize,
    stats: CacheStats,
}

impl<V> LruCache<V> {
    /// Fails with [`Error::InvalidCapacity`] when `max_length` is zero.
    pub fn new(max_length: usize) -> Result<Self> {
        let max_length =
            NonZeroUsize::new(max_length).ok_or(Error::InvalidCapacity(max_length))?;
        debug!(max_length = max_length.get(), "lru cache created");
        Ok(Self {
            entries: ListDictionary::with_capacity(max_length.get()),
            max_length,
            stats: CacheStats::default(),
        })
    }

    pub fn with_options(options: &LruOptions) -> Result<Self> {
        Self::new(options.max_length)
    }

    /// Insert `value` as the most recently used entry, evicting the least
    /// recently used one first if the cache is full.
    ///
    /// An existing key is left untouched: no overwrite, no promotion, no
    /// eviction, and the call returns `false`.
    pub fn add(&mut self, key: impl Into<String>, value: V) -> bool {
        let key = key.into();
        if self.entries.contains_key(&key) {
            return false;
        }
        if self.entries.len() >= self.max_length.get() {
            self.evict_one();
        }
        self.entries.add(key, value, Position::Last)
    }

    /// Look up `key` and promote it to most recently used.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        match self.entries.move_to_end(key) {
            Some(value) => {
                self.stats.hits += 1;
                Some(value)
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    /// Look up `key` without touching recency or stats.
    pub fn peek(&self, key: &str) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<V> {
        self.entries.remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        debug!(len = self.entries.len(), "lru cache cleared");
        self.entries.clear();
    }

    pub fn max_length(&self) -> usize {
        self.max_length.get()
    }

    /// Change the capacity, evicting from the least recently used end until
    /// the cache fits. Returns the number of evicted entries.
    pub fn set_max_length(&mut self, max_length: usize) -> Result<usize> {
        self.max_length =
            NonZeroUsize::new(max_length).ok_or(Error::InvalidCapacity(max_length))?;
        let mut evicted = 0;
        while self.entries.len() > max_length {
            self.evict_one();
            evicted += 1;
        }
        debug!(max_length, evicted, "lru cache resized");
        Ok(evicted)
    }

    /// Entries from least to most recently used.
    pub fn iter(
        &self,
    ) -> impl DoubleEndedIterator<Item = (&str, &V)> + ExactSizeIterator + '_ {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &str> + ExactSizeIterator + '_ {
        self.entries.keys()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = CacheStats::default();
    }

    fn evict_one(&mut self) {
        if let Some((key, _)) = self.entries.remove_first_entry() {
            self.stats.evictions += 1;
            trace!(%key, len = self.entries.len(), "evicted least recently used entry");
        }
    }
}
