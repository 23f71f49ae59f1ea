//! A small expire-after-write cache.
//!
//! Replaces what a caching library would provide for the ownership lookups,
//! without tying the core to one. Entries are considered live for a fixed
//! duration after they are written and are reloaded on the first access
//! after expiry.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

struct Entry<V> {
    written_at: Instant,
    value: V,
}

/// A map whose entries expire a fixed duration after being written.
pub struct TtlCache<K, V> {
    time_to_live: Duration,
    entries: HashMap<K, Entry<V>>,
}

impl<K: Eq + Hash + Clone, V: Clone> TtlCache<K, V> {
    /// Create a cache whose entries live for `time_to_live` after write.
    pub fn new(time_to_live: Duration) -> Self {
        Self {
            time_to_live,
            entries: HashMap::new(),
        }
    }

    /// Return the cached value for `key`, or compute and store one via
    /// `loader`. An expired entry is replaced by a fresh load.
    pub fn get_or_insert_with<F>(&mut self, key: &K, loader: F) -> V
    where
        F: FnOnce() -> V,
    {
        let now = Instant::now();
        if let Some(entry) = self.entries.get(key) {
            if now.duration_since(entry.written_at) < self.time_to_live {
                return entry.value.clone();
            }
        }
        let value = loader();
        self.entries.insert(
            key.clone(),
            Entry {
                written_at: now,
                value: value.clone(),
            },
        );
        value
    }

    /// Number of entries currently stored, expired or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
