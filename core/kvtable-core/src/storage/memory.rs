//! In-process backend — concurrent maps, no persistence.
//!
//! The default store for embedding and tests. Hashes and sets live in
//! `DashMap` shards; counters are plain atomics.

use crate::error::TableResult;
use crate::storage::KvStore;
use crate::storage::keys::glob_match;
use ahash::{AHashMap, AHashSet};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// In-memory [`KvStore`] built on dashmap.
pub struct MemoryStore {
    hashes: DashMap<String, AHashMap<String, String>>,
    sets: DashMap<String, AHashSet<String>>,
    counters: DashMap<String, AtomicU64>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            hashes: DashMap::new(),
            sets: DashMap::new(),
            counters: DashMap::new(),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KvStore for MemoryStore {
    fn hash_set(&self, key: &str, field: &str, value: &str) -> TableResult<()> {
        self.hashes
            .entry(key.to_string())
            .or_default()
            .insert(field.to_string(), value.to_string());
        Ok(())
    }

    fn hash_get(&self, key: &str, field: &str) -> TableResult<Option<String>> {
        Ok(self.hashes.get(key).and_then(|h| h.get(field).cloned()))
    }

    fn hash_get_all(&self, key: &str) -> TableResult<Vec<(String, String)>> {
        Ok(self
            .hashes
            .get(key)
            .map(|h| h.iter().map(|(f, v)| (f.clone(), v.clone())).collect())
            .unwrap_or_default())
    }

    fn set_add(&self, key: &str, member: &str) -> TableResult<bool> {
        Ok(self
            .sets
            .entry(key.to_string())
            .or_default()
            .insert(member.to_string()))
    }

    fn set_remove(&self, key: &str, member: &str) -> TableResult<bool> {
        let mut removed = false;
        let mut now_empty = false;
        if let Some(mut s) = self.sets.get_mut(key) {
            removed = s.remove(member);
            now_empty = s.is_empty();
        }
        // Empty sets vanish, like the backend this models.
        if removed && now_empty {
            self.sets.remove_if(key, |_, s| s.is_empty());
        }
        Ok(removed)
    }

    fn set_members(&self, key: &str) -> TableResult<Vec<String>> {
        Ok(self
            .sets
            .get(key)
            .map(|s| s.iter().cloned().collect())
            .unwrap_or_default())
    }

    fn set_contains(&self, key: &str, member: &str) -> TableResult<bool> {
        Ok(self.sets.get(key).map(|s| s.contains(member)).unwrap_or(false))
    }

    fn counter_incr(&self, key: &str) -> TableResult<u64> {
        let counter = self.counters.entry(key.to_string()).or_default();
        Ok(counter.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn scan_keys(&self, pattern: &str) -> TableResult<Vec<String>> {
        let mut keys: Vec<String> = self
            .hashes
            .iter()
            .map(|e| e.key().clone())
            .chain(self.sets.iter().map(|e| e.key().clone()))
            .chain(self.counters.iter().map(|e| e.key().clone()))
            .filter(|k| glob_match(pattern, k))
            .collect();
        keys.sort();
        keys.dedup();
        Ok(keys)
    }

    fn delete_key(&self, key: &str) -> TableResult<bool> {
        let h = self.hashes.remove(key).is_some();
        let s = self.sets.remove(key).is_some();
        let c = self.counters.remove(key).is_some();
        Ok(h || s || c)
    }

    fn key_exists(&self, key: &str) -> TableResult<bool> {
        Ok(self.hashes.contains_key(key)
            || self.sets.contains_key(key)
            || self.counters.contains_key(key))
    }
}
