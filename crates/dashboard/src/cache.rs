//! Session-scoped memoization of aggregated tables.
//!
//! Entries are keyed by everything an aggregation depends on. The dataset
//! itself is not part of the key: it is immutable, so the whole cache is
//! cleared instead when a session reloads it. Past a fixed number of
//! entries the oldest one is evicted.

use pipeline::{AggregateOptions, AggregatedTable, GroupBy, Metric};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

/// Default number of tables kept per session
pub const DEFAULT_MAX_ENTRIES: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub filters: u64,
    pub selection: u64,
    pub group_by: GroupBy,
    pub metrics: Vec<Metric>,
    pub options: AggregateOptions,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

#[derive(Debug)]
pub struct AggregationCache {
    entries: HashMap<CacheKey, Arc<AggregatedTable>>,
    /// Keys in insertion order, oldest first
    order: VecDeque<CacheKey>,
    max_entries: usize,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl Default for AggregationCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_MAX_ENTRIES)
    }
}

impl AggregationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cache holding at most `max_entries` tables (at least one)
    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            max_entries: max_entries.max(1),
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    pub fn get(&mut self, key: &CacheKey) -> Option<Arc<AggregatedTable>> {
        match self.entries.get(key) {
            Some(table) => {
                self.hits += 1;
                Some(Arc::clone(table))
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    pub fn insert(&mut self, key: CacheKey, table: AggregatedTable) -> Arc<AggregatedTable> {
        let table = Arc::new(table);
        if self.entries.insert(key.clone(), Arc::clone(&table)).is_none() {
            self.order.push_back(key);
        }
        while self.entries.len() > self.max_entries {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
            self.evictions += 1;
        }
        table
    }

    /// Cached table for `key`, computing and storing it on a miss
    pub fn get_or_insert_with<F>(&mut self, key: CacheKey, compute: F) -> Arc<AggregatedTable>
    where
        F: FnOnce() -> AggregatedTable,
    {
        if let Some(cached) = self.get(&key) {
            return cached;
        }
        self.insert(key, compute())
    }

    /// Drop every entry; counters are kept
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(filters: u64) -> CacheKey {
        CacheKey {
            filters,
            selection: 0,
            group_by: GroupBy::PriceBin,
            metrics: vec![Metric::GamesReleased],
            options: AggregateOptions::new(),
        }
    }

    fn table() -> AggregatedTable {
        AggregatedTable {
            group_by: GroupBy::PriceBin,
            metrics: vec![Metric::GamesReleased],
            rows: Vec::new(),
            total_size: 0,
        }
    }

    #[test]
    fn test_hit_after_miss() {
        let mut cache = AggregationCache::new();
        let mut computed = 0;

        for _ in 0..3 {
            cache.get_or_insert_with(key(1), || {
                computed += 1;
                table()
            });
        }

        assert_eq!(computed, 1);
        assert_eq!(
            cache.stats(),
            CacheStats {
                entries: 1,
                hits: 2,
                misses: 1,
                evictions: 0
            }
        );
    }

    #[test]
    fn test_distinct_keys_and_clear() {
        let mut cache = AggregationCache::new();
        cache.get_or_insert_with(key(1), table);
        cache.get_or_insert_with(key(2), table);
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.get(&key(1)).is_none());
    }

    #[test]
    fn test_oldest_entry_is_evicted() {
        let mut cache = AggregationCache::with_capacity(2);
        cache.get_or_insert_with(key(1), table);
        cache.get_or_insert_with(key(2), table);
        cache.get_or_insert_with(key(3), table);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.stats().evictions, 1);
        assert!(cache.get(&key(1)).is_none());
        assert!(cache.get(&key(3)).is_some());
    }
}
