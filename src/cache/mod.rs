//! In-process TTL cache for Pokemon records.
//!
//! Name-keyed map with per-entry expiry measured from the last `set`.
//! Expiry is lazy: expired entries behave as absent on `get`/`has` and are
//! dropped when touched, no background sweep. There is no capacity-based
//! eviction.
//!
//! All operations are safe under concurrent access; reads happen both inside
//! and outside the coordinator's flight gates.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde::Serialize;

use crate::domain::Record;
use crate::metrics;

/// Default entry lifetime, matching the original service.
pub const DEFAULT_TTL: Duration = Duration::from_secs(600);

#[derive(Debug, Clone)]
struct Entry {
    record: Record,
    expires_at: Instant,
}

impl Entry {
    fn is_expired(&self) -> bool {
        Instant::now() > self.expires_at
    }
}

/// Thread-safe TTL cache keyed by lowercase Pokemon name.
pub struct TtlCache {
    entries: DashMap<String, Entry>,
    ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl TtlCache {
    /// Create a cache with the default 600s TTL.
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    /// Create a cache with a custom TTL.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Get an unexpired record, removing the entry if its TTL has lapsed.
    pub fn get(&self, name: &str) -> Option<Record> {
        if let Some(entry) = self.entries.get(name) {
            if !entry.is_expired() {
                self.hits.fetch_add(1, Ordering::Relaxed);
                metrics::CACHE_HITS.inc();
                return Some(entry.record.clone());
            }
        }
        // Drop the expired entry outside the read guard
        self.entries.remove_if(name, |_, entry| entry.is_expired());
        self.misses.fetch_add(1, Ordering::Relaxed);
        metrics::CACHE_MISSES.inc();
        None
    }

    /// Insert or replace an entry; the TTL restarts from now.
    pub fn set(&self, name: impl Into<String>, record: Record) {
        self.entries.insert(
            name.into(),
            Entry {
                record,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }

    /// Remove an entry, returning whether one was present (expired or not).
    pub fn delete(&self, name: &str) -> bool {
        self.entries.remove(name).is_some()
    }

    /// Whether an unexpired entry exists. Does not count as a hit or miss.
    pub fn has(&self, name: &str) -> bool {
        self.entries
            .get(name)
            .map(|entry| !entry.is_expired())
            .unwrap_or(false)
    }

    /// Number of entries currently held, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of the cache counters.
    pub fn stats(&self) -> CacheStats {
        let total = self.entries.len();
        let expired = self
            .entries
            .iter()
            .filter(|entry| entry.is_expired())
            .count();

        CacheStats {
            entries: total,
            expired_entries: expired,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl Default for TtlCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub expired_entries: usize,
    pub hits: u64,
    pub misses: u64,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, name: &str) -> Record {
        Record {
            id,
            name: name.to_string(),
            moves: vec!["tackle".to_string()],
            types: vec!["normal".to_string()],
        }
    }

    #[test]
    fn test_set_get() {
        let cache = TtlCache::new();
        cache.set("pikachu", record(25, "pikachu"));

        let hit = cache.get("pikachu");
        assert_eq!(hit.unwrap().id, 25);
    }

    #[test]
    fn test_get_missing() {
        let cache = TtlCache::new();
        assert!(cache.get("mewtwo").is_none());
    }

    #[test]
    fn test_has() {
        let cache = TtlCache::new();
        assert!(!cache.has("eevee"));

        cache.set("eevee", record(133, "eevee"));
        assert!(cache.has("eevee"));
    }

    #[test]
    fn test_delete() {
        let cache = TtlCache::new();
        cache.set("ditto", record(132, "ditto"));

        assert!(cache.delete("ditto"));
        assert!(!cache.has("ditto"));
        assert!(!cache.delete("ditto"));
    }

    #[test]
    fn test_replace_restarts_ttl() {
        let cache = TtlCache::with_ttl(Duration::from_millis(40));
        cache.set("snorlax", record(143, "snorlax"));

        std::thread::sleep(Duration::from_millis(25));
        cache.set("snorlax", record(143, "snorlax"));
        std::thread::sleep(Duration::from_millis(25));

        // 50ms since the first set, 25ms since the last: still live
        assert!(cache.has("snorlax"));
    }

    #[test]
    fn test_expired_entry_behaves_as_absent() {
        let cache = TtlCache::with_ttl(Duration::from_millis(10));
        cache.set("pikachu", record(25, "pikachu"));

        std::thread::sleep(Duration::from_millis(25));

        assert!(!cache.has("pikachu"));
        assert!(cache.get("pikachu").is_none());
        // The lazy reaper dropped it on the get
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_stats_track_hits_and_misses() {
        let cache = TtlCache::new();
        cache.set("pikachu", record(25, "pikachu"));

        cache.get("pikachu");
        cache.get("pikachu");
        cache.get("raichu");

        let stats = cache.stats();
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_concurrent_access() {
        use std::sync::Arc;
        use std::thread;

        let cache = Arc::new(TtlCache::new());

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for i in 0..500 {
                        let name = format!("mon-{}-{}", t, i);
                        cache.set(name.clone(), record(i, &name));
                        assert!(cache.get(&name).is_some());
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cache.len(), 4000);
    }
}
