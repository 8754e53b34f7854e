//! Cache Statistics Module
//!
//! Tracks hits, misses, evictions and expirations per shard. The engine sums
//! the shard snapshots into one [`CacheStats`].

use serde::Serialize;

// == Cache Stats ==
/// Cache performance counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Number of gets that returned a value
    pub hits: u64,
    /// Number of gets that found nothing (absent or expired)
    pub misses: u64,
    /// Number of entries removed to satisfy the capacity bound
    pub evictions: u64,
    /// Number of expired entries removed lazily or by the sweeper
    pub expirations: u64,
    /// Entries currently held, including not-yet-swept expired ones
    pub total_entries: usize,
    /// Bytes currently charged against capacity
    pub size_bytes: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no gets have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_expirations(&mut self, count: usize) {
        self.expirations += count as u64;
    }

    // == Merge ==
    /// Adds another snapshot's counters into this one.
    pub fn merge(&mut self, other: &CacheStats) {
        self.hits += other.hits;
        self.misses += other.misses;
        self.evictions += other.evictions;
        self.expirations += other.expirations;
        self.total_entries += other.total_entries;
        self.size_bytes += other.size_bytes;
    }
}
