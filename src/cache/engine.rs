//! Cache Engine Module
//!
//! The sole entry point of the core. Validates arguments, routes each key to
//! its shard by a stable hash, and aggregates per-shard counts.

use std::collections::hash_map::DefaultHasher;
use std::hash::{BuildHasher, BuildHasherDefault};
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use parking_lot::Mutex;
use tracing::info;

use crate::cache::{CacheStats, Shard};
use crate::config::EngineConfig;
use crate::error::{CacheError, Result};
use crate::tasks::Sweeper;

// == Cache Engine ==
/// Sharded, thread-safe cache of byte values with TTL and bounded capacity.
///
/// Each shard sits behind its own mutex and no operation ever holds two of
/// them, so callers working on keys in different shards never wait on each
/// other. Share it across tasks as `Arc<CacheEngine>`.
#[derive(Debug)]
pub struct CacheEngine {
    shards: Box<[Mutex<Shard>]>,
    /// `shards.len() - 1`; the shard count is a power of two
    mask: usize,
    hasher: BuildHasherDefault<DefaultHasher>,
    /// Effective per-value limit, never above a single shard's capacity
    max_entry_bytes: usize,
    capacity_bytes: usize,
}

impl CacheEngine {
    // == Constructor ==
    /// Creates an engine with the shard layout described by `config`.
    ///
    /// The shard count is rounded up to a power of two and the total capacity
    /// is split evenly between shards. The per-entry limit is capped at one
    /// shard's capacity so a stored value always fits its shard.
    pub fn new(config: &EngineConfig) -> Self {
        let shard_count = config.shard_count.max(1).next_power_of_two();
        let shard_capacity = config.capacity_bytes / shard_count;

        let shards: Box<[Mutex<Shard>]> = (0..shard_count)
            .map(|_| Mutex::new(Shard::new(shard_capacity, config.eviction.build())))
            .collect();

        info!(
            shard_count,
            shard_capacity,
            eviction = %config.eviction,
            "cache engine initialized"
        );

        Self {
            shards,
            mask: shard_count - 1,
            hasher: BuildHasherDefault::default(),
            max_entry_bytes: config.max_entry_bytes.min(shard_capacity),
            capacity_bytes: shard_capacity * shard_count,
        }
    }

    /// Creates a shared engine and starts its expiration sweeper.
    ///
    /// Must be called from within a tokio runtime. Stop the sweeper with
    /// [`Sweeper::shutdown`] before dropping the runtime.
    pub fn start(config: &EngineConfig, sweep_interval: Duration) -> (Arc<Self>, Sweeper) {
        let engine = Arc::new(Self::new(config));
        let sweeper = Sweeper::spawn(Arc::clone(&engine), sweep_interval);
        (engine, sweeper)
    }

    // == Get ==
    /// Returns the live value stored under `key`, or None.
    ///
    /// An expired entry found here is removed as a side effect.
    pub fn get(&self, key: &str) -> Result<Option<Bytes>> {
        validate_key(key)?;
        let mut shard = self.shard_for(key).lock();
        Ok(shard.get(key, Instant::now()))
    }

    // == Set ==
    /// Stores `value` under `key`.
    ///
    /// A zero `ttl` means no expiration. With `keep_ttl`, an existing live
    /// entry keeps its current expiration and `ttl` is ignored; for a new key
    /// `ttl` applies as usual.
    ///
    /// Returns true if another key was evicted to make room. Rejected calls
    /// leave the cache untouched.
    pub fn set(
        &self,
        key: &str,
        value: impl Into<Bytes>,
        ttl: chrono::Duration,
        keep_ttl: bool,
    ) -> Result<bool> {
        validate_key(key)?;
        let ttl = ttl
            .to_std()
            .map_err(|_| CacheError::InvalidArgument("ttl must be >= 0".to_string()))?;

        let value = value.into();
        if value.len() > self.max_entry_bytes {
            return Err(CacheError::TooLarge {
                size: value.len(),
                max: self.max_entry_bytes,
            });
        }

        let mut shard = self.shard_for(key).lock();
        Ok(shard.set(key, value, ttl, keep_ttl, Instant::now()))
    }

    // == Delete ==
    /// Removes `key`. Returns false if it was absent or already expired.
    pub fn delete(&self, key: &str) -> Result<bool> {
        validate_key(key)?;
        let mut shard = self.shard_for(key).lock();
        Ok(shard.delete(key, Instant::now()))
    }

    // == Length ==
    /// Number of entries currently held across all shards.
    ///
    /// Best effort: shards are counted one at a time rather than as a single
    /// snapshot, and expired entries not yet swept are still counted.
    pub fn len(&self) -> u64 {
        self.shards
            .iter()
            .map(|shard| shard.lock().len() as u64)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // == Stats ==
    /// Sums every shard's counters. Same consistency caveat as [`Self::len`].
    pub fn stats(&self) -> CacheStats {
        self.shards.iter().fold(CacheStats::new(), |mut total, shard| {
            total.merge(&shard.lock().stats());
            total
        })
    }

    // == Sweep ==
    /// Removes expired entries from one shard under its lock.
    ///
    /// Out-of-range indexes sweep nothing.
    pub fn sweep_shard(&self, index: usize) -> usize {
        match self.shards.get(index) {
            Some(shard) => shard.lock().remove_expired(Instant::now()),
            None => 0,
        }
    }

    /// Sweeps every shard in order, one lock at a time.
    pub fn sweep_expired(&self) -> usize {
        (0..self.shards.len()).map(|i| self.sweep_shard(i)).sum()
    }

    // == Accessors ==
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Total capacity actually enforced, the sum of every shard's bound.
    pub fn capacity_bytes(&self) -> usize {
        self.capacity_bytes
    }

    pub fn max_entry_bytes(&self) -> usize {
        self.max_entry_bytes
    }

    /// Index of the shard owning `key`. Pure function of the key.
    pub fn shard_index(&self, key: &str) -> usize {
        (self.hasher.hash_one(key) as usize) & self.mask
    }

    fn shard_for(&self, key: &str) -> &Mutex<Shard> {
        &self.shards[self.shard_index(key)]
    }
}

fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(CacheError::empty_key());
    }
    Ok(())
}
