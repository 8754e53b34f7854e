//! Cache Shard Module
//!
//! One independently locked partition of the keyspace. The engine wraps each
//! shard in its own mutex; everything here runs with that lock held, so the
//! map, the eviction policy and the byte counter always change together.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use bytes::Bytes;
use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, EvictionPolicy};

// == Shard ==
/// A bounded map from key to entry plus its eviction ordering.
#[derive(Debug)]
pub struct Shard {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Victim selection for capacity enforcement
    policy: Box<dyn EvictionPolicy>,
    /// Sum of `size_bytes` over every entry in `entries`
    size_bytes: usize,
    /// Upper bound for `size_bytes` once eviction settles
    capacity_bytes: usize,
    /// Performance counters
    stats: CacheStats,
}

impl Shard {
    // == Constructor ==
    /// Creates an empty shard holding at most `capacity_bytes` of values.
    pub fn new(capacity_bytes: usize, policy: Box<dyn EvictionPolicy>) -> Self {
        Self {
            entries: HashMap::new(),
            policy,
            size_bytes: 0,
            capacity_bytes,
            stats: CacheStats::new(),
        }
    }

    // == Get ==
    /// Looks up a live value.
    ///
    /// An expired entry is removed on the spot and reported as a miss. A hit
    /// refreshes the key in the eviction policy and returns a shared handle
    /// to the stored bytes, not a copy.
    pub fn get(&mut self, key: &str, now: Instant) -> Option<Bytes> {
        let expired = match self.entries.get(key) {
            Some(entry) => entry.is_expired(now),
            None => {
                self.stats.record_miss();
                return None;
            }
        };

        if expired {
            self.remove_entry(key);
            self.stats.record_expirations(1);
            self.stats.record_miss();
            return None;
        }

        let value = self.entries.get(key).map(|entry| entry.value.clone());
        self.policy.record_access(key);
        self.stats.record_hit();
        value
    }

    // == Set ==
    /// Inserts or replaces `key`, then enforces the capacity bound.
    ///
    /// With `keep_ttl`, a live entry keeps its current expiration and `ttl`
    /// is ignored. An absent or already-expired entry always takes `ttl`,
    /// where zero means no expiration.
    ///
    /// Returns true if at least one other key was evicted to make room.
    pub fn set(
        &mut self,
        key: &str,
        value: Bytes,
        ttl: Duration,
        keep_ttl: bool,
        now: Instant,
    ) -> bool {
        let live_expiry = self
            .entries
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.expires_at);

        let entry = match (keep_ttl, live_expiry) {
            (true, Some(expires_at)) => CacheEntry::with_expiry(value, expires_at),
            _ => CacheEntry::new(value, ttl, now),
        };
        let new_size = entry.size_bytes();

        if let Some(slot) = self.entries.get_mut(key) {
            let old = std::mem::replace(slot, entry);
            self.size_bytes -= old.size_bytes();
            if old.is_expired(now) {
                // The old value was already logically gone; order the key as new.
                self.stats.record_expirations(1);
                self.policy.remove(key);
                self.policy.record_insert(key);
            } else {
                self.policy.record_access(key);
            }
        } else {
            self.entries.insert(key.to_string(), entry);
            self.policy.record_insert(key);
        }
        self.size_bytes += new_size;

        self.enforce_capacity(key)
    }

    // == Delete ==
    /// Removes `key`. Returns false if it was absent or already expired.
    pub fn delete(&mut self, key: &str, now: Instant) -> bool {
        match self.remove_entry(key) {
            Some(entry) if entry.is_expired(now) => {
                self.stats.record_expirations(1);
                false
            }
            Some(_) => true,
            None => false,
        }
    }

    // == Remove Expired ==
    /// Removes every entry expired at `now`. Returns how many were removed.
    pub fn remove_expired(&mut self, now: Instant) -> usize {
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.remove_entry(key);
        }

        self.stats.record_expirations(expired_keys.len());
        expired_keys.len()
    }

    // == Length ==
    /// Entries physically present, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn size_bytes(&self) -> usize {
        self.size_bytes
    }

    pub fn capacity_bytes(&self) -> usize {
        self.capacity_bytes
    }

    // == Stats ==
    /// Returns a snapshot of this shard's counters.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.total_entries = self.entries.len();
        stats.size_bytes = self.size_bytes;
        stats
    }

    /// Evicts policy victims other than `protect` until within capacity.
    fn enforce_capacity(&mut self, protect: &str) -> bool {
        let mut evicted = false;

        while self.size_bytes > self.capacity_bytes {
            let Some(victim) = self.policy.pick_victim(protect) else {
                break;
            };
            if self.remove_entry(&victim).is_none() {
                // Policy and map disagree; drop the stale key and keep going.
                self.policy.remove(&victim);
                continue;
            }
            self.stats.record_eviction();
            debug!(key = %victim, size_bytes = self.size_bytes, "evicted entry");
            evicted = true;
        }

        evicted
    }

    fn remove_entry(&mut self, key: &str) -> Option<CacheEntry> {
        let entry = self.entries.remove(key)?;
        self.size_bytes -= entry.size_bytes();
        self.policy.remove(key);
        Some(entry)
    }
}
