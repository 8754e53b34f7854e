//! Cache Entry Module
//!
//! Defines the stored unit: value bytes plus an optional expiration instant.

use std::time::{Duration, Instant};

use bytes::Bytes;

// == Cache Entry ==
/// A single cached value with its expiration metadata.
///
/// The value is immutable once stored; a later set replaces the whole entry.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored value
    pub value: Bytes,
    /// Absolute expiration instant, None = never expires
    pub expires_at: Option<Instant>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry that expires `ttl` after `now`.
    ///
    /// A zero `ttl` means the entry never expires.
    pub fn new(value: Bytes, ttl: Duration, now: Instant) -> Self {
        let expires_at = if ttl.is_zero() {
            None
        } else {
            now.checked_add(ttl)
        };

        Self { value, expires_at }
    }

    /// Creates an entry with an explicit expiration instant.
    pub fn with_expiry(value: Bytes, expires_at: Option<Instant>) -> Self {
        Self { value, expires_at }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now`.
    ///
    /// An entry is expired once `now` reaches its expiration instant, so a
    /// read at exactly the deadline is already a miss.
    pub fn is_expired(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(expires) => now >= expires,
            None => false,
        }
    }

    // == Size ==
    /// Bytes charged against the shard capacity for this entry.
    pub fn size_bytes(&self) -> usize {
        self.value.len()
    }

    // == Time To Live ==
    /// Returns the remaining TTL at `now`, or None if no expiration is set.
    ///
    /// Returns `Some(Duration::ZERO)` once the entry has expired.
    pub fn ttl_remaining(&self, now: Instant) -> Option<Duration> {
        self.expires_at
            .map(|expires| expires.saturating_duration_since(now))
    }
}
