//! Eviction Policy Module
//!
//! Decides which key a shard gives up when it is over its byte capacity.
//! Shards only talk to the [`EvictionPolicy`] trait, so the ordering rule can
//! change without touching shard mechanics.

use std::fmt;
use std::str::FromStr;

use crate::cache::LruTracker;

// == Eviction Policy ==
/// Ordering bookkeeping consulted by a shard on capacity enforcement.
///
/// Every method is called with the owning shard's lock held.
pub trait EvictionPolicy: Send + fmt::Debug {
    /// A key was inserted into the shard.
    fn record_insert(&mut self, key: &str);

    /// An existing key was read or overwritten.
    fn record_access(&mut self, key: &str);

    /// A key left the shard (delete, expiration or eviction).
    fn remove(&mut self, key: &str);

    /// Returns the next key to evict, never `protect`.
    fn pick_victim(&self, protect: &str) -> Option<String>;

    /// Number of keys being ordered.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// == LRU Policy ==
/// Least-recently-used: reads and writes both refresh a key.
#[derive(Debug, Default)]
pub struct LruPolicy {
    tracker: LruTracker,
}

impl LruPolicy {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EvictionPolicy for LruPolicy {
    fn record_insert(&mut self, key: &str) {
        self.tracker.touch(key);
    }

    fn record_access(&mut self, key: &str) {
        self.tracker.touch(key);
    }

    fn remove(&mut self, key: &str) {
        self.tracker.remove(key);
    }

    fn pick_victim(&self, protect: &str) -> Option<String> {
        self.tracker.oldest_except(protect).map(str::to_owned)
    }

    fn len(&self) -> usize {
        self.tracker.len()
    }
}

// == FIFO Policy ==
/// First-in-first-out: only insertion order matters, accesses are ignored.
#[derive(Debug, Default)]
pub struct FifoPolicy {
    tracker: LruTracker,
}

impl FifoPolicy {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EvictionPolicy for FifoPolicy {
    fn record_insert(&mut self, key: &str) {
        if !self.tracker.contains(key) {
            self.tracker.touch(key);
        }
    }

    fn record_access(&mut self, _key: &str) {}

    fn remove(&mut self, key: &str) {
        self.tracker.remove(key);
    }

    fn pick_victim(&self, protect: &str) -> Option<String> {
        self.tracker.oldest_except(protect).map(str::to_owned)
    }

    fn len(&self) -> usize {
        self.tracker.len()
    }
}

// == Eviction Kind ==
/// Selects which [`EvictionPolicy`] each shard is built with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EvictionKind {
    #[default]
    Lru,
    Fifo,
}

impl EvictionKind {
    /// Builds a fresh, empty policy of this kind.
    pub fn build(self) -> Box<dyn EvictionPolicy> {
        match self {
            EvictionKind::Lru => Box::new(LruPolicy::new()),
            EvictionKind::Fifo => Box::new(FifoPolicy::new()),
        }
    }
}

impl fmt::Display for EvictionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvictionKind::Lru => f.write_str("lru"),
            EvictionKind::Fifo => f.write_str("fifo"),
        }
    }
}

impl FromStr for EvictionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lru" => Ok(EvictionKind::Lru),
            "fifo" => Ok(EvictionKind::Fifo),
            other => Err(format!("unknown eviction policy '{}'", other)),
        }
    }
}
