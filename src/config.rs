//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::cache::EvictionKind;

/// Default total capacity (64 MiB)
pub const DEFAULT_CAPACITY_BYTES: usize = 64 * 1024 * 1024;

/// Default per-entry limit (1 MiB)
pub const DEFAULT_MAX_ENTRY_BYTES: usize = 1024 * 1024;

/// Rejected configuration values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("max entry size {max_entry_bytes} exceeds per-shard capacity {shard_capacity}")]
    EntryLargerThanShard {
        max_entry_bytes: usize,
        shard_capacity: usize,
    },
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Number of independently locked shards (rounded up to a power of two)
    pub shard_count: usize,
    /// Total bytes of values the cache may hold, split evenly across shards
    pub capacity_bytes: usize,
    /// Largest single value accepted by set
    pub max_entry_bytes: usize,
    /// Interval between expiration sweeps in milliseconds
    pub sweep_interval_ms: u64,
    /// Eviction policy used by every shard
    pub eviction: EvictionKind,
    /// HTTP server port
    pub server_port: u16,
}

/// The subset of [`Config`] the cache engine itself needs.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub shard_count: usize,
    pub capacity_bytes: usize,
    pub max_entry_bytes: usize,
    pub eviction: EvictionKind,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SHARD_COUNT` - Number of shards (default: 16)
    /// - `CAPACITY_BYTES` - Total value capacity (default: 64 MiB)
    /// - `MAX_ENTRY_BYTES` - Largest single value (default: 1 MiB)
    /// - `SWEEP_INTERVAL_MS` - Expiration sweep frequency (default: 1000)
    /// - `EVICTION_POLICY` - `lru` or `fifo` (default: lru)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    ///
    /// Missing or unparseable values fall back to their defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            shard_count: env_or("SHARD_COUNT", defaults.shard_count),
            capacity_bytes: env_or("CAPACITY_BYTES", defaults.capacity_bytes),
            max_entry_bytes: env_or("MAX_ENTRY_BYTES", defaults.max_entry_bytes),
            sweep_interval_ms: env_or("SWEEP_INTERVAL_MS", defaults.sweep_interval_ms),
            eviction: env_or("EVICTION_POLICY", defaults.eviction),
            server_port: env_or("SERVER_PORT", defaults.server_port),
        }
    }

    /// Checks that the values describe a usable cache.
    ///
    /// A single entry must fit in one shard, otherwise the capacity bound
    /// could not hold after eviction.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.shard_count == 0 {
            return Err(ConfigError::Zero("shard_count"));
        }
        if self.capacity_bytes == 0 {
            return Err(ConfigError::Zero("capacity_bytes"));
        }
        if self.max_entry_bytes == 0 {
            return Err(ConfigError::Zero("max_entry_bytes"));
        }
        if self.sweep_interval_ms == 0 {
            return Err(ConfigError::Zero("sweep_interval_ms"));
        }

        let shard_capacity = self.capacity_bytes / self.shard_count.next_power_of_two();
        if self.max_entry_bytes > shard_capacity {
            return Err(ConfigError::EntryLargerThanShard {
                max_entry_bytes: self.max_entry_bytes,
                shard_capacity,
            });
        }
        Ok(())
    }

    pub fn engine(&self) -> EngineConfig {
        EngineConfig {
            shard_count: self.shard_count,
            capacity_bytes: self.capacity_bytes,
            max_entry_bytes: self.max_entry_bytes,
            eviction: self.eviction,
        }
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            shard_count: 16,
            capacity_bytes: DEFAULT_CAPACITY_BYTES,
            max_entry_bytes: DEFAULT_MAX_ENTRY_BYTES,
            sweep_interval_ms: 1000,
            eviction: EvictionKind::Lru,
            server_port: 3000,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Config::default().engine()
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
