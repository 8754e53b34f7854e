//! Error types for the cache engine
//!
//! Provides unified error handling using thiserror. The variants are
//! transport-agnostic; the HTTP adapter maps them to status codes.

use thiserror::Error;

// == Cache Error Enum ==
/// Failures a cache operation can report to its caller.
///
/// Absence of a key and eviction are not errors; they are reported through
/// the return values of `get`, `set` and `delete`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Empty key, negative TTL, or another malformed argument
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Value exceeds the per-entry size limit
    #[error("value too large: {size} bytes exceeds maximum of {max} bytes")]
    TooLarge { size: usize, max: usize },
}

impl CacheError {
    pub(crate) fn empty_key() -> Self {
        CacheError::InvalidArgument("key is empty".to_string())
    }
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
