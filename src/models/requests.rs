//! Request DTOs for the cache server API
//!
//! The value of a set travels as the raw request body; only the options are
//! decoded here, from the query string.

use serde::Deserialize;

use crate::cache::MAX_KEY_LENGTH;
use crate::error::{CacheError, Result};

/// Query parameters for the SET operation (PUT /keys/:key)
///
/// # Fields
/// - `ttl_ms`: Optional TTL in milliseconds; absent or zero means no expiry
/// - `keep_ttl`: Keep an existing entry's expiration instead of `ttl_ms`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SetParams {
    #[serde(default)]
    pub ttl_ms: Option<i64>,
    #[serde(default)]
    pub keep_ttl: bool,
}

impl SetParams {
    /// Converts `ttl_ms` into the engine's signed TTL.
    ///
    /// Negative values pass through so the engine rejects them.
    pub fn ttl(&self) -> Result<chrono::Duration> {
        let ms = self.ttl_ms.unwrap_or(0);
        chrono::Duration::try_milliseconds(ms)
            .ok_or_else(|| CacheError::InvalidArgument(format!("ttl_ms {} is out of range", ms)))
    }
}

/// Rejects keys the engine would accept but the adapter does not serve.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(CacheError::InvalidArgument("key is empty".to_string()));
    }
    if key.len() > MAX_KEY_LENGTH {
        return Err(CacheError::InvalidArgument(format!(
            "key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_params_deserialize() {
        let params: SetParams = serde_json::from_str(r#"{"ttl_ms": 1500, "keep_ttl": true}"#).unwrap();
        assert_eq!(params.ttl_ms, Some(1500));
        assert!(params.keep_ttl);
        assert_eq!(params.ttl().unwrap(), chrono::Duration::milliseconds(1500));
    }

    #[test]
    fn test_set_params_defaults() {
        let params: SetParams = serde_json::from_str("{}").unwrap();
        assert!(params.ttl_ms.is_none());
        assert!(!params.keep_ttl);
        assert_eq!(params.ttl().unwrap(), chrono::Duration::zero());
    }

    #[test]
    fn test_set_params_negative_ttl_passes_through() {
        let params = SetParams {
            ttl_ms: Some(-1000),
            keep_ttl: false,
        };
        assert_eq!(params.ttl().unwrap(), chrono::Duration::seconds(-1));
    }

    #[test]
    fn test_set_params_out_of_range_ttl() {
        let params = SetParams {
            ttl_ms: Some(i64::MIN),
            keep_ttl: false,
        };
        assert!(params.ttl().is_err());
    }

    #[test]
    fn test_validate_key() {
        assert!(validate_key("valid_key").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key(&"x".repeat(MAX_KEY_LENGTH)).is_ok());
        assert!(validate_key(&"x".repeat(MAX_KEY_LENGTH + 1)).is_err());
    }
}
