//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint. They validate at the
//! boundary, call the engine, and copy bytes in both directions so no request
//! or response buffer is shared with the cache.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::cache::CacheEngine;
use crate::error::{CacheError, Result};
use crate::models::{
    validate_key, DeleteResponse, ErrorResponse, HealthResponse, LenResponse, SetParams,
    SetResponse, StatsResponse,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Shared cache engine; shards do their own locking
    pub cache: Arc<CacheEngine>,
}

impl AppState {
    pub fn new(cache: Arc<CacheEngine>) -> Self {
        Self { cache }
    }
}

// == Error Mapping ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            CacheError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        };

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

/// Handler for GET /keys/:key
///
/// Returns the raw value bytes, or 404 with a JSON error when the key is
/// absent or expired.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Response> {
    validate_key(&key)?;

    match state.cache.get(&key)? {
        Some(value) => Ok((
            [(header::CONTENT_TYPE, "application/octet-stream")],
            Bytes::copy_from_slice(&value),
        )
            .into_response()),
        None => Ok((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(format!("key not found: {}", key))),
        )
            .into_response()),
    }
}

/// Handler for PUT /keys/:key
///
/// Stores the request body under `key`. Options come from the query string.
pub async fn set_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(params): Query<SetParams>,
    body: Bytes,
) -> Result<Json<SetResponse>> {
    validate_key(&key)?;
    let ttl = params.ttl()?;

    // Detach from the request buffer so the stored value does not pin it
    let value = Bytes::copy_from_slice(&body);
    let evicted = state.cache.set(&key, value, ttl, params.keep_ttl)?;

    Ok(Json(SetResponse::new(key, evicted)))
}

/// Handler for DELETE /keys/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    validate_key(&key)?;
    let deleted = state.cache.delete(&key)?;

    Ok(Json(DeleteResponse::new(key, deleted)))
}

/// Handler for GET /len
pub async fn len_handler(State(state): State<AppState>) -> Json<LenResponse> {
    Json(LenResponse {
        items: state.cache.len(),
    })
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.cache.stats()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;

    fn state() -> AppState {
        AppState::new(Arc::new(CacheEngine::new(&EngineConfig::default())))
    }

    async fn body_bytes(response: Response) -> Bytes {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_set_and_get_handler() {
        let state = state();

        let result = set_handler(
            State(state.clone()),
            Path("test_key".to_string()),
            Query(SetParams::default()),
            Bytes::from_static(b"test_value"),
        )
        .await
        .unwrap();
        assert!(!result.evicted);

        let response = get_handler(State(state), Path("test_key".to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_bytes(response).await, Bytes::from_static(b"test_value"));
    }

    #[tokio::test]
    async fn test_get_nonexistent_key() {
        let response = get_handler(State(state()), Path("nonexistent".to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_handler() {
        let state = state();
        state
            .cache
            .set("to_delete", "value", chrono::Duration::zero(), false)
            .unwrap();

        let first = delete_handler(State(state.clone()), Path("to_delete".to_string()))
            .await
            .unwrap();
        assert!(first.deleted);

        let second = delete_handler(State(state), Path("to_delete".to_string()))
            .await
            .unwrap();
        assert!(!second.deleted);
    }

    #[tokio::test]
    async fn test_len_and_stats_handlers() {
        let state = state();
        state
            .cache
            .set("k", "v", chrono::Duration::zero(), false)
            .unwrap();

        assert_eq!(len_handler(State(state.clone())).await.items, 1);

        let stats = stats_handler(State(state)).await;
        assert_eq!(stats.stats.total_entries, 1);
        assert_eq!(stats.stats.hits, 0);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }

    #[tokio::test]
    async fn test_set_negative_ttl_rejected() {
        let result = set_handler(
            State(state()),
            Path("k".to_string()),
            Query(SetParams {
                ttl_ms: Some(-1),
                keep_ttl: false,
            }),
            Bytes::from_static(b"v"),
        )
        .await;
        assert!(matches!(result, Err(CacheError::InvalidArgument(_))));
    }

    #[test]
    fn test_error_status_codes() {
        let test_cases = vec![
            (
                CacheError::InvalidArgument("bad".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                CacheError::TooLarge { size: 2, max: 1 },
                StatusCode::PAYLOAD_TOO_LARGE,
            ),
        ];

        for (error, expected_status) in test_cases {
            assert_eq!(error.into_response().status(), expected_status);
        }
    }
}
