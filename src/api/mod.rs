//! API Module
//!
//! Thin HTTP adapter over the cache engine. The engine never depends on it.
//!
//! # Endpoints
//! - `GET /keys/:key` - Retrieve a value as raw bytes
//! - `PUT /keys/:key` - Store the request body
//! - `DELETE /keys/:key` - Delete a key
//! - `GET /len` - Number of entries held
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
