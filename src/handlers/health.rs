//! Health check endpoint
//!
//! Provides a simple liveness probe plus a view of the process-wide state
//! that matters operationally: whether any credential is loaded and how many
//! passages the cache currently holds.

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

use crate::handlers::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: &'static str,
    /// Number of credentials in the pool
    pub credentials: usize,
    /// Number of memoized passages
    pub cache_entries: usize,
}

/// GET /health handler
///
/// Always 200: an empty credential pool is a recoverable configuration
/// problem surfaced per request, not a dead process.
pub async fn handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let cache_entries = state.cache().len().await;
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "OK",
            credentials: state.resolver().credential_count(),
            cache_entries,
        }),
    )
}
