//! Model catalog endpoint
//!
//! GET /models probes the remote catalog for variants that support text
//! generation and annotates which preference entries are actually available.
//! Useful when a preference list keeps 404ing: the response shows what the
//! remote side currently offers.

use axum::{Extension, Json, extract::State};
use serde::Serialize;

use crate::error::AppError;
use crate::handlers::AppState;
use crate::middleware::RequestId;

/// Catalog listing response
#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    /// Remote variants that support generation
    pub available: Vec<String>,
    /// Configured preference entries present in the catalog, in preference order
    pub preferred_available: Vec<String>,
}

/// GET /models handler
pub async fn handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> Result<Json<ModelsResponse>, AppError> {
    // The catalog probe needs a credential too; resolution failures surface
    // the same banner the translate flow would show.
    let resolved = state.resolver().resolve()?;
    let available = state.backend().list_models(&resolved).await?;

    let preferred_available = state
        .config()
        .models
        .preference()
        .iter()
        .filter(|entry| {
            let bare = entry.strip_prefix("models/").unwrap_or(entry);
            available.iter().any(|name| name == bare)
        })
        .cloned()
        .collect();

    tracing::debug!(
        request_id = %request_id,
        available = available.len(),
        "Listed remote model catalog"
    );

    Ok(Json(ModelsResponse {
        available,
        preferred_available,
    }))
}
