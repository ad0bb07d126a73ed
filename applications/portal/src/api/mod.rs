/// API routes served by the portal host itself
pub mod health;

use crate::error::PortalServerError;
use crate::state::AppState;
use axum::{extract::OriginalUri, routing::get, Router};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .fallback(not_found)
}

/// Unknown `/api/*` paths get a JSON 404 instead of the web client
async fn not_found(OriginalUri(uri): OriginalUri) -> PortalServerError {
    PortalServerError::NotFound(uri.path().to_string())
}
