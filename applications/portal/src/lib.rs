//! Nyamedia Portal host
//!
//! Serves the browser client and hands it its configuration through `<meta>`
//! tags. The media backend API is a separate service.

pub mod api;
pub mod config;
pub mod error;
pub mod state;
pub mod static_files;

use axum::Router;
use state::AppState;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Build the full router for `state`
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", api::routes())
        .fallback(static_files::spa_fallback)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
