//! Route configuration.

use crate::api::handlers;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use std::sync::Arc;

/// Creates the API router.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Liveness
        .route("/", get(handlers::root))
        // Health check
        .route("/health", get(handlers::health_check))
        // Settlement prices
        .route("/api/zq", get(handlers::get_zq))
        .route("/api/sr3", get(handlers::get_sr3))
        .with_state(state)
}
