//! API request handlers.

use crate::error::ApiError;
use crate::models::{HealthResponse, NormalizedContract, Product};
use crate::state::AppState;
use crate::transform::transform_product;
use axum::Json;
use axum::extract::State;
use std::sync::Arc;
use tracing::{debug, error};


/// Liveness message returned by the root endpoint.
pub const LIVENESS_MESSAGE: &str = "Settlement price server is running. Try /api/zq or /api/sr3";

/// Loads a product snapshot and normalizes it.
async fn load_contracts(
    state: &AppState,
    product: Product,
) -> Result<Json<Vec<NormalizedContract>>, ApiError> {
    let rows = state.store.load(product).await.map_err(|e| {
        error!("Error reading {} snapshot: {}", product, e);
        ApiError::DataUnavailable(product)
    })?;
    debug!("Loaded {} raw {} rows", rows.len(), product);

    Ok(Json(transform_product(&rows, product)))
}

// ============================================================================
// Liveness & Health
// ============================================================================

/// Root liveness endpoint.
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Server is running", body = String, content_type = "text/plain")
    ),
    tag = "Health"
)]
pub async fn root() -> &'static str {
    LIVENESS_MESSAGE
}

/// Health check endpoint.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "Health"
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        last_scrape: state.status.last_run().map(|t| t.to_rfc3339()),
    })
}

// ============================================================================
// Settlement Prices
// ============================================================================

/// Get 30-day Fed Funds (ZQ) settlement prices.
#[utoipa::path(
    get,
    path = "/api/zq",
    responses(
        (status = 200, description = "ZQ settlement prices", body = [NormalizedContract]),
        (status = 500, description = "ZQ snapshot unavailable", body = crate::error::ErrorResponse)
    ),
    tag = "Settlements"
)]
pub async fn get_zq(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<NormalizedContract>>, ApiError> {
    load_contracts(&state, Product::Zq).await
}

/// Get 3-month SOFR (SR3) settlement prices.
#[utoipa::path(
    get,
    path = "/api/sr3",
    responses(
        (status = 200, description = "SR3 settlement prices", body = [NormalizedContract]),
        (status = 500, description = "SR3 snapshot unavailable", body = crate::error::ErrorResponse)
    ),
    tag = "Settlements"
)]
pub async fn get_sr3(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<NormalizedContract>>, ApiError> {
    load_contracts(&state, Product::Sr3).await
}
