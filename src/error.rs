//! Error types for the REST API.

use crate::models::Product;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;


/// API error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message.
    pub error: String,
}

/// API error types.
///
/// Response bodies carry only a generic message; details stay in the logs.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The product's snapshot is missing or unreadable.
    #[error("{0} data unavailable")]
    DataUnavailable(Product),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::DataUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse {
            error: self.to_string(),
        });

        (status, body).into_response()
    }
}
