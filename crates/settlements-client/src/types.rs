//! Response types returned by the settlements API.

use serde::{Deserialize, Serialize};

/// Futures product served by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Product {
    /// 30-day Fed Funds futures.
    Zq,
    /// 3-month SOFR futures.
    Sr3,
}

impl Product {
    /// API path of the product's price endpoint.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Zq => "/api/zq",
            Self::Sr3 => "/api/sr3",
        }
    }
}

/// Settlement price for one contract month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedContract {
    /// Month abbreviation followed by the year code, e.g. `Aug5`.
    pub contract: String,
    /// Settlement price.
    pub price: f64,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
    /// Start time (RFC 3339) of the last completed scrape cycle, if any.
    pub last_scrape: Option<String>,
}

/// Error body returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message.
    pub error: String,
}
