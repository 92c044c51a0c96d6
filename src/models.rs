//! Request and response models for the settlement pipeline and REST API.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Futures product family tracked by the scraper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Product {
    /// 30-day Fed Funds futures.
    Zq,
    /// 3-month SOFR futures.
    Sr3,
}

impl Product {
    /// Every product, in the order a scrape cycle visits them.
    pub const ALL: [Product; 2] = [Product::Zq, Product::Sr3];

    /// Exchange product code used as the symbol prefix (e.g. `ZQQ5`).
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Zq => "ZQ",
            Self::Sr3 => "SR3",
        }
    }

    /// Snapshot file name for this product.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Zq => "zq_prices.json",
            Self::Sr3 => "sr3_prices.json",
        }
    }
}

impl std::fmt::Display for Product {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// One settlement row as scraped from the quotes table and persisted in a snapshot.
///
/// `contract` is the first cell's rendered text. On the exchange pages this is
/// a two-line value such as `"AUG 2025\nZQQ5"` (month label, then symbol).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawQuoteRow {
    /// Rendered contract cell text.
    pub contract: String,
    /// Settlement price.
    pub settle: f64,
}

/// A settlement price keyed by a compact contract name such as `Aug5`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NormalizedContract {
    /// Month abbreviation followed by the year code.
    pub contract: String,
    /// Settlement price.
    pub price: f64,
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
    /// Start time (RFC 3339) of the last completed scrape cycle seen by this process.
    pub last_scrape: Option<String>,
}
