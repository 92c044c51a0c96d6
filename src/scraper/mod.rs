//! Settlement price scraping.
//!
//! The quotes pages render their table client-side, so rows are read from a
//! real browser session (see [`browser::BrowserScraper`]). Row parsing lives in
//! [`row`] and is independent of the browser.

pub mod browser;
pub mod row;

use crate::models::{Product, RawQuoteRow};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

pub use browser::BrowserScraper;
pub use row::{RowSkip, collect_rows, parse_row};

/// Scrape failure for a single page.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The browser could not be configured or started.
    #[error("failed to launch browser: {0}")]
    Launch(String),

    /// Navigation was rejected by the browser.
    #[error("failed to navigate to {url}: {reason}")]
    Navigation {
        /// Target URL.
        url: String,
        /// Browser-reported reason.
        reason: String,
    },

    /// Navigation did not complete in time.
    #[error("timed out after {timeout:?} navigating to {url}")]
    NavigationTimeout {
        /// Target URL.
        url: String,
        /// Configured navigation timeout.
        timeout: Duration,
    },

    /// The quotes table never appeared.
    #[error("table '{selector}' not found within {timeout:?}")]
    TableNotFound {
        /// Table selector that was awaited.
        selector: String,
        /// Configured table wait timeout.
        timeout: Duration,
    },

    /// Any other browser protocol failure.
    #[error("browser error: {0}")]
    Browser(String),
}

/// Source of raw settlement rows for a product page.
#[async_trait]
pub trait QuoteScraper: Send + Sync {
    /// Scrapes every parsable row from the quotes table at `url`.
    async fn scrape(&self, url: &str, product: Product) -> Result<Vec<RawQuoteRow>, ScrapeError>;
}
