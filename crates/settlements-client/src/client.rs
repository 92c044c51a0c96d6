//! HTTP client for the settlements API.

use crate::error::Error;
use crate::types::*;
use reqwest::Client;
use std::time::Duration;


/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API (e.g., "http://localhost:4000").
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:4000".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// HTTP client for the STIR Settlements API.
#[derive(Debug, Clone)]
pub struct SettlementsClient {
    client: Client,
    base_url: String,
}

impl SettlementsClient {
    /// Creates a new client with the given configuration.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Creates a new client with default configuration.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn with_base_url(base_url: &str) -> Result<Self, Error> {
        Self::new(ClientConfig {
            base_url: base_url.to_string(),
            ..Default::default()
        })
    }

    /// Full URL for an API path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ========================================================================
    // Liveness & Health
    // ========================================================================

    /// Fetches the root liveness message.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn liveness(&self) -> Result<String, Error> {
        let resp = self.client.get(self.url("/")).send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        if status.is_success() {
            Ok(text)
        } else {
            Err(Error::Api {
                status: status.as_u16(),
                message: text,
            })
        }
    }

    /// Performs a health check.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn health(&self) -> Result<HealthResponse, Error> {
        let resp = self.client.get(self.url("/health")).send().await?;
        self.handle_response(resp).await
    }

    // ========================================================================
    // Settlement Prices
    // ========================================================================

    /// Gets the settlement prices for a product.
    ///
    /// # Errors
    /// Returns [`Error::Api`] with the server's message if the product's data
    /// is unavailable, or an HTTP/JSON error.
    pub async fn contracts(&self, product: Product) -> Result<Vec<NormalizedContract>, Error> {
        let resp = self.client.get(self.url(product.path())).send().await?;
        self.handle_response(resp).await
    }

    /// Gets the 30-day Fed Funds settlement prices.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn zq(&self) -> Result<Vec<NormalizedContract>, Error> {
        self.contracts(Product::Zq).await
    }

    /// Gets the 3-month SOFR settlement prices.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn sr3(&self) -> Result<Vec<NormalizedContract>, Error> {
        self.contracts(Product::Sr3).await
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();

        if status.is_success() {
            let body = resp.bytes().await?;
            Ok(serde_json::from_slice(&body)?)
        } else {
            let text = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&text)
                .map(|body| body.error)
                .unwrap_or(text);
            Err(Error::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}
