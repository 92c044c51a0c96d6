//! Configuration module for loading and parsing TOML configuration files.

use crate::models::Product;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse TOML configuration.
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// Invalid configuration value.
    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Scrape schedule.
    pub schedule: ScheduleConfig,
    /// Snapshot storage.
    pub storage: StorageConfig,
    /// Browser and page settings.
    pub scraper: ScraperConfig,
    /// Quote page URLs.
    pub sources: SourcesConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port number to listen on.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 4000,
        }
    }
}

/// Scrape schedule configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Seconds between scrape cycles.
    pub interval_secs: u64,
}

impl ScheduleConfig {
    /// Interval between cycle starts.
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self { interval_secs: 600 }
    }
}

/// Snapshot storage configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the snapshot files.
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
        }
    }
}

/// Slack added on top of the longest scrape timeout for single CDP commands.
const REQUEST_TIMEOUT_MARGIN: Duration = Duration::from_secs(5);

/// Browser session configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Run without a visible window.
    pub headless: bool,
    /// User agent presented to the quotes site.
    pub user_agent: String,
    /// Viewport width in pixels.
    pub viewport_width: u32,
    /// Viewport height in pixels.
    pub viewport_height: u32,
    /// Accept invalid TLS certificates.
    pub ignore_https_errors: bool,
    /// Navigation timeout in seconds.
    pub navigation_timeout_secs: u64,
    /// Timeout in seconds for the quotes table to appear.
    pub table_timeout_secs: u64,
    /// Selector of the quotes table.
    pub table_selector: String,
    /// Selector of the table body rows.
    pub row_selector: String,
    /// Explicit Chrome/Chromium executable. Auto-detected when unset.
    pub chrome_executable: Option<PathBuf>,
}

impl ScraperConfig {
    /// Navigation timeout.
    #[must_use]
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    /// Table wait timeout.
    #[must_use]
    pub fn table_timeout(&self) -> Duration {
        Duration::from_secs(self.table_timeout_secs)
    }

    /// Per-command CDP timeout.
    ///
    /// Outlasts both the navigation and the table wait so those report their
    /// own timeout errors instead of a dropped browser command.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.navigation_timeout().max(self.table_timeout()) + REQUEST_TIMEOUT_MARGIN
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            headless: false,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/114.0.0.0 Safari/537.36"
                .to_string(),
            viewport_width: 1280,
            viewport_height: 800,
            ignore_https_errors: true,
            navigation_timeout_secs: 90,
            table_timeout_secs: 60,
            table_selector: "div.main-table-wrapper table".to_string(),
            row_selector: "div.main-table-wrapper table tbody tr".to_string(),
            chrome_executable: None,
        }
    }
}

/// Quote page URL per product.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// 30-day Fed Funds quotes page.
    pub zq: String,
    /// 3-month SOFR quotes page.
    pub sr3: String,
}

impl SourcesConfig {
    /// URL of the quotes page for `product`.
    #[must_use]
    pub fn url(&self, product: Product) -> &str {
        match product {
            Product::Zq => &self.zq,
            Product::Sr3 => &self.sr3,
        }
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            zq: "https://www.cmegroup.com/markets/interest-rates/stirs/30-day-federal-fund.quotes.html"
                .to_string(),
            sr3: "https://www.cmegroup.com/markets/interest-rates/stirs/three-month-sofr.quotes.html"
                .to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file.
    ///
    /// # Errors
    /// Returns error if file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Arguments
    /// * `content` - TOML content as string.
    ///
    /// # Errors
    /// Returns error if content cannot be parsed.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Applies `HOST` and `PORT` environment overrides.
    ///
    /// # Errors
    /// Returns error if `PORT` is not a valid port number.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(host) = std::env::var("HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| ConfigError::InvalidValue(format!("PORT must be a number: {port}")))?;
        }
        self.validate()
    }

    /// Validates the configuration values.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue(
                "server port must be positive".to_string(),
            ));
        }
        if self.schedule.interval_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "schedule interval_secs must be positive".to_string(),
            ));
        }

        let scraper = &self.scraper;
        if scraper.navigation_timeout_secs == 0 || scraper.table_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "scraper timeouts must be positive".to_string(),
            ));
        }
        if scraper.viewport_width == 0 || scraper.viewport_height == 0 {
            return Err(ConfigError::InvalidValue(
                "scraper viewport must be non-empty".to_string(),
            ));
        }
        if scraper.table_selector.trim().is_empty() || scraper.row_selector.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "scraper selectors cannot be empty".to_string(),
            ));
        }

        for product in Product::ALL {
            if self.sources.url(product).trim().is_empty() {
                return Err(ConfigError::InvalidValue(format!(
                    "source url for {product} cannot be empty"
                )));
            }
        }

        Ok(())
    }
}
