//! Chrome-driven scraper for the exchange quotes pages.

use crate::config::ScraperConfig;
use crate::models::{Product, RawQuoteRow};
use crate::scraper::row::collect_rows;
use crate::scraper::{QuoteScraper, ScrapeError};
use async_trait::async_trait;
use chromiumoxide::Page;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::NavigateParams;
use chromiumoxide::handler::viewport::Viewport;
use futures::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Delay between checks for the quotes table.
const TABLE_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// How long to wait for Chrome to exit after a close request.
const BROWSER_EXIT_TIMEOUT: Duration = Duration::from_secs(10);

fn browser_error(err: impl std::fmt::Display) -> ScrapeError {
    ScrapeError::Browser(err.to_string())
}

/// A browser session that can read one quotes table and must then be closed.
#[async_trait]
trait TableSession: Send + Sync + Sized {
    async fn read_table(&self, url: &str) -> Result<Vec<Vec<String>>, ScrapeError>;

    async fn close(self);
}

/// Reads the table at `url` and closes the session whatever the outcome.
async fn read_and_close<S: TableSession>(
    session: S,
    url: &str,
) -> Result<Vec<Vec<String>>, ScrapeError> {
    let table = session.read_table(url).await;
    session.close().await;
    table
}

/// A launched browser plus the task driving its CDP connection.
struct Session {
    browser: Browser,
    handler: JoinHandle<()>,
    config: ScraperConfig,
}

impl Session {
    async fn launch(
        browser_config: BrowserConfig,
        config: ScraperConfig,
    ) -> Result<Self, ScrapeError> {
        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| ScrapeError::Launch(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler error: {}", e);
                }
            }
        });

        Ok(Self {
            browser,
            handler,
            config,
        })
    }

    async fn kill(&mut self) {
        if let Some(Err(e)) = self.browser.kill().await {
            warn!("Failed to kill browser: {}", e);
        }
    }

    /// Starts navigation without waiting for the full page load.
    async fn navigate(&self, page: &Page, url: &str) -> Result<(), ScrapeError> {
        let timeout = self.config.navigation_timeout();
        let response = tokio::time::timeout(timeout, page.execute(NavigateParams::new(url)))
            .await
            .map_err(|_| ScrapeError::NavigationTimeout {
                url: url.to_string(),
                timeout,
            })?
            .map_err(|e| ScrapeError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        if let Some(reason) = response.result.error_text.clone() {
            return Err(ScrapeError::Navigation {
                url: url.to_string(),
                reason,
            });
        }
        Ok(())
    }

    async fn wait_for_table(&self, page: &Page) -> Result<(), ScrapeError> {
        let selector = self.config.table_selector.as_str();
        let timeout = self.config.table_timeout();

        let found = tokio::time::timeout(timeout, async {
            loop {
                if page.find_element(selector).await.is_ok() {
                    return;
                }
                tokio::time::sleep(TABLE_POLL_INTERVAL).await;
            }
        })
        .await;

        found.map_err(|_| ScrapeError::TableNotFound {
            selector: selector.to_string(),
            timeout,
        })
    }

    /// Reads the text of every cell of every body row.
    async fn read_cells(&self, page: &Page) -> Result<Vec<Vec<String>>, ScrapeError> {
        let rows = page
            .find_elements(self.config.row_selector.as_str())
            .await
            .map_err(browser_error)?;

        let mut table = Vec::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            let cells = match row.find_elements("td").await {
                Ok(cells) => cells,
                Err(e) => {
                    debug!("Skipping row {}: {}", index, e);
                    continue;
                }
            };

            let mut texts = Vec::with_capacity(cells.len());
            for cell in &cells {
                match cell.inner_text().await {
                    Ok(text) => texts.push(text.unwrap_or_default()),
                    Err(e) => {
                        debug!("Unreadable cell in row {}: {}", index, e);
                        texts.push(String::new());
                    }
                }
            }
            table.push(texts);
        }
        Ok(table)
    }
}

#[async_trait]
impl TableSession for Session {
    async fn read_table(&self, url: &str) -> Result<Vec<Vec<String>>, ScrapeError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(browser_error)?;
        self.navigate(&page, url).await?;
        self.wait_for_table(&page).await?;
        self.read_cells(&page).await
    }

    /// Closes the browser, killing it if it does not exit in time, and stops
    /// the handler task.
    async fn close(mut self) {
        match self.browser.close().await {
            Ok(_) => {
                let exited = tokio::time::timeout(BROWSER_EXIT_TIMEOUT, self.browser.wait()).await;
                match exited {
                    Ok(Ok(_)) => {}
                    Ok(Err(e)) => warn!("Failed waiting for browser exit: {}", e),
                    Err(_) => {
                        warn!("Browser did not exit within {:?}, killing it", BROWSER_EXIT_TIMEOUT);
                        self.kill().await;
                    }
                }
            }
            Err(e) => {
                warn!("Failed to close browser: {}, killing it", e);
                self.kill().await;
            }
        }
        self.handler.abort();
    }
}

/// Scrapes quotes tables with a fresh, isolated browser per call.
#[derive(Debug, Clone)]
pub struct BrowserScraper {
    config: ScraperConfig,
}

impl BrowserScraper {
    /// Creates a scraper with the given browser settings.
    #[must_use]
    pub fn new(config: ScraperConfig) -> Self {
        Self { config }
    }

    fn browser_config(&self) -> Result<BrowserConfig, ScrapeError> {
        let cfg = &self.config;
        let mut builder = BrowserConfig::builder()
            .window_size(cfg.viewport_width, cfg.viewport_height)
            .viewport(Viewport {
                width: cfg.viewport_width,
                height: cfg.viewport_height,
                device_scale_factor: None,
                emulating_mobile: false,
                is_landscape: false,
                has_touch: false,
            })
            .request_timeout(cfg.request_timeout())
            .arg(format!("--user-agent={}", cfg.user_agent));

        if !cfg.headless {
            builder = builder.with_head();
        }
        if cfg.ignore_https_errors {
            builder = builder.arg("--ignore-certificate-errors");
        }
        if let Some(path) = &cfg.chrome_executable {
            builder = builder.chrome_executable(path);
        }

        builder.build().map_err(ScrapeError::Launch)
    }
}

#[async_trait]
impl QuoteScraper for BrowserScraper {
    async fn scrape(&self, url: &str, product: Product) -> Result<Vec<RawQuoteRow>, ScrapeError> {
        info!("Navigating to {} for {}", url, product);
        let session = Session::launch(self.browser_config()?, self.config.clone()).await?;

        let table = read_and_close(session, url).await?;
        let rows = collect_rows(&table);
        debug!(
            "{}: {} of {} table rows parsed",
            product,
            rows.len(),
            table.len()
        );
        Ok(rows)
    }
}
