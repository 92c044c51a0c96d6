//! Periodic scrape-and-save loop.
//!
//! One cycle scrapes ZQ and then SR3, saving each product's rows on success.
//! Products are isolated: a failure for one is logged and the next is still
//! attempted. Cycles run strictly one after another on a single task.

use crate::config::SourcesConfig;
use crate::models::Product;
use crate::scraper::{QuoteScraper, ScrapeError};
use crate::state::ScrapeStatus;
use crate::store::{SnapshotStore, StoreError};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{error, info, warn};

/// Failure of one product within a cycle.
#[derive(Debug, Error)]
pub enum CycleError {
    /// Scraping the quotes page failed.
    #[error(transparent)]
    Scrape(#[from] ScrapeError),
    /// Saving the snapshot failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result of one product within a cycle.
#[derive(Debug)]
pub struct ProductOutcome {
    /// Product scraped.
    pub product: Product,
    /// Number of rows saved, or the failure.
    pub result: Result<usize, CycleError>,
}

/// Summary of a scrape cycle.
#[derive(Debug)]
pub struct CycleReport {
    /// Cycle start time.
    pub started_at: DateTime<Utc>,
    /// Per-product outcomes in scrape order.
    pub outcomes: Vec<ProductOutcome>,
}

impl CycleReport {
    /// Number of products saved successfully.
    #[must_use]
    pub fn saved(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    /// Number of products that failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.saved()
    }
}

/// Drives scrape cycles on a fixed interval.
pub struct Scheduler {
    scraper: Arc<dyn QuoteScraper>,
    store: SnapshotStore,
    sources: SourcesConfig,
    interval: Duration,
    status: Arc<ScrapeStatus>,
}

impl Scheduler {
    /// Creates a scheduler.
    ///
    /// # Arguments
    /// * `scraper` - Page scraper used for every product.
    /// * `store` - Destination of the snapshots.
    /// * `sources` - Quote page URL per product.
    /// * `interval` - Time between cycle starts.
    /// * `status` - Receives the start time of each completed cycle.
    #[must_use]
    pub fn new(
        scraper: Arc<dyn QuoteScraper>,
        store: SnapshotStore,
        sources: SourcesConfig,
        interval: Duration,
        status: Arc<ScrapeStatus>,
    ) -> Self {
        Self {
            scraper,
            store,
            sources,
            interval,
            status,
        }
    }

    async fn scrape_and_save(&self, product: Product) -> Result<usize, CycleError> {
        let url = self.sources.url(product);
        let rows = self.scraper.scrape(url, product).await?;
        if rows.is_empty() {
            warn!("{}: scrape returned no rows", product);
        }
        self.store.save(product, &rows).await?;
        Ok(rows.len())
    }

    /// Runs one scrape-and-save cycle over every product.
    pub async fn run_cycle(&self) -> CycleReport {
        let started_at = Utc::now();
        let mut outcomes = Vec::with_capacity(Product::ALL.len());

        for product in Product::ALL {
            info!("Scraping {} data...", product);
            let result = self.scrape_and_save(product).await;
            match &result {
                Ok(count) => info!("{} prices saved ({} contracts)", product, count),
                Err(e) => error!("Failed to scrape {} data: {}", product, e),
            }
            outcomes.push(ProductOutcome { product, result });
        }

        self.status.record(started_at);
        let report = CycleReport {
            started_at,
            outcomes,
        };
        info!(
            "Scrape cycle finished: {} saved, {} failed",
            report.saved(),
            report.failed()
        );
        report
    }

    /// Runs a cycle immediately and then once per interval until `shutdown`
    /// is set or its sender is dropped.
    ///
    /// A cycle that overruns the interval delays the next one; cycles never
    /// overlap. An in-flight cycle is allowed to finish before returning.
    ///
    /// Returns the number of cycles run.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> usize {
        info!(
            "Scheduler started, running every {}s",
            self.interval.as_secs()
        );

        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut cycles = 0;

        loop {
            if *shutdown.borrow() {
                break;
            }
            tokio::select! {
                biased;
                _ = shutdown.changed() => break,
                _ = ticker.tick() => {}
            }

            self.run_cycle().await;
            cycles += 1;
        }

        info!("Scheduler stopped after {} cycles", cycles);
        cycles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawQuoteRow;
    use crate::test_support;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scraper returning canned rows, optionally failing for one product.
    struct ScriptedScraper {
        fail: Option<Product>,
        delay: Duration,
        calls: Mutex<Vec<(String, Product)>>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl ScriptedScraper {
        fn new(fail: Option<Product>, delay: Duration) -> Self {
            Self {
                fail,
                delay,
                calls: Mutex::new(Vec::new()),
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl QuoteScraper for ScriptedScraper {
        async fn scrape(
            &self,
            url: &str,
            product: Product,
        ) -> Result<Vec<RawQuoteRow>, ScrapeError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            self.calls.lock().push((url.to_string(), product));

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.fail == Some(product) {
                return Err(ScrapeError::TableNotFound {
                    selector: "div.main-table-wrapper table".to_string(),
                    timeout: Duration::from_secs(60),
                });
            }
            Ok(vec![RawQuoteRow {
                contract: format!("DEC 2025\n{}Z5", product.code()),
                settle: 96.0,
            }])
        }
    }

    fn temp_store() -> SnapshotStore {
        test_support::temp_store("stir_sched")
    }

    fn scheduler(scraper: Arc<ScriptedScraper>, store: SnapshotStore, every: Duration) -> Scheduler {
        let sources = SourcesConfig {
            zq: "https://example.com/zq".to_string(),
            sr3: "https://example.com/sr3".to_string(),
        };
        Scheduler::new(scraper, store, sources, every, Arc::new(ScrapeStatus::new()))
    }

    #[tokio::test]
    async fn test_cycle_scrapes_zq_then_sr3() {
        let scraper = Arc::new(ScriptedScraper::new(None, Duration::ZERO));
        let store = temp_store();
        let sched = scheduler(Arc::clone(&scraper), store.clone(), Duration::from_secs(600));

        let report = sched.run_cycle().await;
        assert_eq!(report.saved(), 2);
        assert_eq!(report.failed(), 0);

        let calls = scraper.calls.lock().clone();
        assert_eq!(
            calls,
            vec![
                ("https://example.com/zq".to_string(), Product::Zq),
                ("https://example.com/sr3".to_string(), Product::Sr3),
            ]
        );
        assert_eq!(store.load(Product::Zq).await.unwrap().len(), 1);
        assert_eq!(store.load(Product::Sr3).await.unwrap().len(), 1);
        assert_eq!(sched.status.last_run(), Some(report.started_at));
    }

    #[tokio::test]
    async fn test_zq_failure_still_attempts_sr3() {
        let scraper = Arc::new(ScriptedScraper::new(Some(Product::Zq), Duration::ZERO));
        let store = temp_store();
        let sched = scheduler(Arc::clone(&scraper), store.clone(), Duration::from_secs(600));

        let report = sched.run_cycle().await;
        assert_eq!(report.saved(), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.outcomes[0].product, Product::Zq);
        assert!(matches!(
            report.outcomes[0].result,
            Err(CycleError::Scrape(ScrapeError::TableNotFound { .. }))
        ));
        assert_eq!(report.outcomes[1].product, Product::Sr3);
        assert_eq!(report.outcomes[1].result.as_ref().ok(), Some(&1));

        assert!(matches!(
            store.load(Product::Zq).await,
            Err(StoreError::Missing { .. })
        ));
        assert_eq!(store.load(Product::Sr3).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_scrape_keeps_previous_snapshot() {
        let store = temp_store();
        let previous = vec![RawQuoteRow {
            contract: "AUG 2025\nZQQ5".to_string(),
            settle: 95.5,
        }];
        store.save(Product::Zq, &previous).await.unwrap();

        let scraper = Arc::new(ScriptedScraper::new(Some(Product::Zq), Duration::ZERO));
        let sched = scheduler(scraper, store.clone(), Duration::from_secs(600));
        sched.run_cycle().await;

        assert_eq!(store.load(Product::Zq).await.unwrap(), previous);
    }

    #[tokio::test]
    async fn test_store_failure_is_reported() {
        let store = SnapshotStore::new("/definitely/not/a/real/dir");
        let scraper = Arc::new(ScriptedScraper::new(None, Duration::ZERO));
        let sched = scheduler(scraper, store, Duration::from_secs(600));

        let report = sched.run_cycle().await;
        assert_eq!(report.failed(), 2);
        assert!(matches!(
            report.outcomes[1].result,
            Err(CycleError::Store(StoreError::Io { .. }))
        ));
    }

    #[tokio::test]
    async fn test_cycles_never_overlap() {
        // Each cycle (two scrapes) takes longer than the interval.
        let scraper = Arc::new(ScriptedScraper::new(None, Duration::from_millis(25)));
        let sched = scheduler(Arc::clone(&scraper), temp_store(), Duration::from_millis(10));
        let (tx, rx) = watch::channel(false);

        let handle = tokio::spawn(async move { sched.run(rx).await });
        tokio::time::sleep(Duration::from_millis(200)).await;
        tx.send(true).unwrap();
        let cycles = handle.await.unwrap();

        assert!(cycles >= 2, "ran {cycles} cycles");
        assert_eq!(scraper.max_in_flight.load(Ordering::SeqCst), 1);
        assert_eq!(scraper.calls.lock().len(), cycles * 2);
    }

    #[tokio::test]
    async fn test_run_starts_immediately_and_stops_on_shutdown() {
        let scraper = Arc::new(ScriptedScraper::new(None, Duration::ZERO));
        let sched = scheduler(Arc::clone(&scraper), temp_store(), Duration::from_secs(600));
        let (tx, rx) = watch::channel(false);

        let handle = tokio::spawn(async move { sched.run(rx).await });
        tokio::time::sleep(Duration::from_millis(100)).await;
        tx.send(true).unwrap();
        let cycles = handle.await.unwrap();

        assert_eq!(cycles, 1);
        assert_eq!(scraper.calls.lock().len(), 2);
    }

    #[tokio::test]
    async fn test_run_exits_when_shutdown_already_set() {
        let scraper = Arc::new(ScriptedScraper::new(None, Duration::ZERO));
        let sched = scheduler(Arc::clone(&scraper), temp_store(), Duration::from_secs(600));
        let (_tx, rx) = watch::channel(true);

        assert_eq!(sched.run(rx).await, 0);
        assert!(scraper.calls.lock().is_empty());
    }
}
