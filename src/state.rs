//! Application state management.

use crate::store::SnapshotStore;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::sync::Arc;

/// Time of the last completed scrape cycle in this process.
#[derive(Debug, Default)]
pub struct ScrapeStatus {
    last_run: RwLock<Option<DateTime<Utc>>>,
}

impl ScrapeStatus {
    /// Creates an empty status.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the start time of a completed cycle.
    pub fn record(&self, started_at: DateTime<Utc>) {
        *self.last_run.write() = Some(started_at);
    }

    /// Start time of the last completed cycle, if any.
    #[must_use]
    pub fn last_run(&self) -> Option<DateTime<Utc>> {
        *self.last_run.read()
    }
}

/// Application state shared across all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Snapshot files served by the API.
    pub store: SnapshotStore,
    /// Scheduler progress, shared with the scrape loop when both run in-process.
    pub status: Arc<ScrapeStatus>,
}

impl AppState {
    /// Creates a new application state.
    #[must_use]
    pub fn new(store: SnapshotStore, status: Arc<ScrapeStatus>) -> Self {
        Self { store, status }
    }
}
