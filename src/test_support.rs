//! Helpers shared by unit tests.

use crate::store::SnapshotStore;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Creates a snapshot store over a unique, empty directory under the OS temp dir.
pub fn temp_store(prefix: &str) -> SnapshotStore {
    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let counter = COUNTER.fetch_add(1, Ordering::Relaxed);
    let dir = std::env::temp_dir().join(format!(
        "{}_{}_{}_{}",
        prefix,
        std::process::id(),
        ts,
        counter
    ));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    SnapshotStore::new(dir)
}
