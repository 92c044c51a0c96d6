//! Per-product JSON snapshot files.
//!
//! Each product has one pretty-printed file holding the rows of the latest
//! successful scrape. Saving replaces the whole file; there is no history.

use crate::models::{Product, RawQuoteRow};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Snapshot storage error types.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The snapshot file does not exist.
    #[error("snapshot file missing: {}", path.display())]
    Missing {
        /// Snapshot path.
        path: PathBuf,
    },

    /// The snapshot file could not be read or written.
    #[error("snapshot I/O error on {}: {source}", path.display())]
    Io {
        /// Snapshot path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The snapshot file is not a valid row array.
    #[error("invalid snapshot {}: {source}", path.display())]
    Parse {
        /// Snapshot path.
        path: PathBuf,
        /// JSON error.
        source: serde_json::Error,
    },

    /// The rows could not be serialized.
    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Reads and writes product snapshots under a data directory.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    /// Creates a store rooted at `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the snapshot files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the snapshot file for `product`.
    #[must_use]
    pub fn path(&self, product: Product) -> PathBuf {
        self.dir.join(product.file_name())
    }

    /// Replaces the snapshot for `product` with `rows`.
    ///
    /// The rows are written to a temporary sibling file which is then renamed
    /// over the snapshot, so readers never see a half-written file.
    ///
    /// # Errors
    /// Returns error if serialization or any file operation fails.
    pub async fn save(&self, product: Product, rows: &[RawQuoteRow]) -> Result<(), StoreError> {
        let path = self.path(product);
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(rows)?;

        tokio::fs::write(&tmp, json)
            .await
            .map_err(|source| StoreError::Io {
                path: tmp.clone(),
                source,
            })?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;

        debug!("Wrote {} rows to {}", rows.len(), path.display());
        Ok(())
    }

    /// Loads the snapshot for `product`.
    ///
    /// # Errors
    /// Returns [`StoreError::Missing`] if the file does not exist and
    /// [`StoreError::Parse`] if it is not a valid row array.
    pub async fn load(&self, product: Product) -> Result<Vec<RawQuoteRow>, StoreError> {
        let path = self.path(product);
        let content = match tokio::fs::read(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::Missing { path });
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        serde_json::from_slice(&content).map_err(|source| StoreError::Parse { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;

    fn temp_store() -> SnapshotStore {
        test_support::temp_store("stir_store")
    }

    fn rows() -> Vec<RawQuoteRow> {
        vec![
            RawQuoteRow {
                contract: "SEP 2025\nZQU5".to_string(),
                settle: 95.705,
            },
            RawQuoteRow {
                contract: "AUG 2025\nZQQ5".to_string(),
                settle: 95.5,
            },
        ]
    }

    #[tokio::test]
    async fn test_save_then_load_preserves_rows() {
        let store = temp_store();
        store.save(Product::Zq, &rows()).await.unwrap();
        let loaded = store.load(Product::Zq).await.unwrap();
        assert_eq!(loaded, rows());
    }

    #[tokio::test]
    async fn test_save_replaces_previous_snapshot() {
        let store = temp_store();
        store.save(Product::Sr3, &rows()).await.unwrap();
        let replacement = vec![RawQuoteRow {
            contract: "DEC 2025\nSR3Z5".to_string(),
            settle: 96.1,
        }];
        store.save(Product::Sr3, &replacement).await.unwrap();
        assert_eq!(store.load(Product::Sr3).await.unwrap(), replacement);
        assert!(!store.path(Product::Sr3).with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn test_save_writes_pretty_json() {
        let store = temp_store();
        store.save(Product::Zq, &rows()).await.unwrap();
        let text = std::fs::read_to_string(store.path(Product::Zq)).unwrap();
        assert!(text.starts_with("[\n  {\n    \"contract\""));
        assert!(text.contains("\"settle\": 95.5"));
    }

    #[tokio::test]
    async fn test_products_use_separate_files() {
        let store = temp_store();
        store.save(Product::Zq, &rows()).await.unwrap();
        assert!(store.path(Product::Zq).ends_with("zq_prices.json"));
        assert!(matches!(
            store.load(Product::Sr3).await,
            Err(StoreError::Missing { .. })
        ));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let store = temp_store();
        let err = store.load(Product::Zq).await.unwrap_err();
        assert!(matches!(err, StoreError::Missing { .. }));
        assert!(err.to_string().contains("zq_prices.json"));
    }

    #[tokio::test]
    async fn test_load_invalid_json() {
        let store = temp_store();
        std::fs::write(store.path(Product::Zq), "[{\"contract\": \"AUG").unwrap();
        assert!(matches!(
            store.load(Product::Zq).await,
            Err(StoreError::Parse { .. })
        ));

        std::fs::write(store.path(Product::Zq), "{\"contract\": \"AUG\", \"settle\": 1}").unwrap();
        assert!(matches!(
            store.load(Product::Zq).await,
            Err(StoreError::Parse { .. })
        ));
    }

    #[tokio::test]
    async fn test_empty_snapshot_round_trips() {
        let store = temp_store();
        store.save(Product::Zq, &[]).await.unwrap();
        assert!(store.load(Product::Zq).await.unwrap().is_empty());
    }
}
