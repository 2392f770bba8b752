//! Shared, lazily-opened access to the durable store

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::error::{Error, Result};

use super::connection::Store;
use super::objects::{LibSqlObjectRepository, ObjectRepository, StoredObject};

/// Fixed database file name
pub const DB_FILE_NAME: &str = "satchel.db";

/// Where the store lives
#[derive(Debug, Clone)]
enum StoreLocation {
    Disk(PathBuf),
    Memory,
}

/// Cloneable handle to the process-wide store, opened on first use
///
/// Repeated `open` calls return the same live store, and concurrent callers
/// before the first successful open all await a single in-flight
/// initialization rather than racing separate opens. The handle is never
/// explicitly closed; the single logical session owns it for its lifetime.
#[derive(Clone)]
pub struct StoreHandle {
    location: StoreLocation,
    store: Arc<OnceCell<Store>>,
}

impl StoreHandle {
    /// Handle for an on-disk store at the given path
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            location: StoreLocation::Disk(path.into()),
            store: Arc::new(OnceCell::new()),
        }
    }

    /// Handle for an in-memory store (useful for testing)
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            location: StoreLocation::Memory,
            store: Arc::new(OnceCell::new()),
        }
    }

    /// Default on-disk location under the platform data directory
    #[must_use]
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("satchel")
            .join(DB_FILE_NAME)
    }

    /// Open the store, or return the already-open handle
    pub async fn open(&self) -> Result<&Store> {
        self.store
            .get_or_try_init(|| async {
                match &self.location {
                    StoreLocation::Disk(path) => {
                        if let Some(parent) = path.parent() {
                            std::fs::create_dir_all(parent).map_err(|error| {
                                Error::StoreUnavailable(error.to_string())
                            })?;
                        }
                        tracing::debug!(path = %path.display(), "opening durable store");
                        Store::open(path).await
                    }
                    StoreLocation::Memory => Store::open_in_memory().await,
                }
            })
            .await
    }

    /// Read every record in T's collection
    pub async fn read_all<T: StoredObject>(&self) -> Result<Vec<T>> {
        let store = self.open().await?;
        LibSqlObjectRepository::new(store.connection())
            .read_all()
            .await
    }

    /// Insert or fully replace a record
    pub async fn upsert<T: StoredObject>(&self, record: &T) -> Result<()> {
        let store = self.open().await?;
        LibSqlObjectRepository::new(store.connection())
            .upsert(record)
            .await
    }

    /// Remove a record by id; absent ids are a no-op
    pub async fn delete<T: StoredObject>(&self, id: &str) -> Result<()> {
        let store = self.open().await?;
        LibSqlObjectRepository::new(store.connection())
            .delete::<T>(id)
            .await
    }
}
