//! In-process adapters.
//!
//! Useful for embedding hosts that already hold market data, and for tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::{IsolationForest, MarketRecord, MarketSnapshot};
use crate::error::{FetchError, StorageError};
use crate::port::outbound::{MarketDataSource, ModelStore};

/// Market data source that serves a fixed snapshot, or always fails.
pub struct StaticSource {
    outcome: Result<MarketSnapshot, String>,
    fetches: AtomicUsize,
}

impl StaticSource {
    #[must_use]
    pub fn new(snapshot: MarketSnapshot) -> Self {
        Self {
            outcome: Ok(snapshot),
            fetches: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub fn from_records(records: Vec<MarketRecord>) -> Self {
        Self::new(MarketSnapshot::from_records(records))
    }

    /// A source whose every fetch fails with `reason`.
    #[must_use]
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            outcome: Err(reason.into()),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Number of fetches served so far.
    #[must_use]
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl MarketDataSource for StaticSource {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn fetch(&self) -> Result<MarketSnapshot, FetchError> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        self.outcome.clone().map_err(FetchError::Unavailable)
    }
}

/// Model store holding the serialized artifact in memory.
///
/// Goes through the same JSON encoding as the file store so that decode
/// failures can be simulated with [`MemoryModelStore::with_artifact`].
#[derive(Default)]
pub struct MemoryModelStore {
    artifact: Mutex<Option<Vec<u8>>>,
    reject_writes: bool,
    writes: AtomicUsize,
}

impl MemoryModelStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with raw artifact bytes already present.
    #[must_use]
    pub fn with_artifact(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            artifact: Mutex::new(Some(bytes.into())),
            ..Self::default()
        }
    }

    /// A store whose every save fails.
    #[must_use]
    pub fn read_only() -> Self {
        Self {
            reject_writes: true,
            ..Self::default()
        }
    }

    /// Number of successful saves.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }
}

impl ModelStore for MemoryModelStore {
    fn location(&self) -> String {
        "memory".to_string()
    }

    fn exists(&self) -> bool {
        self.artifact.lock().is_some()
    }

    fn load(&self) -> Result<IsolationForest, StorageError> {
        let guard = self.artifact.lock();
        let bytes = guard.as_deref().ok_or_else(|| {
            StorageError::Read(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no artifact stored",
            ))
        })?;
        let forest: IsolationForest =
            serde_json::from_slice(bytes).map_err(StorageError::Decode)?;
        forest.validate().map_err(StorageError::Corrupt)?;
        Ok(forest)
    }

    fn save(&self, forest: &IsolationForest) -> Result<(), StorageError> {
        if self.reject_writes {
            return Err(StorageError::Write(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "store is read-only",
            )));
        }
        let bytes = serde_json::to_vec(forest).map_err(StorageError::Encode)?;
        *self.artifact.lock() = Some(bytes);
        self.writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
