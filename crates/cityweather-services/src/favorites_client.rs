//! Async saved-city store used by the view models.
//!
//! `FavoritesStore` wraps whichever backend was selected at startup and
//! exposes the favorites contract: reads degrade to an empty list, writes
//! report a plain success flag, and every failure is logged instead of
//! propagated.

use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::favorites_backend::{
    FavoritesBackend, FavoritesBackendError, FavoritesBackendResult, SavedCity, MAX_SAVED_CITIES,
};
use crate::favorites_json::JsonFavoritesStore;
use crate::favorites_store::SqliteFavoritesStore;
use crate::retry::{with_retry, RetryConfig, RetryDecision};

/// Storage engine chosen at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Sqlite,
    Json,
}

/// Saved-city store with the degrade-don't-fail contract.
///
/// Cloning is cheap; all clones share one backend. Backend calls run on the
/// blocking pool one at a time.
#[derive(Clone)]
pub struct FavoritesStore {
    backend: Arc<Mutex<Box<dyn FavoritesBackend>>>,
    capacity: usize,
    read_retry: RetryConfig,
}

impl FavoritesStore {
    /// Wrap any backend.
    pub fn new(backend: impl FavoritesBackend + 'static) -> Self {
        Self {
            backend: Arc::new(Mutex::new(Box::new(backend))),
            capacity: MAX_SAVED_CITIES,
            read_retry: RetryConfig::store_read(),
        }
    }

    /// Create a SQLite-backed store.
    pub fn sqlite(store: SqliteFavoritesStore) -> Self {
        Self::new(store)
    }

    /// Create a JSON-file-backed store.
    pub fn json(store: JsonFavoritesStore) -> Self {
        Self::new(store)
    }

    /// Open the backend of the given kind at `path`.
    ///
    /// This runs the one-time schema setup, so call it before first use.
    pub fn open(kind: StoreKind, path: &Path) -> anyhow::Result<Self> {
        let store = match kind {
            StoreKind::Sqlite => Self::sqlite(SqliteFavoritesStore::new(path)?),
            StoreKind::Json => Self::json(JsonFavoritesStore::new(path)?),
        };
        tracing::info!(?kind, path = %path.display(), "Opened favorites store");
        Ok(store)
    }

    /// Override the read retry policy.
    pub fn with_read_retry(mut self, config: RetryConfig) -> Self {
        self.read_retry = config;
        self
    }

    /// Maximum number of saved cities.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Run one backend call on the blocking pool.
    async fn call<T, F>(&self, op: F) -> FavoritesBackendResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn FavoritesBackend) -> FavoritesBackendResult<T> + Send + 'static,
    {
        let backend = self.backend.clone();
        tokio::task::spawn_blocking(move || {
            let guard = backend.lock();
            op(&**guard)
        })
        .await
        .map_err(|e| FavoritesBackendError::Other(anyhow::anyhow!("storage task failed: {}", e)))?
    }

    /// All saved cities in insertion order.
    ///
    /// A failed read is retried once after a short pause. If that fails too
    /// the result is an empty list, indistinguishable from "nothing saved".
    pub async fn list(&self) -> Vec<SavedCity> {
        let result = with_retry(
            &self.read_retry,
            move || self.call(|backend| backend.list()),
            |e: &FavoritesBackendError| {
                if e.is_transient() {
                    RetryDecision::Retry
                } else {
                    RetryDecision::NoRetry
                }
            },
        )
        .await;

        match result {
            Ok(cities) => cities,
            Err(e) => {
                tracing::error!(error = %e, "Error fetching saved cities after retry");
                Vec::new()
            }
        }
    }

    /// Number of saved cities; 0 when storage cannot be read.
    pub async fn count(&self) -> usize {
        match self.call(|backend| backend.count()).await {
            Ok(count) => count,
            Err(e) => {
                tracing::error!(error = %e, "Error counting saved cities");
                0
            }
        }
    }

    /// Whether the capacity gate is closed.
    pub async fn is_full(&self) -> bool {
        self.count().await >= self.capacity
    }

    /// Save `city_name`. True only when a new row was committed.
    ///
    /// False when the list is full, the exact name is already saved, the name
    /// is blank, or storage fails.
    pub async fn add(&self, city_name: &str) -> bool {
        let name = city_name.to_string();
        let capacity = self.capacity;

        match self.call(move |backend| backend.insert(&name, capacity)).await {
            Ok(city) => {
                tracing::info!(id = city.id, city = %city.city_name, "Saved city");
                true
            }
            Err(FavoritesBackendError::CapacityReached(limit)) => {
                tracing::info!(city = %city_name, limit, "Not saving city: limit reached");
                false
            }
            Err(FavoritesBackendError::Duplicate(_)) => {
                tracing::info!(city = %city_name, "Not saving city: already saved");
                false
            }
            Err(e) => {
                tracing::error!(city = %city_name, error = %e, "Error adding saved city");
                false
            }
        }
    }

    /// Delete by id. True when the delete ran without error, whether or not
    /// a row matched.
    pub async fn remove(&self, id: i64) -> bool {
        match self.call(move |backend| backend.delete(id)).await {
            Ok(()) => {
                tracing::info!(id, "Removed saved city");
                true
            }
            Err(e) => {
                tracing::error!(id, error = %e, "Error removing saved city");
                false
            }
        }
    }
}

impl std::fmt::Debug for FavoritesStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoritesStore")
            .field("capacity", &self.capacity)
            .field("read_retry", &self.read_retry)
            .finish_non_exhaustive()
    }
}
