//! Saved-city storage backend trait and error types.
//!
//! This module defines the `FavoritesBackend` trait that abstracts over the
//! storage engines (SQLite table, JSON document) behind the favorites list.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound on saved cities
pub const MAX_SAVED_CITIES: usize = 5;

/// A city the user saved. Never mutated after insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedCity {
    pub id: i64,
    pub city_name: String,
}

/// Errors that can occur during favorites backend operations.
#[derive(Debug, Error)]
pub enum FavoritesBackendError {
    /// A city with exactly this name is already saved.
    #[error("City already saved: {0}")]
    Duplicate(String),

    /// The list already holds `capacity` cities.
    #[error("Saved city limit of {0} reached")]
    CapacityReached(usize),

    /// Validation error (e.g., empty city name).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Storage error (database, file system).
    #[error("Storage error: {0}")]
    Storage(String),

    /// Generic error wrapper.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FavoritesBackendError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Whether trying again could succeed (transient storage trouble).
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::Other(_))
    }
}

/// Result type for favorites backend operations.
pub type FavoritesBackendResult<T> = Result<T, FavoritesBackendError>;

/// Trait for saved-city storage backends.
///
/// Implementations are synchronous; `FavoritesStore` moves calls onto the
/// blocking pool and serializes them behind a mutex, so they need not be Sync.
pub trait FavoritesBackend: Send {
    /// All saved cities in insertion order.
    fn list(&self) -> FavoritesBackendResult<Vec<SavedCity>>;

    /// Number of saved cities.
    fn count(&self) -> FavoritesBackendResult<usize>;

    /// Insert `city_name` unless `capacity` cities already exist.
    ///
    /// The capacity check and the insert are one atomic step.
    ///
    /// # Errors
    /// `CapacityReached` when full, `Duplicate` when the exact name exists,
    /// `Validation` for an empty name.
    fn insert(&self, city_name: &str, capacity: usize) -> FavoritesBackendResult<SavedCity>;

    /// Delete by id. Deleting an id that does not exist is not an error.
    fn delete(&self, id: i64) -> FavoritesBackendResult<()>;
}

/// Validate a city name before it reaches storage.
pub fn validate_city_name(city_name: &str) -> FavoritesBackendResult<()> {
    if city_name.trim().is_empty() {
        return Err(FavoritesBackendError::validation("City name cannot be empty"));
    }
    Ok(())
}
