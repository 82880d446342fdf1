pub mod favorites_backend;
pub mod favorites_client;
pub mod favorites_json;
pub mod favorites_store;
pub mod retry;

pub use favorites_backend::{
    FavoritesBackend, FavoritesBackendError, FavoritesBackendResult, SavedCity, MAX_SAVED_CITIES,
};
pub use favorites_client::{FavoritesStore, StoreKind};
pub use favorites_json::JsonFavoritesStore;
pub use favorites_store::SqliteFavoritesStore;
pub use retry::{with_retry, RetryConfig, RetryDecision};
