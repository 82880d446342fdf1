//! View models for CityWeather.
//!
//! Each screen is a plain async model that a UI layer drives and observes.

pub mod app_services;
mod error_mapping;
pub mod models;

pub use app_services::AppServices;
pub use models::{
    CityDetail, DetailError, DetailModel, EnrichedCity, FavoritesError, FavoritesModel,
    RefreshOutcome, SaveOutcome, SearchError, SearchModel,
};
