pub mod detail_model;
pub mod favorites_model;
pub mod search_model;

#[cfg(test)]
mod fakes;

pub use detail_model::{CityDetail, DetailError, DetailModel};
pub use favorites_model::{EnrichedCity, FavoritesError, FavoritesModel, RefreshOutcome, LOOKUP_TIMEOUT};
pub use search_model::{SaveOutcome, SearchError, SearchModel};
