//! Search screen: find a city, preview its weather, save it.

use std::sync::Arc;

use cityweather_services::FavoritesStore;
use cityweather_weather::{CurrentConditions, GeocodingResult, WeatherLookup, SEARCH_RESULT_COUNT};

/// Error type for search operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    Geocoding(String),
    Weather(String),
    InvalidSelection(usize),
}

impl std::fmt::Display for SearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchError::Geocoding(s) => write!(f, "Geocoding failed: {}", s),
            SearchError::Weather(s) => write!(f, "Weather fetch failed: {}", s),
            SearchError::InvalidSelection(i) => write!(f, "No search result at index {}", i),
        }
    }
}

impl std::error::Error for SearchError {}

/// Result of [`SearchModel::save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved { city_name: String },
    /// The saved list is full; saving stays disabled until a city is removed.
    LimitReached { limit: usize },
    /// Storage refused the city, most likely because it is already saved.
    Rejected { city_name: String },
    NothingSelected,
}

/// View model for the search / add screen.
pub struct SearchModel {
    store: FavoritesStore,
    lookup: Arc<dyn WeatherLookup>,
    results: Vec<GeocodingResult>,
    selected: Option<usize>,
    preview: Option<CurrentConditions>,
    save_disabled: bool,
}

impl SearchModel {
    pub fn new(store: FavoritesStore, lookup: Arc<dyn WeatherLookup>) -> Self {
        Self {
            store,
            lookup,
            results: Vec::new(),
            selected: None,
            preview: None,
            save_disabled: false,
        }
    }

    pub fn results(&self) -> &[GeocodingResult] {
        &self.results
    }

    pub fn selected(&self) -> Option<&GeocodingResult> {
        self.selected.and_then(|i| self.results.get(i))
    }

    pub fn preview(&self) -> Option<&CurrentConditions> {
        self.preview.as_ref()
    }

    /// Whether the save action should be disabled (capacity gate closed).
    pub fn save_disabled(&self) -> bool {
        self.save_disabled
    }

    /// Re-check the capacity gate. Call when the screen is shown.
    pub async fn refresh_save_limit(&mut self) -> bool {
        self.save_disabled = self.store.is_full().await;
        self.save_disabled
    }

    /// Search for places named `query`.
    ///
    /// A blank query leaves everything as it was. Otherwise the previous
    /// results, selection, and preview are replaced.
    pub async fn search(&mut self, query: &str) -> Result<&[GeocodingResult], SearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(&self.results);
        }

        self.selected = None;
        self.preview = None;

        match self.lookup.search(query, SEARCH_RESULT_COUNT).await {
            Ok(results) => {
                tracing::debug!(query, count = results.len(), "City search complete");
                self.results = results;
                Ok(&self.results)
            }
            Err(e) => {
                tracing::warn!(query, error = %e, "City search failed");
                self.results.clear();
                Err(SearchError::Geocoding(e.to_string()))
            }
        }
    }

    /// Select result `index` and fetch its current conditions.
    ///
    /// The selection sticks even if the preview cannot be fetched.
    pub async fn select(&mut self, index: usize) -> Result<&CurrentConditions, SearchError> {
        let place = self
            .results
            .get(index)
            .ok_or(SearchError::InvalidSelection(index))?;
        let coordinates = place.coordinates();
        let name = place.name.clone();

        self.selected = Some(index);
        self.preview = None;

        match self.lookup.current(coordinates).await {
            Ok(conditions) => Ok(&*self.preview.insert(conditions)),
            Err(e) => {
                tracing::warn!(city = %name, error = %e, "Preview fetch failed");
                Err(SearchError::Weather(e.to_string()))
            }
        }
    }

    /// Save the selected city.
    pub async fn save(&mut self) -> SaveOutcome {
        let Some(city_name) = self.selected().map(|r| r.name.clone()) else {
            return SaveOutcome::NothingSelected;
        };

        // The list may have filled up since the screen was opened
        if self.refresh_save_limit().await {
            return SaveOutcome::LimitReached {
                limit: self.store.capacity(),
            };
        }

        if self.store.add(&city_name).await {
            self.refresh_save_limit().await;
            SaveOutcome::Saved { city_name }
        } else {
            SaveOutcome::Rejected { city_name }
        }
    }
}
