//! Detail screen for one saved city.

use std::sync::Arc;

use cityweather_weather::{Coordinates, CurrentConditions, GeocodingResult, WeatherLookup};

/// Error type for detail operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailError {
    CityNotFound(String),
    FetchFailed(String),
}

impl std::fmt::Display for DetailError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DetailError::CityNotFound(s) => write!(f, "City not found: {}", s),
            DetailError::FetchFailed(s) => write!(f, "Failed to fetch weather data: {}", s),
        }
    }
}

impl std::error::Error for DetailError {}

/// Everything the detail screen shows.
#[derive(Debug, Clone, PartialEq)]
pub struct CityDetail {
    pub city_name: String,
    pub place: GeocodingResult,
    pub conditions: CurrentConditions,
}

impl CityDetail {
    pub fn coordinates(&self) -> Coordinates {
        self.place.coordinates()
    }

    /// Coordinates rounded to two decimals, e.g. "48.86, 2.35"
    pub fn coordinates_label(&self) -> String {
        self.coordinates().label()
    }
}

/// View model for the city detail screen.
pub struct DetailModel {
    lookup: Arc<dyn WeatherLookup>,
}

impl DetailModel {
    pub fn new(lookup: Arc<dyn WeatherLookup>) -> Self {
        Self { lookup }
    }

    /// Resolve `city_name` and fetch its current conditions.
    pub async fn load(&self, city_name: &str) -> Result<CityDetail, DetailError> {
        let place = self
            .lookup
            .best_match(city_name)
            .await
            .map_err(|e| {
                tracing::warn!(city = %city_name, error = %e, "Detail geocoding failed");
                DetailError::FetchFailed(e.to_string())
            })?
            .ok_or_else(|| DetailError::CityNotFound(city_name.to_string()))?;

        let conditions = self
            .lookup
            .current(place.coordinates())
            .await
            .map_err(|e| {
                tracing::warn!(city = %city_name, error = %e, "Detail weather fetch failed");
                DetailError::FetchFailed(e.to_string())
            })?;

        tracing::debug!(city = %city_name, temperature = conditions.temperature, "Detail loaded");
        Ok(CityDetail {
            city_name: city_name.to_string(),
            place,
            conditions,
        })
    }
}
