//! Weather service for CityWeather
//!
//! Provides forward geocoding and current conditions via the Open-Meteo APIs.

pub mod geocode;
pub mod lookup;
pub mod provider;
pub mod types;

pub use geocode::{Geocoder, SEARCH_RESULT_COUNT};
pub use lookup::{OpenMeteoClient, WeatherLookup};
pub use provider::WeatherProvider;
pub use types::*;
