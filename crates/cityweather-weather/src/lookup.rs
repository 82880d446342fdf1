//! The weather capability the view models depend on.

use async_trait::async_trait;
use std::time::Duration;

use crate::geocode::Geocoder;
use crate::provider::WeatherProvider;
use crate::types::{Coordinates, CurrentConditions, GeocodingResult, TemperatureUnit, WeatherError};

/// Geocoding plus current-conditions lookup.
///
/// Injected into view models as `Arc<dyn WeatherLookup>` so tests can
/// substitute fakes with controlled latency and failures.
#[async_trait]
pub trait WeatherLookup: Send + Sync {
    /// Up to `count` places matching `name`. No match is an empty list.
    async fn search(&self, name: &str, count: u8) -> Result<Vec<GeocodingResult>, WeatherError>;

    /// Best single match for `name`, if any.
    async fn best_match(&self, name: &str) -> Result<Option<GeocodingResult>, WeatherError> {
        Ok(self.search(name, 1).await?.into_iter().next())
    }

    /// Current conditions at `coordinates`.
    async fn current(&self, coordinates: Coordinates) -> Result<CurrentConditions, WeatherError>;
}

/// `WeatherLookup` backed by the public Open-Meteo APIs.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    geocoder: Geocoder,
    provider: WeatherProvider,
}

impl OpenMeteoClient {
    pub fn new(unit: TemperatureUnit, timeout: Duration) -> Result<Self, WeatherError> {
        Ok(Self {
            geocoder: Geocoder::new(timeout)?,
            provider: WeatherProvider::with_base_url(
                crate::provider::FORECAST_API_BASE,
                timeout,
                unit,
            )?,
        })
    }

    /// Point both endpoints at custom hosts (self-hosted instance, mock server).
    pub fn with_base_urls(
        geocoding_url: &str,
        forecast_url: &str,
        timeout: Duration,
        unit: TemperatureUnit,
    ) -> Result<Self, WeatherError> {
        Ok(Self {
            geocoder: Geocoder::with_base_url(geocoding_url, timeout)?,
            provider: WeatherProvider::with_base_url(forecast_url, timeout, unit)?,
        })
    }

    pub fn unit(&self) -> TemperatureUnit {
        self.provider.unit()
    }
}

#[async_trait]
impl WeatherLookup for OpenMeteoClient {
    async fn search(&self, name: &str, count: u8) -> Result<Vec<GeocodingResult>, WeatherError> {
        self.geocoder.search(name, count).await
    }

    async fn best_match(&self, name: &str) -> Result<Option<GeocodingResult>, WeatherError> {
        self.geocoder.best_match(name).await
    }

    async fn current(&self, coordinates: Coordinates) -> Result<CurrentConditions, WeatherError> {
        self.provider.current(coordinates).await
    }
}
