//! Test doubles shared by the view model tests.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Semaphore;

use cityweather_services::{
    FavoritesBackend, FavoritesBackendError, FavoritesBackendResult, FavoritesStore, SavedCity,
    SqliteFavoritesStore,
};
use cityweather_weather::{
    Coordinates, CurrentConditions, GeocodingResult, TemperatureUnit, WeatherCondition,
    WeatherError, WeatherLookup,
};

/// How the fake answers for one city.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Geocode succeeds and the forecast reports this temperature after `delay`.
    Temperature { value: f64, delay: Duration },
    /// Geocoding finds nothing.
    NoMatch,
    /// The forecast request fails.
    ForecastFails,
    /// The geocoding request fails.
    GeocodeFails,
    /// The forecast never answers.
    Hang,
}

impl Reply {
    pub fn temp(value: f64) -> Self {
        Self::Temperature {
            value,
            delay: Duration::ZERO,
        }
    }

    pub fn temp_after(value: f64, delay_ms: u64) -> Self {
        Self::Temperature {
            value,
            delay: Duration::from_millis(delay_ms),
        }
    }
}

struct Place {
    result: GeocodingResult,
    reply: Reply,
}

/// In-memory `WeatherLookup` with scripted replies and call counters.
pub struct FakeLookup {
    places: HashMap<String, Place>,
    gate: Option<Arc<Semaphore>>,
    pub search_calls: AtomicUsize,
    pub current_calls: AtomicUsize,
}

impl FakeLookup {
    pub fn new() -> Self {
        Self {
            places: HashMap::new(),
            gate: None,
            search_calls: AtomicUsize::new(0),
            current_calls: AtomicUsize::new(0),
        }
    }

    /// Register `name` at the given coordinates.
    pub fn with_city(mut self, name: &str, latitude: f64, longitude: f64, reply: Reply) -> Self {
        let id = self.places.len() as i64 + 1;
        self.places.insert(
            name.to_string(),
            Place {
                result: GeocodingResult {
                    id,
                    name: name.to_string(),
                    latitude,
                    longitude,
                    country: Some("Testland".to_string()),
                    admin1: None,
                },
                reply,
            },
        );
        self
    }

    /// Hold every forecast request until a permit is added to `gate`.
    pub fn gated(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }

    fn place_at(&self, coordinates: Coordinates) -> Option<&Place> {
        self.places
            .values()
            .find(|p| p.result.coordinates() == coordinates)
    }
}

pub fn conditions(temperature: f64) -> CurrentConditions {
    CurrentConditions {
        temperature,
        apparent_temperature: temperature - 1.0,
        humidity: 60,
        wind_speed: 12.0,
        condition: WeatherCondition::PartlyCloudy,
        unit: TemperatureUnit::Celsius,
        fetched_at: chrono::Utc::now(),
    }
}

#[async_trait]
impl WeatherLookup for FakeLookup {
    async fn search(&self, name: &str, count: u8) -> Result<Vec<GeocodingResult>, WeatherError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        if matches!(
            self.places.get(name),
            Some(Place {
                reply: Reply::GeocodeFails,
                ..
            })
        ) {
            return Err(WeatherError::Status {
                endpoint: "geocoding",
                status: 503,
            });
        }

        let mut found: Vec<GeocodingResult> = self
            .places
            .values()
            .filter(|p| p.result.name.starts_with(name) && !matches!(p.reply, Reply::NoMatch))
            .map(|p| p.result.clone())
            .collect();
        found.sort_by_key(|r| r.id);
        found.truncate(count as usize);
        Ok(found)
    }

    async fn current(&self, coordinates: Coordinates) -> Result<CurrentConditions, WeatherError> {
        self.current_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            let _permit = gate
                .acquire()
                .await
                .map_err(|e| WeatherError::Parse(e.to_string()))?;
        }

        let reply = self
            .place_at(coordinates)
            .map(|p| p.reply.clone())
            .ok_or_else(|| WeatherError::Parse("unknown coordinates".into()))?;

        match reply {
            Reply::Temperature { value, delay } => {
                tokio::time::sleep(delay).await;
                Ok(conditions(value))
            }
            Reply::Hang => std::future::pending().await,
            _ => Err(WeatherError::Status {
                endpoint: "forecast",
                status: 500,
            }),
        }
    }
}

/// In-memory SQLite store pre-filled with `names`.
pub async fn seeded_store(names: &[&str]) -> FavoritesStore {
    let store = FavoritesStore::sqlite(SqliteFavoritesStore::in_memory().unwrap());
    for name in names {
        assert!(store.add(name).await);
    }
    store
}

/// Backend that lists fine but refuses every write.
pub struct ReadOnlyBackend {
    pub cities: Vec<SavedCity>,
}

impl FavoritesBackend for ReadOnlyBackend {
    fn list(&self) -> FavoritesBackendResult<Vec<SavedCity>> {
        Ok(self.cities.clone())
    }

    fn count(&self) -> FavoritesBackendResult<usize> {
        Ok(self.cities.len())
    }

    fn insert(&self, _city_name: &str, _capacity: usize) -> FavoritesBackendResult<SavedCity> {
        Err(FavoritesBackendError::storage("attempt to write a readonly database"))
    }

    fn delete(&self, _id: i64) -> FavoritesBackendResult<()> {
        Err(FavoritesBackendError::storage("attempt to write a readonly database"))
    }
}
