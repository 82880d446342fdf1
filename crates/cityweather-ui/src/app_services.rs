//! Application services shared by every view model.
//!
//! `AppServices` is built once at startup from the loaded `Config`: it opens
//! the configured favorites backend, builds the weather client, and hands
//! both to view models by constructor injection.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio_util::sync::CancellationToken;

use cityweather_core::{Config, StorageBackend};
use cityweather_services::{FavoritesStore, StoreKind};
use cityweather_weather::{OpenMeteoClient, TemperatureUnit, WeatherLookup};

use crate::models::{DetailModel, FavoritesModel, SearchModel};

/// Shared services container.
pub struct AppServices {
    config: Arc<Config>,
    store: FavoritesStore,
    lookup: Arc<dyn WeatherLookup>,
    unit: TemperatureUnit,
    shutdown: CancellationToken,
}

fn temperature_unit(unit: cityweather_core::TemperatureUnit) -> TemperatureUnit {
    match unit {
        cityweather_core::TemperatureUnit::Celsius => TemperatureUnit::Celsius,
        cityweather_core::TemperatureUnit::Fahrenheit => TemperatureUnit::Fahrenheit,
    }
}

impl AppServices {
    /// Open storage and build the weather client from configuration.
    pub fn from_config(config: Arc<Config>) -> Result<Self> {
        let kind = match config.storage.backend {
            StorageBackend::Sqlite => StoreKind::Sqlite,
            StorageBackend::Json => StoreKind::Json,
        };
        let store = FavoritesStore::open(kind, &config.storage_path())?;

        let unit = temperature_unit(config.weather.temperature_unit);
        let client = OpenMeteoClient::with_base_urls(
            &config.weather.geocoding_url,
            &config.weather.forecast_url,
            Duration::from_secs(config.weather.request_timeout_secs),
            unit,
        )?;
        tracing::info!(
            geocoding_url = %config.weather.geocoding_url,
            forecast_url = %config.weather.forecast_url,
            ?unit,
            "Weather client initialized"
        );

        Ok(Self::with_parts(config, store, Arc::new(client)))
    }

    /// Assemble from already-built parts.
    pub fn with_parts(
        config: Arc<Config>,
        store: FavoritesStore,
        lookup: Arc<dyn WeatherLookup>,
    ) -> Self {
        let unit = temperature_unit(config.weather.temperature_unit);
        Self {
            config,
            store,
            lookup,
            unit,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn favorites_store(&self) -> FavoritesStore {
        self.store.clone()
    }

    pub fn weather_lookup(&self) -> Arc<dyn WeatherLookup> {
        self.lookup.clone()
    }

    pub fn temperature_unit(&self) -> TemperatureUnit {
        self.unit
    }

    /// Favorites view model, cancelled on [`AppServices::shutdown`].
    pub fn favorites_model(&self) -> FavoritesModel {
        FavoritesModel::new(self.favorites_store(), self.weather_lookup())
            .with_lookup_timeout(Duration::from_secs(self.config.weather.request_timeout_secs))
            .with_cancellation(self.shutdown.child_token())
    }

    pub fn search_model(&self) -> SearchModel {
        SearchModel::new(self.favorites_store(), self.weather_lookup())
    }

    pub fn detail_model(&self) -> DetailModel {
        DetailModel::new(self.weather_lookup())
    }

    /// Signal application shutdown: cancels in-flight refreshes of every
    /// favorites model created here.
    pub fn shutdown(&self) {
        tracing::info!("AppServices shutdown initiated");
        self.shutdown.cancel();
    }
}
