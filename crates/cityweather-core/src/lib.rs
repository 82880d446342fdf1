pub mod app;
pub mod config;
pub mod error;

pub use app::App;
pub use config::{
    Config, StorageBackend, StorageConfig, TemperatureUnit, ValidationResult, WeatherConfig,
};
pub use error::{AppError, ConfigError, FavoritesError, WeatherError};

use anyhow::Result;

/// Initialize the core application
pub fn init() -> Result<()> {
    // Initialize tracing/logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    tracing::info!("CityWeather core initialized");
    Ok(())
}
