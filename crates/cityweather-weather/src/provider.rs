use crate::types::{Coordinates, CurrentConditions, TemperatureUnit, WeatherCondition, WeatherError};
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;
use url::Url;

pub const FORECAST_API_BASE: &str = "https://api.open-meteo.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

const USER_AGENT: &str = "CityWeather/0.1.0";
const CURRENT_FIELDS: &str =
    "temperature_2m,relative_humidity_2m,apparent_temperature,wind_speed_10m,weather_code";

/// Build the HTTP client shared by the Open-Meteo endpoints.
pub(crate) fn build_client(timeout: Duration) -> Result<Client, WeatherError> {
    Ok(Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()?)
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: Option<CurrentBlock>,
}

#[derive(Debug, Deserialize)]
struct CurrentBlock {
    temperature_2m: f64,
    #[serde(default)]
    apparent_temperature: Option<f64>,
    #[serde(default)]
    relative_humidity_2m: Option<f64>,
    #[serde(default)]
    wind_speed_10m: Option<f64>,
    #[serde(default)]
    weather_code: Option<i32>,
}

impl CurrentBlock {
    fn into_conditions(self, unit: TemperatureUnit) -> CurrentConditions {
        CurrentConditions {
            temperature: self.temperature_2m,
            apparent_temperature: self.apparent_temperature.unwrap_or(self.temperature_2m),
            humidity: self
                .relative_humidity_2m
                .map(|h| h.round().clamp(0.0, 100.0) as u8)
                .unwrap_or(0),
            wind_speed: self.wind_speed_10m.unwrap_or(0.0),
            condition: self
                .weather_code
                .map(WeatherCondition::from_wmo_code)
                .unwrap_or_default(),
            unit,
            fetched_at: Utc::now(),
        }
    }
}

/// Current-conditions client for the Open-Meteo forecast API.
#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    base_url: String,
    unit: TemperatureUnit,
}

impl WeatherProvider {
    pub fn new(unit: TemperatureUnit) -> Result<Self, WeatherError> {
        Self::with_base_url(
            FORECAST_API_BASE,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            unit,
        )
    }

    pub fn with_base_url(
        base_url: &str,
        timeout: Duration,
        unit: TemperatureUnit,
    ) -> Result<Self, WeatherError> {
        Ok(Self {
            client: Arc::new(build_client(timeout)?),
            base_url: base_url.trim_end_matches('/').to_string(),
            unit,
        })
    }

    pub fn unit(&self) -> TemperatureUnit {
        self.unit
    }

    /// Fetch current conditions at `coordinates`.
    #[instrument(skip(self), level = "debug")]
    pub async fn current(&self, coordinates: Coordinates) -> Result<CurrentConditions, WeatherError> {
        let latitude = coordinates.latitude.to_string();
        let longitude = coordinates.longitude.to_string();
        let mut params = vec![
            ("latitude", latitude.as_str()),
            ("longitude", longitude.as_str()),
            ("current", CURRENT_FIELDS),
        ];
        if self.unit == TemperatureUnit::Fahrenheit {
            params.push(("temperature_unit", "fahrenheit"));
        }

        let url = Url::parse_with_params(&format!("{}/v1/forecast", self.base_url), &params)
            .map_err(|e| WeatherError::InvalidUrl(e.to_string()))?;

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::debug!("Forecast returned status {}", status);
            return Err(WeatherError::Status {
                endpoint: "forecast",
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let parsed: ForecastResponse =
            serde_json::from_str(&body).map_err(|e| WeatherError::Parse(e.to_string()))?;

        let current = parsed
            .current
            .ok_or_else(|| WeatherError::Parse("response has no current block".to_string()))?;

        Ok(current.into_conditions(self.unit))
    }
}
