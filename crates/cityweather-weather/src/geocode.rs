//! Forward geocoding: resolve a free-text city name to coordinates.
//! Uses the Open-Meteo geocoding API - free, no API key required.

use crate::provider::build_client;
use crate::types::{GeocodingResult, WeatherError};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::instrument;
use url::Url;

pub const GEOCODING_API_BASE: &str = "https://geocoding-api.open-meteo.com";

/// Number of candidates the search view asks for
pub const SEARCH_RESULT_COUNT: u8 = 5;

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    // Omitted entirely when nothing matches
    #[serde(default)]
    results: Option<Vec<GeocodingResult>>,
}

#[derive(Debug, Clone)]
pub struct Geocoder {
    client: Client,
    base_url: String,
}

impl Geocoder {
    pub fn new(timeout: Duration) -> Result<Self, WeatherError> {
        Self::with_base_url(GEOCODING_API_BASE, timeout)
    }

    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, WeatherError> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Search for up to `count` places matching `name`.
    ///
    /// A blank name or an empty result set is `Ok(vec![])`, not an error.
    #[instrument(skip(self), level = "debug")]
    pub async fn search(&self, name: &str, count: u8) -> Result<Vec<GeocodingResult>, WeatherError> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(Vec::new());
        }

        let count = count.max(1).to_string();
        let url = Url::parse_with_params(
            &format!("{}/v1/search", self.base_url),
            &[
                ("name", name),
                ("count", count.as_str()),
                ("language", "en"),
                ("format", "json"),
            ],
        )
        .map_err(|e| WeatherError::InvalidUrl(e.to_string()))?;

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::debug!("Geocoding returned status {}", status);
            return Err(WeatherError::Status {
                endpoint: "geocoding",
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let parsed: GeocodingResponse =
            serde_json::from_str(&body).map_err(|e| WeatherError::Parse(e.to_string()))?;

        let results = parsed.results.unwrap_or_default();
        tracing::debug!("Geocoded '{}' to {} result(s)", name, results.len());
        Ok(results)
    }

    /// Best single match for `name`, if any.
    pub async fn best_match(&self, name: &str) -> Result<Option<GeocodingResult>, WeatherError> {
        Ok(self.search(name, 1).await?.into_iter().next())
    }
}
