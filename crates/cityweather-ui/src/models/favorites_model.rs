//! Saved-city list with live temperatures.
//!
//! A refresh reads the saved list, publishes it immediately with every entry
//! loading, then fans out one geocode + forecast lookup per city. Each result
//! is merged into the displayed list by id as soon as it arrives, so a slow or
//! failing city never holds back or disturbs its siblings.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use cityweather_services::{FavoritesStore, SavedCity};
use cityweather_weather::{WeatherError, WeatherLookup};

/// Upper bound on one city's geocode + forecast lookup
pub const LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// A saved city as displayed, with its temperature once known.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedCity {
    pub id: i64,
    pub city_name: String,
    /// None while loading, or when the lookup failed
    pub temperature: Option<f64>,
    pub is_loading: bool,
}

impl EnrichedCity {
    fn loading(city: SavedCity) -> Self {
        Self {
            id: city.id,
            city_name: city.city_name,
            temperature: None,
            is_loading: true,
        }
    }

    /// Text for the temperature column.
    pub fn temperature_label(&self, unit_symbol: &str) -> String {
        match (self.is_loading, self.temperature) {
            (true, _) => "Loading...".to_string(),
            (false, Some(t)) => format!("{:.1}{}", t, unit_symbol),
            (false, None) => "N/A".to_string(),
        }
    }
}

/// How a call to [`FavoritesModel::refresh`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Every lookup settled; `resolved` of `total` produced a temperature.
    Completed { total: usize, resolved: usize },
    /// Another refresh was already running.
    Skipped,
    /// The model was shut down mid-refresh.
    Cancelled,
}

/// Error type for favorites list operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FavoritesError {
    RemoveFailed(i64),
}

impl std::fmt::Display for FavoritesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FavoritesError::RemoveFailed(id) => write!(f, "Failed to remove saved city {}", id),
        }
    }
}

impl std::error::Error for FavoritesError {}

/// Clears the in-progress flag however the refresh future ends.
struct RefreshGuard<'a>(&'a AtomicBool);

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// View model for the saved-cities screen.
pub struct FavoritesModel {
    store: FavoritesStore,
    lookup: Arc<dyn WeatherLookup>,
    lookup_timeout: Duration,
    cities: watch::Sender<Vec<EnrichedCity>>,
    refreshing: AtomicBool,
    cancel: CancellationToken,
}

impl FavoritesModel {
    pub fn new(store: FavoritesStore, lookup: Arc<dyn WeatherLookup>) -> Self {
        let (cities, _) = watch::channel(Vec::new());
        Self {
            store,
            lookup,
            lookup_timeout: LOOKUP_TIMEOUT,
            cities,
            refreshing: AtomicBool::new(false),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    /// Tie this model's lifetime to an outer shutdown token.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Watch the displayed list. Every publish and merge notifies receivers.
    pub fn subscribe(&self) -> watch::Receiver<Vec<EnrichedCity>> {
        self.cities.subscribe()
    }

    /// Snapshot of the displayed list.
    pub fn cities(&self) -> Vec<EnrichedCity> {
        self.cities.borrow().clone()
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing.load(Ordering::Acquire)
    }

    /// Reload the saved list and fetch every city's temperature.
    ///
    /// Returns `Skipped` without touching storage or the network when a
    /// refresh is already running.
    pub async fn refresh(&self) -> RefreshOutcome {
        if self.cancel.is_cancelled() {
            return RefreshOutcome::Cancelled;
        }
        if self
            .refreshing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("Refresh already in progress, skipping");
            return RefreshOutcome::Skipped;
        }
        let _guard = RefreshGuard(&self.refreshing);

        let saved = self.store.list().await;
        let total = saved.len();
        tracing::info!(count = total, "Refreshing saved cities");

        self.cities
            .send_replace(saved.iter().cloned().map(EnrichedCity::loading).collect());

        let mut pending: FuturesUnordered<_> = saved
            .into_iter()
            .map(|city| {
                let lookup = self.lookup.clone();
                let timeout = self.lookup_timeout;
                async move {
                    let temperature =
                        lookup_with_timeout(lookup.as_ref(), &city.city_name, timeout).await;
                    (city.id, temperature)
                }
            })
            .collect();

        let mut resolved = 0;
        loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    tracing::info!("Refresh cancelled");
                    self.settle_loading();
                    return RefreshOutcome::Cancelled;
                }
                next = pending.next() => match next {
                    Some((id, temperature)) => {
                        if temperature.is_some() {
                            resolved += 1;
                        }
                        self.merge(id, temperature);
                    }
                    None => break,
                },
            }
        }

        tracing::info!(total, resolved, "Refresh complete");
        RefreshOutcome::Completed { total, resolved }
    }

    /// Delete a saved city. The entry leaves the displayed list only once
    /// storage confirms the delete.
    pub async fn remove(&self, id: i64) -> Result<(), FavoritesError> {
        if !self.store.remove(id).await {
            return Err(FavoritesError::RemoveFailed(id));
        }
        self.cities.send_modify(|cities| cities.retain(|c| c.id != id));
        Ok(())
    }

    /// Cancel any in-flight refresh and refuse new ones.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    fn merge(&self, id: i64, temperature: Option<f64>) {
        self.cities.send_modify(|cities| {
            // Entry may have been removed while its lookup was in flight
            if let Some(entry) = cities.iter_mut().find(|c| c.id == id) {
                entry.temperature = temperature;
                entry.is_loading = false;
            }
        });
    }

    fn settle_loading(&self) {
        self.cities.send_modify(|cities| {
            for entry in cities.iter_mut().filter(|c| c.is_loading) {
                entry.is_loading = false;
            }
        });
    }
}

impl std::fmt::Debug for FavoritesModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoritesModel")
            .field("lookup_timeout", &self.lookup_timeout)
            .field("refreshing", &self.is_refreshing())
            .field("cities", &*self.cities.borrow())
            .finish_non_exhaustive()
    }
}

async fn current_temperature(
    lookup: &dyn WeatherLookup,
    city_name: &str,
) -> Result<Option<f64>, WeatherError> {
    let Some(place) = lookup.best_match(city_name).await? else {
        return Ok(None);
    };
    let conditions = lookup.current(place.coordinates()).await?;
    Ok(Some(conditions.temperature))
}

/// One city's temperature, or None on no match, failure, or timeout.
async fn lookup_with_timeout(
    lookup: &dyn WeatherLookup,
    city_name: &str,
    timeout: Duration,
) -> Option<f64> {
    match tokio::time::timeout(timeout, current_temperature(lookup, city_name)).await {
        Ok(Ok(Some(temperature))) => Some(temperature),
        Ok(Ok(None)) => {
            tracing::warn!(city = %city_name, "No geocoding match for saved city");
            None
        }
        Ok(Err(e)) => {
            tracing::warn!(
                city = %city_name,
                error = %e,
                timed_out = e.is_timeout(),
                "Weather lookup failed"
            );
            None
        }
        Err(_) => {
            tracing::warn!(
                city = %city_name,
                timeout_ms = timeout.as_millis() as u64,
                "Weather lookup timed out"
            );
            None
        }
    }
}
