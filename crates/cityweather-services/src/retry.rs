//! Retry utilities for storage reads with a bounded backoff.
//!
//! Only bulk reads go through this module. Writes are attempted once so a
//! failed insert or delete is never applied twice.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Saved-city list read: one retry after a fixed 500ms pause
pub const STORE_READ_MAX_RETRIES: u32 = 1;
pub const STORE_READ_DELAY_MS: u64 = 500;

/// Retry configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    pub max_retries: u32,
    /// Initial delay between retries (doubles each attempt)
    pub initial_delay: Duration,
    /// Maximum delay between retries
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::store_read()
    }
}

impl RetryConfig {
    /// Create a new retry config with custom settings
    pub fn new(max_retries: u32, initial_delay_ms: u64, max_delay_ms: u64) -> Self {
        Self {
            max_retries,
            initial_delay: Duration::from_millis(initial_delay_ms),
            max_delay: Duration::from_millis(max_delay_ms),
        }
    }

    /// Policy for listing saved cities
    pub fn store_read() -> Self {
        Self::new(STORE_READ_MAX_RETRIES, STORE_READ_DELAY_MS, STORE_READ_DELAY_MS)
    }

    /// Single attempt, no waiting
    pub fn none() -> Self {
        Self::new(0, 0, 0)
    }

    /// Calculate the delay for a given attempt number
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        // Exponential backoff: initial_delay * 2^attempt
        let factor = 2u64.saturating_pow(attempt);
        let delay_ms = (self.initial_delay.as_millis() as u64).saturating_mul(factor);
        let capped = delay_ms.min(self.max_delay.as_millis() as u64);
        Duration::from_millis(capped)
    }
}

/// Error classification for retry decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Should retry the operation
    Retry,
    /// Should not retry - permanent failure
    NoRetry,
}

/// Run `operation` until it succeeds, fails permanently, or retries run out.
///
/// `classify` decides whether an error is worth another attempt. The last
/// error is returned once retries are exhausted.
pub async fn with_retry<T, E, F, Fut, C>(
    config: &RetryConfig,
    mut operation: F,
    classify: C,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    C: Fn(&E) -> RetryDecision,
    E: Display,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    tracing::info!("Operation succeeded after {} retries", attempt);
                }
                return Ok(value);
            }
            Err(e) => {
                if classify(&e) == RetryDecision::NoRetry {
                    tracing::debug!("Non-retryable error: {}", e);
                    return Err(e);
                }
                if attempt >= config.max_retries {
                    tracing::warn!(
                        attempts = attempt + 1,
                        error = %e,
                        "All retry attempts exhausted"
                    );
                    return Err(e);
                }

                let delay = config.delay_for_attempt(attempt);
                tracing::warn!(
                    attempt = attempt + 1,
                    max_attempts = config.max_retries + 1,
                    error = %e,
                    "Retryable error, waiting {:?}",
                    delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
