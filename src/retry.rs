//! Bounded retry of provider calls.
//!
//! Only errors flagged transient by [`TranslatorError::is_transient`] (network
//! failures, HTTP 429/5xx, undecodable bodies) get another attempt. Rejected
//! credentials and other client errors are returned at once.

use crate::error::{Result, TranslatorError};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// How often and how patiently a provider call is repeated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Total attempts, the first call included. Zero behaves like one.
    pub attempts: u32,
    /// Wait before the second attempt; doubles for each one after.
    pub first_delay: Duration,
    /// Upper bound for a single wait.
    pub max_delay: Duration,
}

impl RetryConfig {
    pub fn new(attempts: u32, first_delay: Duration) -> Self {
        Self {
            attempts,
            first_delay,
            max_delay: first_delay.saturating_mul(4),
        }
    }

    /// Three attempts, waiting 1s then 2s, never more than 5s.
    pub fn provider_call() -> Self {
        Self {
            attempts: 3,
            first_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(5),
        }
    }

    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Wait before retry number `retry` (1 for the second attempt).
    fn backoff(&self, retry: u32) -> Duration {
        let factor = 2u32.checked_pow(retry.saturating_sub(1)).unwrap_or(u32::MAX);
        self.first_delay.saturating_mul(factor).min(self.max_delay)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::provider_call()
    }
}

/// Run `call` until it succeeds, fails with a non-transient error, or the
/// attempts run out. The last error is returned.
pub async fn retry_transient<T, F, Fut>(
    config: &RetryConfig,
    operation: &str,
    mut call: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let attempts = config.attempts.max(1);
    let mut attempt = 1;

    loop {
        let error: TranslatorError = match call().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!("{} succeeded on attempt {}/{}", operation, attempt, attempts);
                }
                return Ok(value);
            }
            Err(error) => error,
        };

        if !error.is_transient() {
            debug!("{} failed permanently: {}", operation, error);
            return Err(error);
        }
        if attempt >= attempts {
            warn!("{} gave up after {} attempt(s): {}", operation, attempts, error);
            return Err(error);
        }

        let delay = config.backoff(attempt);
        warn!(
            "{} failed (attempt {}/{}), retrying in {:?}: {}",
            operation, attempt, attempts, delay, error
        );
        sleep(delay).await;
        attempt += 1;
    }
}
