//! Bounded exponential back-off for rate-limited collaborator calls.
//!
//! [`retry_with_backoff`] retries only errors for which
//! [`is_retriable`](crate::error::is_retriable) holds. Everything else is
//! returned on the first failure so the caller can fall back immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::{is_retriable, SentimentError};

/// Largest exponent applied to the back-off unit.
const MAX_EXPONENT: u32 = 10;

/// How many times to try and how long the back-off unit is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. `0` is treated as `1`.
    pub max_attempts: u32,
    /// Back-off unit; a sleep of `unit * 2^attempt` follows failed attempt `attempt`.
    pub backoff_unit: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_unit: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Delay after the `attempt`-th failed attempt (1-based).
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.backoff_unit
            .saturating_mul(1u32 << attempt.min(MAX_EXPONENT))
    }
}

/// Runs `operation` until it succeeds, fails with a non-retriable error, or
/// `policy.max_attempts` attempts have been made.
///
/// With the default policy a rate-limited call sleeps 2 s, then 4 s, and the
/// third failure is returned without a trailing sleep.
///
/// # Errors
///
/// Returns the last error produced by `operation`.
pub async fn retry_with_backoff<T, F, Fut>(
    policy: RetryPolicy,
    source_name: &str,
    mut operation: F,
) -> Result<T, SentimentError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, SentimentError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_attempts {
                    return Err(err);
                }
                let delay = policy.delay_for(attempt);
                tracing::warn!(
                    source = source_name,
                    attempt,
                    max_attempts,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %err,
                    "rate limited, retrying after back-off"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
