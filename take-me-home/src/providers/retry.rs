//! Exponential backoff for provider requests.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use super::ProviderError;

/// Default number of retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default base delay.
pub const DEFAULT_BACKOFF: Duration = Duration::from_millis(500);

/// Retry budget and backoff schedule.
///
/// The delay before retry `n` (0-based) is `backoff * 2^n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            backoff: DEFAULT_BACKOFF,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, backoff: Duration) -> Self {
        Self {
            max_retries,
            backoff,
        }
    }

    /// Policy that makes a single attempt.
    pub fn none() -> Self {
        Self::new(0, Duration::ZERO)
    }

    /// Delay before the retry following failed attempt `attempt`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.backoff.saturating_mul(2u32.saturating_pow(attempt))
    }

    /// Run `request` until it succeeds, fails terminally, or the budget runs out.
    ///
    /// # Errors
    ///
    /// Terminal errors are returned as-is on first occurrence. A retriable
    /// error on the final attempt becomes `ProviderError::RetriesExhausted`.
    pub async fn run<T, F, Fut>(&self, operation: &str, mut request: F) -> Result<T, ProviderError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        let mut attempt = 0;
        loop {
            match request().await {
                Ok(value) => {
                    if attempt > 0 {
                        debug!(operation, attempts = attempt + 1, "Request succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(error) if !error.is_retriable() => return Err(error),
                Err(error) if attempt >= self.max_retries => {
                    warn!(operation, attempts = attempt + 1, error = %error, "Retry budget exhausted");
                    return Err(ProviderError::RetriesExhausted {
                        attempts: attempt + 1,
                        last: Box::new(error),
                    });
                }
                Err(error) => {
                    let delay = self.delay_for(attempt);
                    debug!(
                        operation,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "Retrying request"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
