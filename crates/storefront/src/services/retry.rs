//! Fixed-attempt retry for outbound API calls.
//!
//! [`with_retry`] wraps a fallible async operation and retries it while the
//! error reports itself as transient through [`Retryable`]. Every Shopify and
//! geocoding call goes through here with the policy from configuration.

use std::future::Future;
use std::time::Duration;

use crate::config::RetryConfig;

/// Upper bound on a server-requested back-off (`Retry-After`).
pub const MAX_RETRY_AFTER: Duration = Duration::from_secs(5);

/// Errors that know whether another attempt might succeed.
pub trait Retryable: std::fmt::Display {
    /// Transport failures, timeouts, 5xx and 429 are retryable.
    fn is_retryable(&self) -> bool;

    /// Delay requested by the server, if any.
    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

/// Attempts and delay for [`with_retry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, at least 1.
    pub attempts: u32,
    /// Delay between attempts.
    pub delay: Duration,
}

impl RetryPolicy {
    /// A policy that never retries.
    pub const NONE: Self = Self {
        attempts: 1,
        delay: Duration::ZERO,
    };

    /// Create a policy. Zero attempts is treated as one.
    #[must_use]
    pub const fn new(attempts: u32, delay: Duration) -> Self {
        Self {
            attempts: if attempts == 0 { 1 } else { attempts },
            delay,
        }
    }

    fn delay_for<E: Retryable>(&self, err: &E) -> Duration {
        err.retry_after()
            .map_or(self.delay, |after| self.delay.max(after.min(MAX_RETRY_AFTER)))
    }
}

impl From<RetryConfig> for RetryPolicy {
    fn from(config: RetryConfig) -> Self {
        Self::new(config.attempts, config.delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryConfig::default().into()
    }
}

/// Run `operation` up to `policy.attempts` times.
///
/// Non-retryable errors are returned immediately; otherwise the last error
/// is returned once attempts run out.
///
/// # Errors
///
/// Returns the error of the final attempt.
pub async fn with_retry<T, E, F, Fut>(
    policy: RetryPolicy,
    operation_name: &str,
    mut operation: F,
) -> Result<T, E>
where
    E: Retryable,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 1u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !err.is_retryable() || attempt >= policy.attempts {
                    return Err(err);
                }
                let delay = policy.delay_for(&err);
                #[allow(clippy::cast_possible_truncation)] // capped well below u64::MAX
                let delay_ms = delay.as_millis() as u64;
                tracing::warn!(
                    operation = operation_name,
                    attempt,
                    max_attempts = policy.attempts,
                    delay_ms,
                    error = %err,
                    "Transient error, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
