//! Fixed-delay retry for backend calls

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// How many times to run an operation and how long to wait between runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Same delay, different attempt budget
    pub fn with_max_attempts(self, max_attempts: u32) -> Self {
        Self::new(max_attempts, self.delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(2000))
    }
}

/// Errors that know whether another attempt could succeed
pub trait Retryable {
    fn is_retryable(&self) -> bool;
}

/// Run `operation` until it succeeds, fails with a non-retryable error, or
/// `policy.max_attempts` is used up. Waits `policy.delay` between attempts.
///
/// The error of the last attempt made is returned.
pub async fn with_retry<F, Fut, T, E>(policy: &RetryPolicy, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable + Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if !err.is_retryable() => {
                tracing::warn!(attempt, "Not retrying: {}", err);
                return Err(err);
            }
            Err(err) if attempt >= max_attempts => {
                tracing::warn!(attempt, max_attempts, "Giving up: {}", err);
                return Err(err);
            }
            Err(err) => {
                tracing::warn!(
                    attempt,
                    max_attempts,
                    delay_ms = policy.delay.as_millis() as u64,
                    "Attempt failed, retrying: {}",
                    err
                );
                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
        }
    }
}
