//! Bounded retry with exponential backoff for direct calls.
//!
//! Transient transport failures (timeout, connection error) are retried up
//! to the configured attempt budget, sleeping `base * 2^attempt` between
//! attempts. Everything else propagates immediately.

use std::future::Future;
use std::time::Duration;

use zetesis_types::{Error, Result};

/// Outcome of a single attempt, as seen by the retry loop.
pub(crate) enum AttemptError {
    /// Worth retrying: timeout, connection refused, and the like.
    Transient(String),
    /// Not worth retrying: mapped status errors, decode failures.
    Fatal(Error),
}

/// Classify a transport error from reqwest.
pub(crate) fn classify(err: reqwest::Error) -> AttemptError {
    if err.is_timeout() || err.is_connect() {
        AttemptError::Transient(err.to_string())
    } else {
        AttemptError::Fatal(Error::Network(err.to_string()))
    }
}

pub(crate) fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base * 2u32.saturating_pow(attempt)
}

fn exhausted(max_attempts: u32, cause: String) -> Error {
    Error::Network(format!(
        "max retries exceeded after {max_attempts} attempts: {cause}"
    ))
}

/// Run `attempt` up to `max_attempts` times, sleeping between transient
/// failures. The attempt index (0-based) is passed in for logging.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_attempts: u32,
    base_delay: Duration,
    mut attempt: F,
) -> Result<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = std::result::Result<T, AttemptError>>,
{
    let mut attempt_no = 0;
    loop {
        match attempt(attempt_no).await {
            Ok(value) => return Ok(value),
            Err(AttemptError::Fatal(err)) => return Err(err),
            Err(AttemptError::Transient(cause)) => {
                if attempt_no + 1 >= max_attempts {
                    return Err(exhausted(max_attempts, cause));
                }
                let delay = backoff_delay(base_delay, attempt_no);
                tracing::debug!(
                    attempt = attempt_no,
                    delay_ms = delay.as_millis() as u64,
                    %cause,
                    "transient failure, backing off"
                );
                tokio::time::sleep(delay).await;
                attempt_no += 1;
            }
        }
    }
}

/// Blocking twin of [`retry_with_backoff`].
pub(crate) fn retry_with_backoff_blocking<T, F>(
    max_attempts: u32,
    base_delay: Duration,
    mut attempt: F,
) -> Result<T>
where
    F: FnMut(u32) -> std::result::Result<T, AttemptError>,
{
    let mut attempt_no = 0;
    loop {
        match attempt(attempt_no) {
            Ok(value) => return Ok(value),
            Err(AttemptError::Fatal(err)) => return Err(err),
            Err(AttemptError::Transient(cause)) => {
                if attempt_no + 1 >= max_attempts {
                    return Err(exhausted(max_attempts, cause));
                }
                let delay = backoff_delay(base_delay, attempt_no);
                tracing::debug!(
                    attempt = attempt_no,
                    delay_ms = delay.as_millis() as u64,
                    %cause,
                    "transient failure, backing off"
                );
                std::thread::sleep(delay);
                attempt_no += 1;
            }
        }
    }
}
