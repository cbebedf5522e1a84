//! Retry logic with fixed-delay spacing
//!
//! Bounded retry for transient failures against the external services. The
//! only retried operation in a sweep is queue-entry deletion, which waits a
//! fixed delay between attempts (no backoff, no jitter).

use crate::config::RetryConfig;
use crate::error::Error;
use std::future::Future;

/// Trait for errors that can be classified as retryable or not
///
/// Transient failures (timeouts, connection resets, surprising status codes
/// from a service that usually answers) should return `true`. Permanent
/// failures (bad configuration, missing fields) should return `false`.
pub trait IsRetryable {
    /// Returns true if the error is transient and the operation should be retried
    fn is_retryable(&self) -> bool;
}

impl IsRetryable for Error {
    fn is_retryable(&self) -> bool {
        match self {
            Error::Network(e) => e.is_timeout() || e.is_connect(),
            // A non-2xx answer from a service that is reachable is worth
            // another attempt; the caller bounds how many.
            Error::UnexpectedStatus { .. } => true,
            Error::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::TimedOut
                    | std::io::ErrorKind::ConnectionRefused
                    | std::io::ErrorKind::ConnectionReset
                    | std::io::ErrorKind::ConnectionAborted
                    | std::io::ErrorKind::BrokenPipe
                    | std::io::ErrorKind::Interrupted
            ),
            Error::Config { .. }
            | Error::Rpc { .. }
            | Error::MalformedQueue(_)
            | Error::UnexpectedShape(_)
            | Error::MissingField { .. }
            | Error::Serialization(_) => false,
        }
    }
}

/// Execute an async operation up to `policy.max_attempts` times
///
/// Waits `policy.delay` between attempts and retries only errors whose
/// [`IsRetryable`] implementation says so. Returns the first success or the
/// last error once attempts are exhausted. `max_attempts` counts the initial
/// call, so `max_attempts: 3` makes at most three calls with two waits.
pub async fn call_with_retry<F, Fut, T, E>(
    policy: &RetryConfig,
    mut operation: F,
) -> std::result::Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
    E: IsRetryable + std::fmt::Display,
{
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    tracing::info!(attempts = attempt, "operation succeeded after retry");
                }
                return Ok(result);
            }
            Err(e) if e.is_retryable() && attempt < policy.max_attempts => {
                tracing::warn!(
                    error = %e,
                    attempt,
                    max_attempts = policy.max_attempts,
                    delay_ms = policy.delay.as_millis() as u64,
                    "operation failed, retrying"
                );
                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
            Err(e) => {
                if e.is_retryable() {
                    tracing::error!(
                        error = %e,
                        attempts = attempt,
                        "operation failed after all attempts exhausted"
                    );
                } else {
                    tracing::error!(error = %e, "operation failed with non-retryable error");
                }
                return Err(e);
            }
        }
    }
}
