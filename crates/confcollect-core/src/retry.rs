//! Retry with exponential backoff for HTTP fetches

use std::time::Duration;

use crate::http::{FetchError, get_text, http_config};

/// Exponential backoff: 2^attempt seconds (2s, 4s, 8s, ...)
pub const fn backoff_duration(attempt: u32) -> Duration {
    Duration::from_secs(2u64.pow(attempt))
}

/// Retry a fallible fetch with exponential backoff.
///
/// On retryable errors, logs the failure, sleeps, and retries up to
/// `max_retries` (from global [`HttpConfig`](crate::HttpConfig)).
///
/// Returns `Ok(T)` on first success, or the final `Err` on exhaustion / non-retryable error.
pub fn retry_with_backoff<T>(
    label: &str,
    attempt_fn: impl FnMut() -> Result<T, FetchError>,
) -> Result<T, FetchError> {
    retry_loop(
        label,
        http_config().max_retries,
        |attempt| std::thread::sleep(backoff_duration(attempt)),
        attempt_fn,
    )
}

/// HTTP GET with retry, see [`retry_with_backoff`].
pub fn get_with_retry(label: &str, url: &str) -> Result<String, FetchError> {
    retry_with_backoff(label, || get_text(url))
}

fn retry_loop<T>(
    label: &str,
    max_retries: u32,
    mut wait: impl FnMut(u32),
    mut attempt_fn: impl FnMut() -> Result<T, FetchError>,
) -> Result<T, FetchError> {
    let mut attempt = 0u32;
    loop {
        match attempt_fn() {
            Ok(v) => return Ok(v),
            Err(e) if attempt < max_retries && e.is_retryable() => {
                attempt += 1;
                log::warn!("{label}: attempt {attempt}/{max_retries} failed: {e}, retrying...");
                wait(attempt);
            }
            Err(e) => {
                log::error!("{label}: failed permanently: {e}");
                return Err(e);
            }
        }
    }
}
