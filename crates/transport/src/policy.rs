//! Retry policy: how long to wait, how often to try, and what to retry.
//!
//! The defaults are fixed for the provider: waits between 800ms and 1200ms
//! scaled linearly by attempt number, at most 4 retries (5 attempts).

use std::time::Duration;

use rand::Rng;
use reqwest::{Response, StatusCode};

use crate::TransportError;

/// Lower bound of the per-attempt wait before scaling.
pub const DEFAULT_WAIT_MIN: Duration = Duration::from_millis(800);

/// Upper bound of the per-attempt wait before scaling.
pub const DEFAULT_WAIT_MAX: Duration = Duration::from_millis(1200);

/// Retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 4;

/// Computes the wait before retry `attempt` (0-based) from the policy bounds.
pub type BackoffFn = fn(min: Duration, max: Duration, attempt: u32) -> Duration;

/// Retry schedule for a [`RetryTransport`](crate::RetryTransport).
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Lower wait bound passed to `backoff`.
    pub wait_min: Duration,
    /// Upper wait bound passed to `backoff`.
    pub wait_max: Duration,
    /// Retries after the first attempt; `0` disables retrying.
    pub max_retries: u32,
    /// Delay curve.
    pub backoff: BackoffFn,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            wait_min: DEFAULT_WAIT_MIN,
            wait_max: DEFAULT_WAIT_MAX,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff: linear_jitter_backoff,
        }
    }
}

impl RetryPolicy {
    /// Sets the wait bounds.
    #[must_use]
    pub fn with_wait(mut self, min: Duration, max: Duration) -> Self {
        self.wait_min = min;
        self.wait_max = max;
        self
    }

    /// Sets the retry ceiling.
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Replaces the delay curve.
    #[must_use]
    pub fn with_backoff(mut self, backoff: BackoffFn) -> Self {
        self.backoff = backoff;
        self
    }

    /// Wait before retry `attempt` (0-based).
    pub fn delay(&self, attempt: u32) -> Duration {
        (self.backoff)(self.wait_min, self.wait_max, attempt)
    }
}

/// Linear backoff with jitter.
///
/// Picks a uniformly random wait in `[min, max)` and multiplies it by
/// `attempt + 1`. When `max <= min` there is no jitter and the wait is
/// `min * (attempt + 1)`.
pub fn linear_jitter_backoff(min: Duration, max: Duration, attempt: u32) -> Duration {
    let multiplier = attempt.saturating_add(1);
    if max <= min {
        return min.saturating_mul(multiplier);
    }

    let span = u64::try_from((max - min).as_nanos()).unwrap_or(u64::MAX);
    let jitter = rand::thread_rng().gen_range(0..span);
    (min + Duration::from_nanos(jitter)).saturating_mul(multiplier)
}

/// Returns `true` if a response with this status may succeed on retry:
/// 429, and every 5xx except 501.
pub fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS
        || (status.is_server_error() && status != StatusCode::NOT_IMPLEMENTED)
}

/// Default retry predicate.
///
/// Transport failures are retried unless the request itself is malformed or
/// redirects could not be followed; those fail the same way every time.
/// Responses are retried only for [`is_retryable_status`]; any other
/// application-level answer is definitive.
pub fn should_retry(outcome: &Result<Response, TransportError>) -> bool {
    match outcome {
        Ok(response) => is_retryable_status(response.status()),
        Err(TransportError::Request(err)) => !(err.is_builder() || err.is_redirect()),
        Err(TransportError::Build(_)) => false,
    }
}
