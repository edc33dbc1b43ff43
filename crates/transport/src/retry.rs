//! Retry decorator over any [`Transport`].

use async_trait::async_trait;
use reqwest::{Request, Response};

use crate::policy::{should_retry, RetryPolicy};
use crate::{Transport, TransportError};

/// Retries transient failures of the wrapped transport.
///
/// Each attempt sends a fresh clone of the request; a request whose body
/// cannot be cloned is sent exactly once. When the retry ceiling is reached
/// the last outcome is returned unchanged: the last response (so callers see
/// its status) or the last transport error.
///
/// Retry attempts are not logged.
#[derive(Debug, Clone)]
pub struct RetryTransport<T> {
    inner: T,
    policy: RetryPolicy,
}

impl<T: Transport> RetryTransport<T> {
    /// Wraps `inner` with `policy`.
    pub fn new(inner: T, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    /// Returns the active policy.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Returns the wrapped transport.
    pub fn inner(&self) -> &T {
        &self.inner
    }
}

#[async_trait]
impl<T: Transport> Transport for RetryTransport<T> {
    async fn execute(&self, request: Request) -> Result<Response, TransportError> {
        let mut attempt: u32 = 0;
        loop {
            let Some(this_try) = request.try_clone() else {
                return self.inner.execute(request).await;
            };

            let outcome = self.inner.execute(this_try).await;
            if attempt >= self.policy.max_retries || !should_retry(&outcome) {
                return outcome;
            }

            tokio::time::sleep(self.policy.delay(attempt)).await;
            attempt += 1;
        }
    }
}
