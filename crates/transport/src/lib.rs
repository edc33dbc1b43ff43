//! Resilient HTTP transport for the CircleCI API clients.
//!
//! The [`Transport`] trait is the execution seam every API client dispatches
//! through. Implementations compose: [`RetryTransport`] wraps *any*
//! [`Transport`] and adds bounded linear-jitter retries, and
//! [`ReqwestTransport`] is the base that performs the network I/O.
//!
//! ```text
//! RestClient ──┐
//!              ├──► Arc<dyn Transport> = RetryTransport<ReqwestTransport>
//! ContextClient┘
//! ```
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Connection pooling, retry scheduling, and the retry
//! predicate live here. Request construction and response decoding belong to
//! the API clients.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Request, Response};
use thiserror::Error;

pub mod base;
pub mod policy;
pub mod retry;

pub use base::ReqwestTransport;
pub use policy::{
    is_retryable_status, linear_jitter_backoff, should_retry, BackoffFn, RetryPolicy,
    DEFAULT_MAX_RETRIES, DEFAULT_WAIT_MAX, DEFAULT_WAIT_MIN,
};
pub use retry::RetryTransport;

// Re-export the request/response types so API clients name one crate.
pub use reqwest::{Body, Method, StatusCode, Url};

/// A request could not be executed.
///
/// Non-2xx responses are *not* transport errors; they arrive as a
/// [`Response`] and are classified by the caller.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The underlying HTTP client could not be constructed.
    #[error("failed to build HTTP client")]
    Build(#[source] reqwest::Error),

    /// The request failed before a response was received (connection refused,
    /// timeout, TLS failure, redirect loop, ...).
    #[error("HTTP request failed")]
    Request(#[from] reqwest::Error),
}

/// Executes one HTTP request.
///
/// Implementations must be safe to share between tasks; a single transport
/// backs every API client of a provider instance.
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    /// Sends `request` and returns the response, whatever its status.
    async fn execute(&self, request: Request) -> Result<Response, TransportError>;
}

#[async_trait]
impl<T> Transport for Arc<T>
where
    T: Transport + ?Sized,
{
    async fn execute(&self, request: Request) -> Result<Response, TransportError> {
        (**self).execute(request).await
    }
}

/// Builds the transport used by the provider: a pooled reqwest base wrapped in
/// a [`RetryTransport`] with the default [`RetryPolicy`].
///
/// # Errors
///
/// [`TransportError::Build`] if the HTTP client cannot be initialised.
pub fn resilient() -> Result<RetryTransport<ReqwestTransport>, TransportError> {
    Ok(RetryTransport::new(ReqwestTransport::new()?, RetryPolicy::default()))
}
