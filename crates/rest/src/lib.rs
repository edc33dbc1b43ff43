//! Generic CircleCI REST client.
//!
//! [`RestClient`] issues authenticated JSON requests against
//! `<root><endpoint>/<path>` through a shared [`transport::Transport`] and maps
//! every non-2xx response to a [`provider::HttpError`]. Resource-specific
//! clients (see the `contexts` crate) are thin layers over it.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Header construction, URL composition, and JSON
//! encoding/decoding live here. Retrying belongs to the transport.

use provider::HttpError;
use thiserror::Error;
use transport::TransportError;

pub mod client;

pub use client::{RestClient, TOKEN_HEADER, USER_AGENT};

/// A REST call failed.
///
/// Every wrapping variant exposes the wrapped error through `source()`, so
/// [`provider::is_not_found`] sees an [`HttpError`] at any depth.
#[derive(Debug, Error)]
pub enum RestError {
    /// The token contains bytes that are not valid in an HTTP header.
    #[error("API token is not a valid header value")]
    InvalidToken(#[source] reqwest::header::InvalidHeaderValue),

    /// The resource path could not be joined onto the base URL.
    #[error("invalid request path '{path}'")]
    InvalidPath {
        /// The path as supplied by the caller.
        path: String,
        /// URL join failure.
        #[source]
        source: url::ParseError,
    },

    /// The request body could not be serialised.
    #[error("failed to encode request body")]
    Encode(#[source] serde_json::Error),

    /// The request never produced a response.
    #[error("failed to send request")]
    Transport(#[from] TransportError),

    /// The response body could not be read.
    #[error("failed to read response body")]
    Body(#[source] reqwest::Error),

    /// The service answered with a non-2xx status.
    #[error("API request failed with status {}", .0.status)]
    Http(#[from] HttpError),

    /// A 2xx response body did not match the expected shape.
    #[error("failed to decode response body")]
    Decode(#[source] serde_json::Error),
}

impl RestError {
    /// Returns the HTTP status for [`RestError::Http`].
    pub fn status(&self) -> Option<u16> {
        match self {
            RestError::Http(err) => Some(err.status),
            _ => None,
        }
    }

    /// Returns `true` if the service reported that the resource does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, RestError::Http(err) if err.is_not_found())
    }
}
