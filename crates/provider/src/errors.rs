//! Error types shared across the provider crates, and the not-found classifier.
//!
//! [`ConfigError`] covers problems with the configuration itself; these are
//! surfaced immediately and never retried. [`HttpError`] is the structured
//! failure every API layer produces for a non-2xx response.
//!
//! [`is_not_found`] is the only place where failure *kind* is distinguished.
//! Every other error path treats failures as opaque and propagates them.

use std::error::Error as StdError;

use serde::Deserialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// The configuration cannot produce a usable request target.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The service URL is not an absolute URL.
    #[error("invalid service URL '{url}'")]
    InvalidUrl {
        /// The URL as configured.
        url: String,
        /// Parser failure.
        #[source]
        source: url::ParseError,
    },

    /// The service URL parsed but names no host.
    #[error("service URL '{url}' has no host")]
    MissingHost {
        /// The URL as configured.
        url: String,
    },

    /// Neither the call nor the client configuration supplied an organization.
    #[error("organization is required")]
    OrganizationRequired,
}

// ---------------------------------------------------------------------------
// HTTP status errors
// ---------------------------------------------------------------------------

/// A non-2xx response from the CircleCI API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("HTTP {status}{}", display_message(.message))]
pub struct HttpError {
    /// Response status code.
    pub status: u16,
    /// Error message reported by the service, the raw body text, or the
    /// status reason phrase when the body is empty.
    pub message: String,
}

fn display_message(message: &str) -> String {
    if message.is_empty() {
        String::new()
    } else {
        format!(": {message}")
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl HttpError {
    /// Creates an error from a status code and message.
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Creates an error from a response status and its raw body.
    ///
    /// CircleCI reports failures as `{"message": "..."}`; that message is used
    /// when present, otherwise the trimmed body text. A blank body yields
    /// `reason`, the canonical reason phrase of `status` if it has one.
    pub fn from_body(status: u16, reason: Option<&str>, body: &[u8]) -> Self {
        let message = match serde_json::from_slice::<ErrorBody>(body) {
            Ok(parsed) => parsed.message,
            Err(_) => String::from_utf8_lossy(body).trim().to_string(),
        };
        let message = if message.is_empty() {
            reason.unwrap_or_default().to_string()
        } else {
            message
        };
        Self { status, message }
    }

    /// Returns `true` if the service reported that the resource does not exist.
    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Returns `true` iff `err`, or any error in its `source()` chain, is an
/// [`HttpError`] with status 404.
///
/// The depth at which the [`HttpError`] sits does not matter, so callers may
/// add context layers freely before classifying.
pub fn is_not_found(err: &(dyn StdError + 'static)) -> bool {
    std::iter::successors(Some(err), |&e| e.source())
        .filter_map(|e| e.downcast_ref::<HttpError>())
        .any(HttpError::is_not_found)
}

/// Classifies the outcome of a call: `false` for `Ok`, [`is_not_found`] on the
/// error otherwise.
pub fn is_not_found_result<T, E>(result: &Result<T, E>) -> bool
where
    E: StdError + 'static,
{
    match result {
        Ok(_) => false,
        Err(err) => is_not_found(err),
    }
}
