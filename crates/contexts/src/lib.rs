//! CircleCI context client.
//!
//! Contexts are organization-owned bundles of environment variables shared
//! between projects. [`ContextRestClient`] covers listing, lookup, creation,
//! and deletion of contexts and the upsert/delete of their variables.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Built from a [`ContextSettings`] bundle (host, endpoint
//! prefix, token, shared transport) and layered over [`rest::RestClient`], so
//! it inherits the token header, URL composition, and error mapping.

use provider::OwnerSlug;
use rest::RestError;
use thiserror::Error;

pub mod client;
pub mod models;

pub use client::{ContextRestClient, ContextSettings};
pub use models::{Context, EnvironmentVariable, Page};

/// A context operation failed.
#[derive(Debug, Error)]
pub enum ContextError {
    /// `host` in the settings is not an absolute URL.
    #[error("invalid context API host '{host}'")]
    InvalidHost {
        /// The host as configured.
        host: String,
        /// Parser failure.
        #[source]
        source: url::ParseError,
    },

    /// `host` uses a scheme other than `http` or `https`.
    #[error("unsupported scheme in context API host '{host}'")]
    UnsupportedScheme {
        /// The host as configured.
        host: String,
    },

    /// The underlying REST call failed.
    #[error("context API request failed")]
    Rest(#[from] RestError),

    /// No context with this name exists for the owner.
    #[error("no context named '{name}' owned by '{owner}'")]
    ContextNotFound {
        /// Owner that was searched.
        owner: OwnerSlug,
        /// Name that was looked up.
        name: String,
    },
}

impl ContextError {
    /// Returns `true` if the context or variable does not exist, whether the
    /// service answered 404 or a lookup by name found nothing.
    pub fn is_not_found(&self) -> bool {
        match self {
            ContextError::Rest(err) => err.is_not_found(),
            ContextError::ContextNotFound { .. } => true,
            _ => false,
        }
    }
}
