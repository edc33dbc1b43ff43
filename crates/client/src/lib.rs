//! CircleCI provider client.
//!
//! [`Client`] is built once per provider configuration block and handed to
//! every resource handler. It owns the two API sub-clients (generic REST and
//! contexts), both dispatching through one shared resilient transport, plus the
//! VCS identifier and default organization used to route requests.
//!
//! ```no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use client::{Client, ClientConfig};
//!
//! let client = Client::new(
//!     ClientConfig::new("https://circleci.com/api/v2/", "token").with_organization("acme"),
//! )?;
//! let slug = client.slug("", "widgets")?; // "github/acme/widgets"
//! let owner = client.owner("")?;
//!
//! match client.contexts().context_by_name(&owner, "deploy").await {
//!     Ok(context) => println!("{}", context.id),
//!     Err(err) if err.is_not_found() => println!("{slug} has no deploy context"),
//!     Err(err) => return Err(err.into()),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architectural Layer
//!
//! **Composition.** No policy of its own beyond wiring; organization
//! precedence and slug formatting come from [`provider`].

use std::sync::Arc;

use contexts::{ContextError, ContextRestClient, ContextSettings};
use provider::{build_slug, resolve_organization, ServiceUrl};
use rest::{RestClient, RestError};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::info;
use transport::{Transport, TransportError};

pub use provider::{
    is_not_found, is_not_found_result, ClientConfig, ConfigError, HttpError, OwnerSlug,
    ProjectSlug, DEFAULT_URL, DEFAULT_VCS,
};

/// The client could not be constructed.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The configuration is unusable (e.g. the URL does not parse).
    #[error("invalid client configuration")]
    Config(#[from] ConfigError),

    /// The HTTP transport could not be initialised.
    #[error("failed to build HTTP transport")]
    Transport(#[from] TransportError),

    /// The context sub-client rejected its settings.
    #[error("failed to build context client")]
    Contexts(#[from] ContextError),

    /// The REST sub-client rejected its settings.
    #[error("failed to build REST client")]
    Rest(#[from] RestError),
}

/// Immutable, fully wired access to the CircleCI API.
///
/// Holds no mutable state, so one instance may be shared freely between
/// concurrently running resource handlers.
#[derive(Debug, Clone)]
pub struct Client {
    rest: RestClient,
    contexts: ContextRestClient,
    vcs: String,
    organization: String,
}

impl Client {
    /// Builds a client with the default resilient transport.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Config`] if `config.url` is not an absolute URL with a host.
    /// - [`ClientError::Transport`] if the HTTP client cannot be initialised.
    /// - [`ClientError::Contexts`] / [`ClientError::Rest`] if a sub-client
    ///   rejects its settings.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let url = ServiceUrl::parse(&config.url)?;
        let http_client: Arc<dyn Transport> = Arc::new(transport::resilient()?);
        Self::assemble(config, &url, http_client)
    }

    /// Builds a client dispatching through `http_client`.
    ///
    /// # Errors
    ///
    /// As [`Client::new`], except that no transport is built.
    pub fn with_transport(
        config: ClientConfig,
        http_client: Arc<dyn Transport>,
    ) -> Result<Self, ClientError> {
        let url = ServiceUrl::parse(&config.url)?;
        Self::assemble(config, &url, http_client)
    }

    fn assemble(
        config: ClientConfig,
        url: &ServiceUrl,
        http_client: Arc<dyn Transport>,
    ) -> Result<Self, ClientError> {
        let contexts = ContextRestClient::new(ContextSettings {
            host: url.host().to_string(),
            rest_endpoint: url.path().to_string(),
            token: SecretString::from(config.token.expose_secret().to_owned()),
            http_client: Arc::clone(&http_client),
        })?;

        let rest = RestClient::with_transport(url.root(), url.path(), &config.token, http_client)?;

        let organization = config.default_organization().unwrap_or_default().to_string();
        info!(
            host = url.host(),
            endpoint = url.path(),
            vcs = %config.vcs,
            organization = %organization,
            "initialised CircleCI client"
        );

        Ok(Self {
            rest,
            contexts,
            vcs: config.vcs,
            organization,
        })
    }

    /// Returns the organization a call targets: `org` if non-empty, otherwise
    /// the configured default.
    ///
    /// # Errors
    ///
    /// [`ConfigError::OrganizationRequired`] if neither is set.
    pub fn organization<'a>(&'a self, org: &'a str) -> Result<&'a str, ConfigError> {
        resolve_organization(org, &self.organization)
    }

    /// Returns `<vcs>/<organization>/<project>`, resolving the organization as
    /// [`Client::organization`] does.
    ///
    /// # Errors
    ///
    /// Propagates [`ConfigError::OrganizationRequired`] unchanged.
    pub fn slug(&self, org: &str, project: &str) -> Result<ProjectSlug, ConfigError> {
        let organization = self.organization(org)?;
        Ok(build_slug(&self.vcs, organization, project))
    }

    /// Returns `<vcs>/<organization>` for organization-owned resources.
    ///
    /// # Errors
    ///
    /// Propagates [`ConfigError::OrganizationRequired`] unchanged.
    pub fn owner(&self, org: &str) -> Result<OwnerSlug, ConfigError> {
        let organization = self.organization(org)?;
        Ok(OwnerSlug::from_parts(&self.vcs, organization))
    }

    /// Generic REST sub-client.
    pub fn rest(&self) -> &RestClient {
        &self.rest
    }

    /// Context sub-client.
    pub fn contexts(&self) -> &ContextRestClient {
        &self.contexts
    }

    /// VCS identifier used as the first slug segment.
    pub fn vcs(&self) -> &str {
        &self.vcs
    }

    /// Configured default organization, if any.
    pub fn default_organization(&self) -> Option<&str> {
        Some(self.organization.as_str()).filter(|o| !o.is_empty())
    }
}
