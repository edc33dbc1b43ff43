//! Construction input for the provider client.
//!
//! [`ClientConfig`] is what a provider configuration block resolves to.
//! [`ServiceUrl`] splits the configured URL into a transport root
//! (`scheme://host[:port]`) and an endpoint prefix (the path), so the same
//! host can serve API surfaces rooted at different paths.

use secrecy::SecretString;
use url::Url;

use crate::ConfigError;

/// Service URL used when none is configured.
pub const DEFAULT_URL: &str = "https://circleci.com/api/v2/";

/// VCS identifier used when none is configured.
pub const DEFAULT_VCS: &str = "github";

/// Connection settings for one provider configuration block.
///
/// Consumed once by the client constructor; only the fields the client needs
/// are copied out of it.
#[derive(Debug)]
pub struct ClientConfig {
    /// Absolute service URL, e.g. `https://circleci.com/api/v2/`.
    pub url: String,
    /// API token sent with every request.
    pub token: SecretString,
    /// VCS identifier used as the first slug segment (e.g. `"github"`).
    pub vcs: String,
    /// Default organization. `None` and `Some("")` both mean "not configured".
    pub organization: Option<String>,
}

impl ClientConfig {
    /// Creates a configuration with the default VCS and no default organization.
    pub fn new(url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            token: SecretString::from(token.into()),
            vcs: DEFAULT_VCS.to_string(),
            organization: None,
        }
    }

    /// Sets the VCS identifier.
    #[must_use]
    pub fn with_vcs(mut self, vcs: impl Into<String>) -> Self {
        self.vcs = vcs.into();
        self
    }

    /// Sets the default organization.
    #[must_use]
    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    /// Returns the default organization, treating an empty string as absent.
    pub fn default_organization(&self) -> Option<&str> {
        self.organization.as_deref().filter(|o| !o.is_empty())
    }
}

/// A parsed service URL split into transport root and endpoint prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceUrl {
    root: Url,
    path: String,
}

impl ServiceUrl {
    /// Parses an absolute URL.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidUrl`] if `raw` is not an absolute URL (this
    ///   includes the empty string and strings without a scheme).
    /// - [`ConfigError::MissingHost`] if the URL has no host component.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let parsed = Url::parse(raw).map_err(|source| ConfigError::InvalidUrl {
            url: raw.to_string(),
            source,
        })?;

        let host = parsed
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| ConfigError::MissingHost {
                url: raw.to_string(),
            })?;

        let authority = match parsed.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };

        let root = Url::parse(&format!("{}://{authority}", parsed.scheme())).map_err(|source| {
            ConfigError::InvalidUrl {
                url: raw.to_string(),
                source,
            }
        })?;

        Ok(Self {
            root,
            path: parsed.path().to_string(),
        })
    }

    /// Returns the transport root (`scheme://host[:port]/`).
    pub fn root(&self) -> &Url {
        &self.root
    }

    /// Returns the transport root without its trailing `/`.
    pub fn host(&self) -> &str {
        self.root.as_str().trim_end_matches('/')
    }

    /// Returns the endpoint prefix (the path component of the configured URL).
    pub fn path(&self) -> &str {
        &self.path
    }
}
