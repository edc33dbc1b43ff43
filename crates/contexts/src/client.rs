//! [`ContextRestClient`] and its construction settings.

use std::sync::Arc;

use provider::OwnerSlug;
use rest::RestClient;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use transport::Transport;
use url::Url;

use crate::models::{NewContext, NewContextOwner, VariableValue};
use crate::{Context, ContextError, EnvironmentVariable, Page};

const OWNER_TYPE_ORGANIZATION: &str = "organization";

/// Everything needed to build a [`ContextRestClient`].
#[derive(Debug)]
pub struct ContextSettings {
    /// Transport root, `scheme://host[:port]`.
    pub host: String,
    /// Endpoint prefix, e.g. `/api/v2`.
    pub rest_endpoint: String,
    /// API token.
    pub token: SecretString,
    /// Transport every request is dispatched through.
    pub http_client: Arc<dyn Transport>,
}

/// Context and context-variable operations.
#[derive(Debug, Clone)]
pub struct ContextRestClient {
    rest: RestClient,
}

impl ContextRestClient {
    /// Validates `settings` and builds the client.
    ///
    /// # Errors
    ///
    /// - [`ContextError::InvalidHost`] / [`ContextError::UnsupportedScheme`]
    ///   if `host` is not an absolute `http`/`https` URL.
    /// - [`ContextError::Rest`] if the token is not a valid header value.
    pub fn new(settings: ContextSettings) -> Result<Self, ContextError> {
        let host = Url::parse(&settings.host).map_err(|source| ContextError::InvalidHost {
            host: settings.host.clone(),
            source,
        })?;
        if !matches!(host.scheme(), "http" | "https") {
            return Err(ContextError::UnsupportedScheme {
                host: settings.host,
            });
        }

        let rest = RestClient::with_transport(
            &host,
            &settings.rest_endpoint,
            &settings.token,
            settings.http_client,
        )?;
        Ok(Self { rest })
    }

    /// Lists every context owned by `owner`, following pagination.
    pub async fn contexts(&self, owner: &OwnerSlug) -> Result<Vec<Context>, ContextError> {
        self.collect_pages("context", &[("owner-slug", owner.as_str())])
            .await
    }

    /// Fetches a context by id.
    pub async fn context(&self, id: &str) -> Result<Context, ContextError> {
        Ok(self.rest.get(&format!("context/{id}")).await?)
    }

    /// Finds the context named `name` owned by `owner`.
    ///
    /// # Errors
    ///
    /// [`ContextError::ContextNotFound`] if the owner has no such context.
    pub async fn context_by_name(
        &self,
        owner: &OwnerSlug,
        name: &str,
    ) -> Result<Context, ContextError> {
        self.contexts(owner)
            .await?
            .into_iter()
            .find(|c| c.name == name)
            .ok_or_else(|| ContextError::ContextNotFound {
                owner: owner.clone(),
                name: name.to_string(),
            })
    }

    /// Creates a context named `name` owned by the organization `owner`.
    pub async fn create_context(
        &self,
        owner: &OwnerSlug,
        name: &str,
    ) -> Result<Context, ContextError> {
        let body = NewContext {
            name,
            owner: NewContextOwner {
                slug: owner.as_str(),
                kind: OWNER_TYPE_ORGANIZATION,
            },
        };
        let context: Context = self.rest.post("context", &body).await?;
        debug!(context_id = %context.id, %owner, "created context");
        Ok(context)
    }

    /// Deletes a context and all of its variables.
    pub async fn delete_context(&self, id: &str) -> Result<(), ContextError> {
        self.rest.delete(&format!("context/{id}")).await?;
        debug!(context_id = %id, "deleted context");
        Ok(())
    }

    /// Lists the variables stored in a context, following pagination.
    pub async fn environment_variables(
        &self,
        context_id: &str,
    ) -> Result<Vec<EnvironmentVariable>, ContextError> {
        self.collect_pages(&format!("context/{context_id}/environment-variable"), &[])
            .await
    }

    /// Creates or replaces a variable in a context.
    pub async fn create_environment_variable(
        &self,
        context_id: &str,
        variable: &str,
        value: &SecretString,
    ) -> Result<EnvironmentVariable, ContextError> {
        let body = VariableValue {
            value: value.expose_secret(),
        };
        let stored: EnvironmentVariable = self
            .rest
            .put(
                &format!("context/{context_id}/environment-variable/{variable}"),
                &body,
            )
            .await?;
        debug!(%context_id, %variable, "stored context variable");
        Ok(stored)
    }

    /// Removes a variable from a context.
    pub async fn delete_environment_variable(
        &self,
        context_id: &str,
        variable: &str,
    ) -> Result<(), ContextError> {
        self.rest
            .delete(&format!("context/{context_id}/environment-variable/{variable}"))
            .await?;
        debug!(%context_id, %variable, "deleted context variable");
        Ok(())
    }

    async fn collect_pages<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>, ContextError> {
        let mut items = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let page: Page<T> = {
                let mut params = query.to_vec();
                if let Some(token) = page_token.as_deref() {
                    params.push(("page-token", token));
                }
                self.rest.get_with_query(path, &params).await?
            };
            trace!(path, items = page.items.len(), "fetched page");
            items.extend(page.items);

            match page.next_page_token {
                Some(next) if !next.is_empty() && page_token.as_deref() != Some(next.as_str()) => {
                    page_token = Some(next);
                }
                _ => return Ok(items),
            }
        }
    }
}
