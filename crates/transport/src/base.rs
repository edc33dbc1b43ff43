//! The network-facing [`Transport`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Request, Response};

use crate::{Transport, TransportError};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Sends requests over a pooled [`reqwest::Client`].
///
/// Cloning is cheap and clones share the connection pool.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Creates a transport with its own connection pool.
    ///
    /// # Errors
    ///
    /// [`TransportError::Build`] if the TLS backend cannot be initialised.
    pub fn new() -> Result<Self, TransportError> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(TransportError::Build)?;
        Ok(Self { client })
    }

    /// Uses an existing client (and its pool).
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: Request) -> Result<Response, TransportError> {
        Ok(self.client.execute(request).await?)
    }
}
