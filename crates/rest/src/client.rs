//! [`RestClient`]: authenticated JSON requests against one API root.

use std::sync::Arc;

use provider::HttpError;
use reqwest::header::{HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Method, Request, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use transport::Transport;

use crate::RestError;

/// Header carrying the API token.
pub const TOKEN_HEADER: HeaderName = HeaderName::from_static("circle-token");

/// `User-Agent` sent with every request.
pub const USER_AGENT: &str = concat!("circleci-provider/", env!("CARGO_PKG_VERSION"));

const JSON: HeaderValue = HeaderValue::from_static("application/json");

/// Issues requests to `<root><endpoint>/<path>`.
///
/// Cheap to share: all state is immutable and the transport is reference
/// counted.
#[derive(Debug, Clone)]
pub struct RestClient {
    root: Url,
    endpoint: String,
    token: HeaderValue,
    transport: Arc<dyn Transport>,
}

impl RestClient {
    /// Creates a client with its own resilient transport.
    ///
    /// # Errors
    ///
    /// - [`RestError::InvalidToken`] if the token is not a valid header value.
    /// - [`RestError::Transport`] if the HTTP client cannot be initialised.
    pub fn new(root: &Url, endpoint: &str, token: &SecretString) -> Result<Self, RestError> {
        let transport = transport::resilient()?;
        Self::with_transport(root, endpoint, token, Arc::new(transport))
    }

    /// Creates a client dispatching through `transport`.
    ///
    /// # Errors
    ///
    /// [`RestError::InvalidToken`] if the token is not a valid header value.
    pub fn with_transport(
        root: &Url,
        endpoint: &str,
        token: &SecretString,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, RestError> {
        let mut token =
            HeaderValue::from_str(token.expose_secret()).map_err(RestError::InvalidToken)?;
        token.set_sensitive(true);

        Ok(Self {
            root: root.clone(),
            endpoint: endpoint.to_string(),
            token,
            transport,
        })
    }

    /// Returns the transport root.
    pub fn root(&self) -> &Url {
        &self.root
    }

    /// Returns the endpoint prefix.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the transport requests are dispatched through.
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Resolves `path` against the root and endpoint prefix.
    ///
    /// # Errors
    ///
    /// [`RestError::InvalidPath`] if the joined path is not a valid URL.
    pub fn url_for(&self, path: &str) -> Result<Url, RestError> {
        let full = format!(
            "{}/{}",
            self.endpoint.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        self.root.join(&full).map_err(|source| RestError::InvalidPath {
            path: path.to_string(),
            source,
        })
    }

    /// `GET` and decode the JSON response.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, RestError> {
        self.get_with_query(path, &[]).await
    }

    /// `GET` with query parameters and decode the JSON response.
    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, RestError> {
        let body = self.send(Method::GET, path, query, None).await?;
        decode(&body)
    }

    /// `POST` a JSON body and decode the JSON response.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, RestError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_vec(body).map_err(RestError::Encode)?;
        let response = self.send(Method::POST, path, &[], Some(body)).await?;
        decode(&response)
    }

    /// `PUT` a JSON body and decode the JSON response.
    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, RestError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_vec(body).map_err(RestError::Encode)?;
        let response = self.send(Method::PUT, path, &[], Some(body)).await?;
        decode(&response)
    }

    /// `DELETE`, discarding any response body.
    pub async fn delete(&self, path: &str) -> Result<(), RestError> {
        self.send(Method::DELETE, path, &[], None).await?;
        Ok(())
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<Vec<u8>>,
    ) -> Result<Vec<u8>, RestError> {
        let mut url = self.url_for(path)?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        let mut request = Request::new(method.clone(), url);
        let headers = request.headers_mut();
        headers.insert(TOKEN_HEADER, self.token.clone());
        headers.insert(ACCEPT, JSON);
        headers.insert(
            reqwest::header::USER_AGENT,
            HeaderValue::from_static(USER_AGENT),
        );
        if let Some(body) = body {
            headers.insert(CONTENT_TYPE, JSON);
            *request.body_mut() = Some(body.into());
        }

        debug!(%method, url = %request.url(), "sending API request");
        let response = self.transport.execute(request).await?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(RestError::Body)?;
        debug!(%method, status = status.as_u16(), "received API response");

        if !status.is_success() {
            let error = HttpError::from_body(status.as_u16(), status.canonical_reason(), &bytes);
            return Err(error.into());
        }

        Ok(bytes.to_vec())
    }
}

/// Decodes a JSON body; an empty body decodes as `null`.
fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, RestError> {
    let body = if body.is_empty() { b"null".as_slice() } else { body };
    serde_json::from_slice(body).map_err(RestError::Decode)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde::Deserialize;
    use serde_json::{json, Value};
    use transport::{ReqwestTransport, RetryPolicy, RetryTransport};
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Project {
        slug: String,
        name: String,
    }

    fn token() -> SecretString {
        SecretString::from("tok".to_string())
    }

    fn client_for(server: &MockServer) -> RestClient {
        let root = Url::parse(&server.uri()).unwrap();
        let transport = RetryTransport::new(
            ReqwestTransport::new().unwrap(),
            RetryPolicy::default().with_wait(Duration::from_millis(1), Duration::from_millis(2)),
        );
        RestClient::with_transport(&root, "/api/v2", &token(), Arc::new(transport)).unwrap()
    }

    #[test]
    fn test_url_for_joins_endpoint_and_path() {
        let root = Url::parse("https://api.example.com").unwrap();
        for endpoint in ["/api/v2", "/api/v2/", "api/v2"] {
            let client = RestClient::new(&root, endpoint, &token()).unwrap();
            assert_eq!(
                client.url_for("project/github/acme/x").unwrap().as_str(),
                "https://api.example.com/api/v2/project/github/acme/x"
            );
            assert_eq!(
                client.url_for("/context").unwrap().as_str(),
                "https://api.example.com/api/v2/context"
            );
        }
    }

    #[test]
    fn test_url_for_with_empty_endpoint() {
        let root = Url::parse("http://localhost:8080").unwrap();
        let client = RestClient::new(&root, "", &token()).unwrap();
        assert_eq!(
            client.url_for("me").unwrap().as_str(),
            "http://localhost:8080/me"
        );
    }

    #[test]
    fn test_invalid_token_rejected() {
        let root = Url::parse("https://api.example.com").unwrap();
        let err = RestClient::new(&root, "/", &SecretString::from("bad\ntoken".to_string()))
            .unwrap_err();
        assert!(matches!(err, RestError::InvalidToken(_)));
    }

    #[test]
    fn test_debug_does_not_leak_token() {
        let root = Url::parse("https://api.example.com").unwrap();
        let client =
            RestClient::new(&root, "/", &SecretString::from("very-secret".to_string())).unwrap();
        assert!(!format!("{client:?}").contains("very-secret"));
    }

    #[tokio::test]
    async fn test_get_sends_token_and_decodes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/project/github/acme/widgets"))
            .and(header("Circle-Token", "tok"))
            .and(header("Accept", "application/json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"slug": "github/acme/widgets", "name": "widgets"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let project: Project = client_for(&server)
            .get("project/github/acme/widgets")
            .await
            .unwrap();

        assert_eq!(
            project,
            Project {
                slug: "github/acme/widgets".to_string(),
                name: "widgets".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_get_with_query_encodes_parameters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/context"))
            .and(query_param("owner-slug", "github/acme"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
            .expect(1)
            .mount(&server)
            .await;

        let page: Value = client_for(&server)
            .get_with_query("context", &[("owner-slug", "github/acme")])
            .await
            .unwrap();
        assert_eq!(page, json!({"items": []}));
    }

    #[tokio::test]
    async fn test_post_and_put_send_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v2/context"))
            .and(header("Content-Type", "application/json"))
            .and(body_json(json!({"name": "deploy"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "c1"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/v2/context/c1/environment-variable/TOKEN"))
            .and(body_json(json!({"value": "v"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"variable": "TOKEN"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let created: Value = client.post("context", &json!({"name": "deploy"})).await.unwrap();
        assert_eq!(created["id"], "c1");

        let updated: Value = client
            .put("context/c1/environment-variable/TOKEN", &json!({"value": "v"}))
            .await
            .unwrap();
        assert_eq!(updated["variable"], "TOKEN");
    }

    #[tokio::test]
    async fn test_delete_accepts_empty_and_message_bodies() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/v2/context/a"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/v2/context/b"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
            .mount(&server)
            .await;

        let client = client_for(&server);
        client.delete("context/a").await.unwrap();
        client.delete("context/b").await.unwrap();
    }

    #[tokio::test]
    async fn test_not_found_maps_to_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"message": "Project not found"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server)
            .get::<Value>("project/github/acme/missing")
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert!(matches!(
            &err,
            RestError::Http(HttpError { status: 404, message }) if message == "Project not found"
        ));

        let wrapped = anyhow::Error::new(err).context("reading project");
        assert!(provider::is_not_found(&*wrapped));
    }

    #[tokio::test]
    async fn test_server_errors_are_retried_by_transport() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .mount(&server)
            .await;

        let body: Value = client_for(&server).get("me").await.unwrap();
        assert_eq!(body, json!({"ok": true}));
        assert_eq!(server.received_requests().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_error_body_reports_reason_phrase() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server).get::<Value>("me").await.unwrap_err();
        assert!(matches!(
            &err,
            RestError::Http(HttpError { status: 403, message }) if message == "Forbidden"
        ));
    }

    #[tokio::test]
    async fn test_unexpected_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).get::<Project>("me").await.unwrap_err();
        assert!(matches!(err, RestError::Decode(_)));
        assert!(!err.is_not_found());
    }
}
