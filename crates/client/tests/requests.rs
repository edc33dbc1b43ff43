//! Requests issued through a fully wired `Client` against a mock service.

use std::sync::Arc;
use std::time::Duration;

use client::{is_not_found, is_not_found_result, Client, ClientConfig};
use serde_json::{json, Value};
use transport::{ReqwestTransport, RetryPolicy, RetryTransport, Transport};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fast_transport() -> Arc<dyn Transport> {
    Arc::new(RetryTransport::new(
        ReqwestTransport::new().unwrap(),
        RetryPolicy::default().with_wait(Duration::from_millis(1), Duration::from_millis(2)),
    ))
}

fn client_for(server: &MockServer) -> Client {
    let config = ClientConfig::new(format!("{}/api/v2", server.uri()), "tok")
        .with_vcs("github")
        .with_organization("acme");
    Client::with_transport(config, fast_transport()).unwrap()
}

#[tokio::test]
async fn project_lookup_uses_slug_and_prefix() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/project/github/acme/widgets"))
        .and(header("Circle-Token", "tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"slug": "github/acme/widgets"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let slug = client.slug("", "widgets").unwrap();
    let project: Value = client.rest().get(&format!("project/{slug}")).await.unwrap();

    assert_eq!(project["slug"], "github/acme/widgets");
}

#[tokio::test]
async fn missing_project_is_classified_as_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Project not found"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client.rest().get::<Value>("project/github/acme/gone").await;
    assert!(is_not_found_result(&result));

    let err = anyhow::Error::new(result.unwrap_err())
        .context("refreshing project")
        .context("reading resource state");
    assert!(is_not_found(&*err));
}

#[tokio::test]
async fn server_failure_is_not_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client.rest().get::<Value>("me").await;
    assert!(result.is_err());
    assert!(!is_not_found_result(&result));
    // Default ceiling: 4 retries after the first attempt.
    assert_eq!(server.received_requests().await.unwrap().len(), 5);
}

#[tokio::test]
async fn both_sub_clients_share_the_path_prefix() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/context"))
        .and(query_param("owner-slug", "github/other"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/context"))
        .and(query_param("owner-slug", "github/other"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": "c1", "name": "deploy", "created_at": "2024-01-02T03:04:05Z"}]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let owner = client.owner("other").unwrap();
    let contexts = client.contexts().contexts(&owner).await.unwrap();

    assert_eq!(contexts.len(), 1);
    assert_eq!(contexts[0].id, "c1");
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}
