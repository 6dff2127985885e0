//! Integration tests for ServiceClient
//!
//! Each test spins up an in-process provider on an ephemeral port and drives
//! it through the real reqwest client.

use std::time::Duration;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use travel_client::testing::{closed_port_descriptor, sample_route, MockProvider, TestServer};
use travel_client::ServiceClient;
use travel_core::{BackendKind, RouteSource, SearchQuery, SourceError};

fn fixtures(kind: BackendKind) -> Vec<serde_json::Value> {
    vec![
        sample_route(1, kind, "Zagreb", "Split"),
        sample_route(2, kind, "Zagreb", "Rijeka"),
        sample_route(3, kind, "Osijek", "Split"),
    ]
}

#[tokio::test]
async fn search_returns_all_routes_without_filters() {
    let provider = MockProvider::new(fixtures(BackendKind::Train));
    let server = TestServer::start(provider.router()).await.unwrap();
    let train = server.descriptor(BackendKind::Train).unwrap();

    let client = ServiceClient::new().unwrap();
    let outcome = client
        .search(&train, &SearchQuery::default(), Some("Bearer abc"))
        .await;

    assert!(outcome.is_success());
    assert_eq!(outcome.route_count(), 3);
    assert_eq!(outcome.error(), None);
    assert_eq!(provider.last_raw_query(), None);
}

#[tokio::test]
async fn search_forwards_filters_and_credential() {
    let provider = MockProvider::new(fixtures(BackendKind::Bus)).with_bearer("abc");
    let server = TestServer::start(provider.router()).await.unwrap();
    let bus = server.descriptor(BackendKind::Bus).unwrap();

    let client = ServiceClient::new().unwrap();
    let outcome = client
        .search(&bus, &SearchQuery::new(Some("zagreb"), Some("")), Some("Bearer abc"))
        .await;

    assert!(outcome.is_success());
    assert_eq!(outcome.route_count(), 2);
    assert_eq!(provider.last_authorization().as_deref(), Some("Bearer abc"));
    assert_eq!(provider.last_raw_query().as_deref(), Some("from=zagreb"));
}

#[tokio::test]
async fn search_escapes_filter_values() {
    let provider = MockProvider::new(vec![sample_route(
        9,
        BackendKind::Flight,
        "New York",
        "Los Angeles",
    )]);
    let server = TestServer::start(provider.router()).await.unwrap();
    let flight = server.descriptor(BackendKind::Flight).unwrap();

    let client = ServiceClient::new().unwrap();
    let outcome = client
        .search(&flight, &SearchQuery::new(Some("New York"), None), None)
        .await;

    assert_eq!(outcome.route_count(), 1);
    let raw = provider.last_raw_query().unwrap();
    assert!(!raw.contains(' '), "query not escaped: {}", raw);
}

#[tokio::test]
async fn missing_credential_omits_header_and_surfaces_backend_status() {
    let provider = MockProvider::new(fixtures(BackendKind::Train)).with_bearer("abc");
    let server = TestServer::start(provider.router()).await.unwrap();
    let train = server.descriptor(BackendKind::Train).unwrap();

    let client = ServiceClient::new().unwrap();
    let outcome = client.search(&train, &SearchQuery::default(), None).await;

    assert!(!outcome.is_success());
    assert_eq!(provider.last_authorization(), None);
    assert_eq!(
        outcome.error(),
        Some("Train service returned 401 Unauthorized")
    );
}

#[tokio::test]
async fn non_success_status_becomes_failure_outcome() {
    let provider =
        MockProvider::new(fixtures(BackendKind::Bus)).with_status(StatusCode::SERVICE_UNAVAILABLE);
    let server = TestServer::start(provider.router()).await.unwrap();
    let bus = server.descriptor(BackendKind::Bus).unwrap();

    let client = ServiceClient::new().unwrap();
    let outcome = client.search(&bus, &SearchQuery::default(), None).await;

    assert!(!outcome.is_success());
    assert_eq!(outcome.routes(), None);
    assert_eq!(
        outcome.error(),
        Some("Bus service returned 503 Service Unavailable")
    );
}

#[tokio::test]
async fn malformed_body_becomes_failure_outcome() {
    let provider = MockProvider::default().with_raw_body("{not json");
    let server = TestServer::start(provider.router()).await.unwrap();
    let flight = server.descriptor(BackendKind::Flight).unwrap();

    let client = ServiceClient::new().unwrap();
    let outcome = client.search(&flight, &SearchQuery::default(), None).await;

    assert!(!outcome.is_success());
    assert!(outcome
        .error()
        .unwrap()
        .starts_with("Flight service returned a malformed body"));
}

#[tokio::test]
async fn object_body_is_malformed_for_search() {
    let provider = MockProvider::default().with_raw_body(r#"{"routes": []}"#);
    let server = TestServer::start(provider.router()).await.unwrap();
    let train = server.descriptor(BackendKind::Train).unwrap();

    let client = ServiceClient::new().unwrap();
    let outcome = client.search(&train, &SearchQuery::default(), None).await;

    assert!(!outcome.is_success());
}

#[tokio::test]
async fn null_body_is_an_empty_list() {
    let provider = MockProvider::default().with_raw_body("null");
    let server = TestServer::start(provider.router()).await.unwrap();
    let bus = server.descriptor(BackendKind::Bus).unwrap();

    let client = ServiceClient::new().unwrap();
    let outcome = client.search(&bus, &SearchQuery::default(), None).await;

    assert!(outcome.is_success());
    assert_eq!(outcome.route_count(), 0);
}

#[tokio::test]
async fn unreachable_backend_is_reported_unavailable() {
    let train = closed_port_descriptor(BackendKind::Train).unwrap();

    let client = ServiceClient::new().unwrap();
    let outcome = client.search(&train, &SearchQuery::default(), None).await;

    assert!(!outcome.is_success());
    assert_eq!(outcome.error(), Some("Train service is unavailable"));
}

#[tokio::test]
async fn client_timeout_becomes_failure_outcome() {
    let provider =
        MockProvider::new(fixtures(BackendKind::Bus)).with_latency(Duration::from_secs(5));
    let server = TestServer::start(provider.router()).await.unwrap();
    let bus = server.descriptor(BackendKind::Bus).unwrap();

    let client =
        ServiceClient::with_config(Duration::from_millis(200), Duration::from_millis(200)).unwrap();
    let outcome = client.search(&bus, &SearchQuery::default(), None).await;

    assert_eq!(outcome.error(), Some("Bus service timed out"));
}

#[tokio::test]
async fn fetch_by_id_returns_record() {
    let provider = MockProvider::new(fixtures(BackendKind::Flight));
    let server = TestServer::start(provider.router()).await.unwrap();
    let flight = server.descriptor(BackendKind::Flight).unwrap();

    let client = ServiceClient::new().unwrap();
    let route = client
        .fetch_by_id(&flight, 2, Some("Bearer abc"))
        .await
        .unwrap();

    assert_eq!(route["id"], 2);
    assert_eq!(route["to"], "Rijeka");
    assert_eq!(provider.last_authorization().as_deref(), Some("Bearer abc"));
}

#[tokio::test]
async fn fetch_by_id_maps_404_to_not_found() {
    let provider = MockProvider::new(fixtures(BackendKind::Flight));
    let server = TestServer::start(provider.router()).await.unwrap();
    let flight = server.descriptor(BackendKind::Flight).unwrap();

    let client = ServiceClient::new().unwrap();
    let err = client.fetch_by_id(&flight, 42, None).await.unwrap_err();

    assert!(matches!(err, SourceError::NotFound(_)));
}

#[tokio::test]
async fn fetch_by_id_keeps_other_statuses() {
    let provider =
        MockProvider::new(fixtures(BackendKind::Bus)).with_status(StatusCode::BAD_GATEWAY);
    let server = TestServer::start(provider.router()).await.unwrap();
    let bus = server.descriptor(BackendKind::Bus).unwrap();

    let client = ServiceClient::new().unwrap();
    let err = client.fetch_by_id(&bus, 1, None).await.unwrap_err();

    assert!(matches!(err, SourceError::Status { status: 502 }));
}

#[tokio::test]
async fn fetch_by_id_unreachable_is_transport_error() {
    let bus = closed_port_descriptor(BackendKind::Bus).unwrap();

    let client = ServiceClient::new().unwrap();
    let err = client.fetch_by_id(&bus, 1, None).await.unwrap_err();

    assert!(matches!(err, SourceError::Transport(_)));
}

#[tokio::test]
async fn connect_only_client_leaves_slow_answers_to_the_caller() {
    let provider = MockProvider::new(fixtures(BackendKind::Flight))
        .with_latency(Duration::from_millis(300));
    let server = TestServer::start(provider.router()).await.unwrap();
    let flight = server.descriptor(BackendKind::Flight).unwrap();

    let client = ServiceClient::with_connect_timeout(Duration::from_millis(100)).unwrap();
    let outcome = client.search(&flight, &SearchQuery::default(), None).await;

    assert!(outcome.is_success());
    assert_eq!(outcome.route_count(), 3);
}

#[tokio::test]
async fn connect_only_client_reports_refused_connection_as_unavailable() {
    let bus = closed_port_descriptor(BackendKind::Bus).unwrap();

    let client = ServiceClient::with_connect_timeout(Duration::from_millis(100)).unwrap();
    let outcome = client.search(&bus, &SearchQuery::default(), None).await;

    assert_eq!(outcome.error(), Some("Bus service is unavailable"));
}
