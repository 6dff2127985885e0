//! Test utilities for travel-client
//!
//! Provides an in-process route-provider double and a server harness for
//! running integration tests against real HTTP.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use travel_core::{BackendDescriptor, BackendKind, RegistryError, SearchQuery};

/// A test server that automatically shuts down when dropped
pub struct TestServer {
    pub addr: SocketAddr,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl TestServer {
    /// Serve an axum Router on an ephemeral loopback port
    ///
    /// # Example
    ///
    /// ```ignore
    /// use travel_client::testing::{MockProvider, TestServer};
    ///
    /// let server = TestServer::start(MockProvider::new(routes).router()).await?;
    /// let train = server.descriptor(BackendKind::Train)?;
    /// ```
    pub async fn start(router: Router) -> std::io::Result<Self> {
        // Bind to any available port
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .ok();
        });

        // Give server a moment to start
        tokio::time::sleep(Duration::from_millis(10)).await;

        Ok(Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    /// Get the base URL of the test server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Bind a backend kind to this server's address
    pub fn descriptor(&self, kind: BackendKind) -> Result<BackendDescriptor, RegistryError> {
        BackendDescriptor::new(kind, &self.base_url())
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// Descriptor pointing at a loopback port with nothing listening.
///
/// Calls against it fail with connection refused.
pub fn closed_port_descriptor(kind: BackendKind) -> std::io::Result<BackendDescriptor> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    drop(listener);

    BackendDescriptor::new(kind, &format!("http://{}", addr))
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))
}

/// A route record shaped like the provider services' records
pub fn sample_route(id: i64, kind: BackendKind, from: &str, to: &str) -> Value {
    json!({
        "id": id,
        "routeId": format!("{}-{:03}", kind.display_name().to_uppercase(), id),
        "from": from,
        "to": to,
        "departureTime": "2025-12-01T08:00:00",
        "arrivalTime": "2025-12-01T11:30:00",
        "duration": "3h 30m",
        "price": 29.90,
        "currency": "EUR",
        "provider": format!("{} Co", kind.display_name()),
        "availableSeats": 42,
        "type": kind.display_name(),
    })
}

#[derive(Default)]
struct Recorder {
    hits: AtomicUsize,
    authorization: Mutex<Option<String>>,
    raw_query: Mutex<Option<String>>,
}

/// In-process stand-in for a train, bus or flight service.
///
/// Serves `GET /api/routes` (with `from`/`to` substring filters) and
/// `GET /api/routes/{id}` over a fixed record set. Latency, forced status,
/// raw body and required bearer token are configurable. Clones share the
/// same request recorder, so a test can keep one handle and serve another.
#[derive(Clone, Default)]
pub struct MockProvider {
    routes: Arc<Vec<Value>>,
    latency: Duration,
    status: Option<StatusCode>,
    raw_body: Option<String>,
    bearer: Option<String>,
    recorder: Arc<Recorder>,
}

impl MockProvider {
    pub fn new(routes: Vec<Value>) -> Self {
        Self {
            routes: Arc::new(routes),
            ..Self::default()
        }
    }

    /// Delay every response
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Answer every request with this status
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    /// Answer every request with 200 and this body verbatim
    pub fn with_raw_body(mut self, body: impl Into<String>) -> Self {
        self.raw_body = Some(body.into());
        self
    }

    /// Reject requests without `Authorization: Bearer <token>`
    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/api/routes", get(list_routes))
            .route("/api/routes/{id}", get(get_route))
            .with_state(self.clone())
    }

    /// Number of requests received so far
    pub fn hits(&self) -> usize {
        self.recorder.hits.load(Ordering::SeqCst)
    }

    /// `Authorization` header of the last request
    pub fn last_authorization(&self) -> Option<String> {
        self.recorder.authorization.lock().clone()
    }

    /// Raw query string of the last request
    pub fn last_raw_query(&self) -> Option<String> {
        self.recorder.raw_query.lock().clone()
    }

    /// Record the request, apply latency, then any forced response
    async fn intercept(&self, headers: &HeaderMap, uri: &Uri) -> Option<Response> {
        let authorization = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        self.recorder.hits.fetch_add(1, Ordering::SeqCst);
        *self.recorder.authorization.lock() = authorization.clone();
        *self.recorder.raw_query.lock() = uri.query().map(String::from);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        if let Some(token) = &self.bearer {
            if authorization.as_deref() != Some(format!("Bearer {}", token).as_str()) {
                return Some(StatusCode::UNAUTHORIZED.into_response());
            }
        }

        if let Some(status) = self.status {
            return Some((status, "forced failure").into_response());
        }

        if let Some(body) = &self.raw_body {
            return Some(
                (StatusCode::OK, [(CONTENT_TYPE, "application/json")], body.clone())
                    .into_response(),
            );
        }

        None
    }
}

fn field_contains(route: &Value, field: &str, filter: Option<&str>) -> bool {
    match filter {
        None => true,
        Some(needle) => route
            .get(field)
            .and_then(Value::as_str)
            .is_some_and(|v| v.to_lowercase().contains(&needle.to_lowercase())),
    }
}

async fn list_routes(
    State(provider): State<MockProvider>,
    Query(query): Query<SearchQuery>,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    if let Some(response) = provider.intercept(&headers, &uri).await {
        return response;
    }

    let routes: Vec<Value> = provider
        .routes
        .iter()
        .filter(|r| field_contains(r, "from", query.from_filter()))
        .filter(|r| field_contains(r, "to", query.to_filter()))
        .cloned()
        .collect();

    Json(routes).into_response()
}

async fn get_route(
    State(provider): State<MockProvider>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    if let Some(response) = provider.intercept(&headers, &uri).await {
        return response;
    }

    match provider
        .routes
        .iter()
        .find(|r| r.get("id").and_then(Value::as_i64) == Some(id))
    {
        Some(route) => Json(route.clone()).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": format!("Route with ID {} not found.", id) })),
        )
            .into_response(),
    }
}
