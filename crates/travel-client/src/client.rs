//! Route-provider HTTP client implementation

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, instrument, warn};
use travel_core::{
    BackendDescriptor, RouteSource, SearchQuery, ServiceOutcome, SourceError, SourceResult,
};
use url::Url;

use crate::error::{ClientError, Result};

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Default connection timeout
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for train, bus and flight provider services.
///
/// One instance is shared by every concurrent backend call; the underlying
/// reqwest `Client` owns the connection pool and is cheap to clone.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    client: Client,
}

impl ServiceClient {
    /// Create a client with default timeouts
    pub fn new() -> Result<Self> {
        Self::with_config(DEFAULT_TIMEOUT, DEFAULT_CONNECT_TIMEOUT)
    }

    /// Create a client with custom timeouts
    pub fn with_config(timeout: Duration, connect_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()?;

        Ok(Self { client })
    }

    /// Create a client bounded only while connecting.
    ///
    /// For callers that put their own deadline around each call, so that
    /// deadline is the only one that can expire mid-request.
    pub fn with_connect_timeout(connect_timeout: Duration) -> Result<Self> {
        let client = Client::builder().connect_timeout(connect_timeout).build()?;

        Ok(Self { client })
    }

    /// List routes from one backend.
    ///
    /// A `null` body is treated as an empty list.
    #[instrument(skip(self, backend, query, credential), fields(service = %backend.kind))]
    pub async fn list_routes(
        &self,
        backend: &BackendDescriptor,
        query: &SearchQuery,
        credential: Option<&str>,
    ) -> Result<Vec<Value>> {
        let url = backend.search_url(query)?;
        debug!(%url, "Calling service");

        let response = self.get(url, credential).send().await?;
        let routes: Option<Vec<Value>> = self.handle_response(response).await?;
        Ok(routes.unwrap_or_default())
    }

    /// Get a single route record by ID from one backend
    #[instrument(skip(self, backend, credential), fields(service = %backend.kind))]
    pub async fn get_route(
        &self,
        backend: &BackendDescriptor,
        id: i64,
        credential: Option<&str>,
    ) -> Result<Value> {
        let url = backend.route_url(id)?;
        debug!(%url, "Fetching route");

        let response = self.get(url, credential).send().await?;
        self.handle_response(response).await
    }

    /// Build a GET, forwarding the caller's `Authorization` value verbatim
    fn get(&self, url: Url, credential: Option<&str>) -> RequestBuilder {
        let request = self.client.get(url);
        match credential {
            Some(value) => request.header(AUTHORIZATION, value),
            None => request,
        }
    }

    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            let body = response.bytes().await?;
            serde_json::from_slice(&body).map_err(|e| ClientError::ParseError(e.to_string()))
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(ClientError::server_error(status.as_u16(), message))
        }
    }

    /// Convert a failed search into the message shown to clients
    fn failure_message(backend: &BackendDescriptor, err: &ClientError) -> String {
        let name = backend.kind.display_name();
        match err {
            ClientError::ServerError { status, message } => {
                let status = StatusCode::from_u16(*status)
                    .map(|s| s.to_string())
                    .unwrap_or_else(|_| status.to_string());
                warn!(service = name, %status, body = %message, "Service returned error status");
                format!("{} service returned {}", name, status)
            }
            ClientError::ParseError(reason) => {
                warn!(service = name, %reason, "Service returned malformed body");
                format!("{} service returned a malformed body: {}", name, reason)
            }
            ClientError::HttpError(e) if e.is_connect() => {
                error!(service = name, error = %e, "{} service is unreachable", name);
                format!("{} service is unavailable", name)
            }
            ClientError::HttpError(e) if e.is_timeout() => {
                warn!(service = name, error = %e, "Service call timed out");
                format!("{} service timed out", name)
            }
            ClientError::HttpError(e) if e.is_builder() => {
                error!(service = name, error = %e, "Error calling service");
                format!("Error calling {}: {}", name, e)
            }
            ClientError::HttpError(e) => {
                error!(service = name, error = %e, "{} service is unreachable", name);
                format!("{} service is unavailable", name)
            }
            ClientError::InvalidUrl(e) => {
                error!(service = name, error = %e, "Error calling service");
                format!("Error calling {}: {}", name, e)
            }
        }
    }
}

#[async_trait]
impl RouteSource for ServiceClient {
    async fn search(
        &self,
        backend: &BackendDescriptor,
        query: &SearchQuery,
        credential: Option<&str>,
    ) -> ServiceOutcome {
        match self.list_routes(backend, query, credential).await {
            Ok(routes) => {
                debug!(
                    service = %backend.kind,
                    count = routes.len(),
                    "Service returned routes"
                );
                ServiceOutcome::success(backend.clone(), routes)
            }
            Err(e) => ServiceOutcome::failure(backend.clone(), Self::failure_message(backend, &e)),
        }
    }

    async fn fetch_by_id(
        &self,
        backend: &BackendDescriptor,
        id: i64,
        credential: Option<&str>,
    ) -> SourceResult<Value> {
        self.get_route(backend, id, credential)
            .await
            .map_err(SourceError::from)
    }
}
