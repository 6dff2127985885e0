//! Single-service router - by-ID lookups against one backend

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, error, warn};
use travel_core::{BackendKind, BackendRegistry, RouteSource, SourceError};

use crate::error::RouteLookupError;

/// Forwards a by-ID lookup to the one backend named by a service-type token
pub struct SingleServiceRouter {
    registry: Arc<BackendRegistry>,
    source: Arc<dyn RouteSource>,
    call_timeout: Duration,
}

impl SingleServiceRouter {
    pub fn new(
        registry: Arc<BackendRegistry>,
        source: Arc<dyn RouteSource>,
        call_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            source,
            call_timeout,
        }
    }

    /// Look up route `id` in the backend named by `service_type`.
    ///
    /// The token and ID are validated before any network call. Messages
    /// echo the token as the caller wrote it.
    pub async fn route_by_id(
        &self,
        service_type: &str,
        id: &str,
        credential: Option<&str>,
    ) -> Result<Value, RouteLookupError> {
        let backend = BackendKind::parse(service_type)
            .and_then(|kind| self.registry.get(kind))
            .ok_or_else(|| RouteLookupError::InvalidServiceType {
                token: service_type.to_string(),
                valid: self.registry.valid_types(),
            })?;

        let route_id: i64 = id
            .parse()
            .map_err(|_| RouteLookupError::InvalidId(id.to_string()))?;

        debug!(service = %backend.kind, id = route_id, "Forwarding route lookup");

        let result = tokio::time::timeout(
            self.call_timeout,
            self.source.fetch_by_id(backend, route_id, credential),
        )
        .await
        .unwrap_or(Err(SourceError::Timeout));

        result.map_err(|e| match e {
            SourceError::NotFound(_) => RouteLookupError::NotFound {
                id: id.to_string(),
                service: service_type.to_string(),
            },
            SourceError::Status { status } => {
                warn!(service = %backend.kind, status, "Backend returned error status");
                RouteLookupError::Upstream {
                    status,
                    service: service_type.to_string(),
                }
            }
            other => {
                error!(
                    service = %backend.kind,
                    id = route_id,
                    error = %other,
                    "Error retrieving route"
                );
                RouteLookupError::Internal
            }
        })
    }
}
