//! Fan-out aggregator - one search, every backend, at once
//!
//! Each configured backend gets its own bounded call. All calls are polled
//! concurrently on the request's task and joined before the combine step, so
//! dropping the request future drops every in-flight call with it.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use futures::future::join_all;
use tracing::{debug, info, warn};
use travel_core::{
    AggregatedResponse, BackendDescriptor, BackendRegistry, RouteSource, SearchQuery,
    ServiceOutcome,
};

use crate::combiner::combine;

/// Upper bound on a single backend call when none is configured
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(5);

/// Queries every configured backend concurrently and merges the outcomes
pub struct FanOutAggregator {
    registry: Arc<BackendRegistry>,
    source: Arc<dyn RouteSource>,
    call_timeout: Duration,
}

impl FanOutAggregator {
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

    /// Search every backend and return the merged envelope.
    ///
    /// Never fails: a backend that errors or exceeds the call timeout is
    /// recorded as a failed outcome and the others are unaffected. The
    /// reported execution time spans entry to the last settled call.
    pub async fn aggregate(
        &self,
        query: &SearchQuery,
        credential: Option<&str>,
    ) -> AggregatedResponse {
        let started = Instant::now();

        info!(
            from = ?query.from_filter(),
            to = ?query.to_filter(),
            backends = self.registry.len(),
            "Aggregating routes from all services"
        );

        let calls = self
            .registry
            .iter()
            .map(|backend| self.call_backend(backend, query, credential));
        let outcomes = join_all(calls).await;

        let elapsed = started.elapsed();
        let response = combine(query, &self.registry, outcomes, elapsed, Utc::now());

        info!(
            elapsed_ms = response.summary.execution_time_ms,
            total_routes = response.summary.total_routes,
            successful = response.summary.services_successful,
            "Route aggregation completed"
        );

        response
    }

    async fn call_backend(
        &self,
        backend: &BackendDescriptor,
        query: &SearchQuery,
        credential: Option<&str>,
    ) -> ServiceOutcome {
        debug!(service = %backend.kind, url = %backend.base_url, "Dispatching backend call");

        match tokio::time::timeout(
            self.call_timeout,
            self.source.search(backend, query, credential),
        )
        .await
        {
            Ok(outcome) => outcome,
            Err(_) => {
                let ms = self.call_timeout.as_millis();
                warn!(service = %backend.kind, timeout_ms = %ms, "Backend call timed out");
                ServiceOutcome::failure(
                    backend.clone(),
                    format!(
                        "{} service timed out after {}ms",
                        backend.kind.display_name(),
                        ms
                    ),
                )
            }
        }
    }
}
