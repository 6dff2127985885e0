//! Application state for the gateway API

use std::sync::Arc;
use std::time::Duration;

use travel_core::{BackendRegistry, RouteSource};
use travel_gateway::{FanOutAggregator, SingleServiceRouter};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    aggregator: Arc<FanOutAggregator>,
    router: Arc<SingleServiceRouter>,
}

impl AppState {
    /// Wire the aggregator and by-ID router to one registry and one source
    pub fn new(
        registry: Arc<BackendRegistry>,
        source: Arc<dyn RouteSource>,
        call_timeout: Duration,
    ) -> Self {
        Self {
            aggregator: Arc::new(FanOutAggregator::new(
                registry.clone(),
                source.clone(),
                call_timeout,
            )),
            router: Arc::new(SingleServiceRouter::new(registry, source, call_timeout)),
        }
    }

    pub fn aggregator(&self) -> &FanOutAggregator {
        &self.aggregator
    }

    pub fn router(&self) -> &SingleServiceRouter {
        &self.router
    }
}
