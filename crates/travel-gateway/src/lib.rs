//! travel-gateway - Fan-out aggregation across route providers
//!
//! This crate provides the engine that answers one client search by querying
//! every configured route provider (train, bus, flight) at once, tolerating
//! the failure of any subset, and merging the results into one envelope.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                        Travel Gateway                          │
//! │                                                                │
//! │  ┌──────────────────────────────────────────────────────────┐  │
//! │  │                   FanOutAggregator                       │  │
//! │  │  - Calls every backend concurrently                      │  │
//! │  │  - Bounds each call with a timeout                       │  │
//! │  │  - Combines outcomes in configured order                 │  │
//! │  └───────────────────────────┬──────────────────────────────┘  │
//! │                              │ RouteSource                     │
//! │              ┌───────────────┼───────────────┐                 │
//! │              ▼               ▼               ▼                 │
//! │      ┌──────────────┐ ┌──────────────┐ ┌──────────────┐        │
//! │      │    Train     │ │     Bus      │ │    Flight    │        │
//! │      └──────────────┘ └──────────────┘ └──────────────┘        │
//! │                                                                │
//! │  SingleServiceRouter: one backend, one record, by ID           │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use travel_gateway::FanOutAggregator;
//! use travel_client::ServiceClient;
//!
//! let source = Arc::new(ServiceClient::new()?);
//! let aggregator = FanOutAggregator::new(registry, source, Duration::from_secs(5));
//!
//! let response = aggregator.aggregate(&query, Some("Bearer eyJ...")).await;
//! println!("{} routes", response.summary.total_routes);
//! ```

mod aggregator;
mod combiner;
mod error;
mod router;

#[cfg(test)]
mod test_support;

pub use aggregator::{FanOutAggregator, DEFAULT_CALL_TIMEOUT};
pub use combiner::combine;
pub use error::RouteLookupError;
pub use router::SingleServiceRouter;

// Re-export core types for convenience
pub use travel_core::{
    AggregatedResponse, BackendDescriptor, BackendKind, BackendRegistry, RouteSource, SearchQuery,
    ServiceOutcome,
};
