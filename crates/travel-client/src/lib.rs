//! Route-provider client library
//!
//! Provides [`ServiceClient`], the reqwest-backed [`RouteSource`] the gateway
//! uses to call train, bus and flight services.
//!
//! # Example
//!
//! ```rust,no_run
//! use travel_client::ServiceClient;
//! use travel_core::{BackendDescriptor, BackendKind, RouteSource, SearchQuery};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = ServiceClient::new()?;
//!     let train = BackendDescriptor::new(BackendKind::Train, "http://localhost:49892")?;
//!
//!     let query = SearchQuery::new(Some("Zagreb"), None);
//!     let outcome = client.search(&train, &query, Some("Bearer eyJ...")).await;
//!     println!("{} routes", outcome.route_count());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Testing
//!
//! The `testing` module provides an in-process provider double and a
//! server harness for integration tests:
//!
//! ```rust,ignore
//! use travel_client::testing::{MockProvider, TestServer};
//!
//! let provider = MockProvider::new(vec![sample_route(1, "Zagreb", "Split")]);
//! let server = TestServer::start(provider.router()).await?;
//! let train = server.descriptor(BackendKind::Train);
//! ```

mod client;
mod error;
pub mod testing;

pub use client::ServiceClient;
pub use error::{ClientError, Result};

// Re-export core types for convenience
pub use travel_core::{BackendDescriptor, BackendKind, RouteSource, SearchQuery, ServiceOutcome};
