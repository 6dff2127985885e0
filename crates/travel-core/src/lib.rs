//! travel-core - Core traits and types for the travel search gateway
//!
//! This crate provides the abstractions shared by the route-provider client,
//! the aggregation engine and the HTTP layer: the closed set of backend
//! kinds, the injected backend registry, per-backend outcomes and the
//! aggregated response envelope.

pub mod backend;
pub mod error;
pub mod models;

pub use backend::RouteSource;
pub use error::{RegistryError, SourceError, SourceResult};
pub use models::*;
