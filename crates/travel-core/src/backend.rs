//! RouteSource trait - the seam between the gateway and provider services
//!
//! The aggregation engine never talks HTTP directly. It calls a
//! `RouteSource`, which the `travel-client` crate implements over reqwest and
//! tests implement in memory.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::SourceResult;
use crate::models::{BackendDescriptor, SearchQuery, ServiceOutcome};

/// A source of route records for one or more provider backends.
///
/// Implementations must be cheap to share across concurrent calls; the
/// gateway holds a single instance behind an `Arc` for the process lifetime.
#[async_trait]
pub trait RouteSource: Send + Sync {
    /// Search one backend for routes.
    ///
    /// Must not fail: every failure mode (non-2xx status, unreachable host,
    /// malformed body) is converted into a failed [`ServiceOutcome`].
    ///
    /// `credential` is the caller's raw `Authorization` header value and is
    /// forwarded unmodified when present.
    async fn search(
        &self,
        backend: &BackendDescriptor,
        query: &SearchQuery,
        credential: Option<&str>,
    ) -> ServiceOutcome;

    /// Fetch a single route record by ID from one backend.
    async fn fetch_by_id(
        &self,
        backend: &BackendDescriptor,
        id: i64,
        credential: Option<&str>,
    ) -> SourceResult<Value>;
}
