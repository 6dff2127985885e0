//! Common error types for route sources and backend configuration

use thiserror::Error;

use crate::models::BackendKind;

/// Result type for route source lookups
pub type SourceResult<T> = Result<T, SourceError>;

/// Errors a route source can report for a single-record lookup.
///
/// Search calls never surface these: they are folded into a failed
/// [`ServiceOutcome`](crate::ServiceOutcome) instead.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Backend answered 404 for the requested record
    #[error("Not found: {0}")]
    NotFound(String),

    /// Backend answered with a non-success status other than 404
    #[error("Backend returned HTTP {status}")]
    Status { status: u16 },

    /// Connection, DNS or request construction failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Backend answered 2xx but the body was not valid JSON
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// No answer within the configured bound
    #[error("Request timed out")]
    Timeout,
}

/// Errors raised while building the backend registry
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No backends configured
    #[error("at least one backend must be configured")]
    Empty,

    /// The same kind was bound to two addresses
    #[error("backend '{0}' is configured more than once")]
    Duplicate(BackendKind),

    /// Base address is not a usable http(s) URL
    #[error("invalid base address for '{kind}': {reason}")]
    InvalidUrl { kind: BackendKind, reason: String },

    /// Service-type token is not one of the known kinds
    #[error("unknown service type '{0}'")]
    UnknownKind(String),
}
