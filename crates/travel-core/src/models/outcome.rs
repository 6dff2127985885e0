//! Per-backend call outcome

use serde_json::Value;

use crate::models::{BackendDescriptor, BackendKind};

/// The normalized result of calling one backend once.
///
/// Exactly one of routes or error is populated; the type makes any other
/// combination unrepresentable. Route records are opaque and forwarded
/// verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceOutcome {
    backend: BackendDescriptor,
    result: Result<Vec<Value>, String>,
}

impl ServiceOutcome {
    pub fn success(backend: BackendDescriptor, routes: Vec<Value>) -> Self {
        Self {
            backend,
            result: Ok(routes),
        }
    }

    pub fn failure(backend: BackendDescriptor, error: impl Into<String>) -> Self {
        Self {
            backend,
            result: Err(error.into()),
        }
    }

    pub fn backend(&self) -> &BackendDescriptor {
        &self.backend
    }

    pub fn kind(&self) -> BackendKind {
        self.backend.kind
    }

    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    pub fn routes(&self) -> Option<&[Value]> {
        self.result.as_deref().ok()
    }

    pub fn error(&self) -> Option<&str> {
        self.result.as_ref().err().map(String::as_str)
    }

    /// Number of routes, zero for a failed outcome
    pub fn route_count(&self) -> usize {
        self.routes().map_or(0, <[Value]>::len)
    }
}
