//! Single-service lookup errors

use thiserror::Error;

/// Why a by-ID lookup did not produce a route record
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteLookupError {
    /// Service-type token is not a configured backend; no call was made
    #[error("Invalid service type: {token}. Valid types: {valid}")]
    InvalidServiceType { token: String, valid: String },

    /// Route ID is not an integer; no call was made
    #[error("Invalid route ID: {0}")]
    InvalidId(String),

    /// Backend answered 404
    #[error("Route with ID {id} not found in {service} service")]
    NotFound { id: String, service: String },

    /// Backend answered with another non-success status
    #[error("Error from {service} service")]
    Upstream { status: u16, service: String },

    /// Transport, timeout or body parse failure
    #[error("Failed to retrieve route")]
    Internal,
}

impl RouteLookupError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            RouteLookupError::InvalidServiceType { .. } => 400,
            RouteLookupError::InvalidId(_) => 400,
            RouteLookupError::NotFound { .. } => 404,
            RouteLookupError::Upstream { status, .. } => *status,
            RouteLookupError::Internal => 500,
        }
    }
}
