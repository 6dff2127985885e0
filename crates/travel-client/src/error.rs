//! Error types for route-provider client operations

use thiserror::Error;
use travel_core::SourceError;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur while talking to a provider service
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Server returned an error response
    #[error("Server error {status}: {message}")]
    ServerError { status: u16, message: String },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

impl ClientError {
    /// Create a server error from status code and message
    pub fn server_error(status: u16, message: impl Into<String>) -> Self {
        Self::ServerError {
            status,
            message: message.into(),
        }
    }
}

impl From<ClientError> for SourceError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::HttpError(e) if e.is_timeout() => SourceError::Timeout,
            ClientError::HttpError(e) if e.is_decode() => SourceError::Malformed(e.to_string()),
            ClientError::HttpError(e) => SourceError::Transport(e.to_string()),
            ClientError::InvalidUrl(e) => SourceError::Transport(e.to_string()),
            ClientError::ServerError { status, message } => match status {
                404 => SourceError::NotFound(message),
                _ => SourceError::Status { status },
            },
            ClientError::ParseError(m) => SourceError::Malformed(m),
        }
    }
}
