//! API error types and conversions

use std::any::Any;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use travel_gateway::RouteLookupError;

/// API error type that converts to HTTP responses
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request
    BadRequest(String),
    /// 401 Unauthorized
    Unauthorized(String),
    /// 404 Not Found
    NotFound(String),
    /// Backend status passed through to the caller
    Upstream { status: StatusCode, message: String },
    /// 500 Internal Server Error
    Internal {
        message: String,
        details: Option<String>,
    },
}

/// Standard error response format
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl ApiError {
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal {
            message: message.into(),
            details: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            ApiError::Upstream { status, message } => (status, message, None),
            ApiError::Internal { message, details } => {
                (StatusCode::INTERNAL_SERVER_ERROR, message, details)
            }
        };

        // Log errors at appropriate levels
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), %message, details = ?details, "API error");
        } else if status.is_client_error() {
            tracing::debug!(status = status.as_u16(), %message, "API client error");
        }

        let body = Json(ErrorResponse {
            error: message,
            details,
        });

        (status, body).into_response()
    }
}

/// Render a handler panic caught by the panic layer as a 500 `{error, details}`
pub(crate) fn panic_response(message: &str, payload: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic".to_string()
    };

    ApiError::Internal {
        message: message.to_string(),
        details: Some(details),
    }
    .into_response()
}

impl From<RouteLookupError> for ApiError {
    fn from(err: RouteLookupError) -> Self {
        let message = err.to_string();
        match err {
            RouteLookupError::InvalidServiceType { .. } | RouteLookupError::InvalidId(_) => {
                ApiError::BadRequest(message)
            }
            RouteLookupError::NotFound { .. } => ApiError::NotFound(message),
            RouteLookupError::Upstream { status, .. } => ApiError::Upstream {
                status: StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                message,
            },
            RouteLookupError::Internal => ApiError::internal(message),
        }
    }
}
