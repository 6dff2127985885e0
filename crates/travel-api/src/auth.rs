//! Bearer token authentication middleware
//!
//! Requires `Authorization: Bearer <token>` on every API route. Tokens are
//! HS256 JWTs issued by the auth service and are checked for signature,
//! issuer, audience and expiry. A static token may be configured instead for
//! deployments without the auth service. Either way the raw header is
//! forwarded to providers unmodified.

use std::sync::Arc;

use axum::extract::{Extension, Request};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use crate::error::ApiError;

/// Verification settings shared with the token issuer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JwtSettings {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
}

/// Claims the gateway reads after validation
#[derive(Debug, Deserialize)]
struct Claims {
    #[serde(default)]
    sub: Option<String>,
}

enum Verifier {
    Jwt {
        key: DecodingKey,
        validation: Validation,
    },
    Static(String),
}

/// Which bearer tokens the gateway accepts
#[derive(Clone)]
pub struct AuthPolicy {
    verifier: Arc<Verifier>,
}

impl AuthPolicy {
    /// Accept HS256 tokens signed with `settings.secret` for the configured
    /// issuer and audience that have not expired
    pub fn jwt(settings: &JwtSettings) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[settings.issuer.as_str()]);
        validation.set_audience(&[settings.audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);

        Self {
            verifier: Arc::new(Verifier::Jwt {
                key: DecodingKey::from_secret(settings.secret.as_bytes()),
                validation,
            }),
        }
    }

    /// Accept only this token
    pub fn static_token(token: impl Into<String>) -> Self {
        Self {
            verifier: Arc::new(Verifier::Static(token.into())),
        }
    }

    fn verify(&self, token: &str) -> Result<(), String> {
        match self.verifier.as_ref() {
            Verifier::Jwt { key, validation } => {
                let data = decode::<Claims>(token, key, validation).map_err(|e| e.to_string())?;
                tracing::debug!(sub = ?data.claims.sub, "Bearer token accepted");
                Ok(())
            }
            Verifier::Static(expected) if token == expected => Ok(()),
            Verifier::Static(_) => Err("token does not match".to_string()),
        }
    }
}

/// Axum middleware that rejects requests without an acceptable bearer token
pub async fn require_bearer(
    Extension(policy): Extension<AuthPolicy>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    match auth_header.and_then(|h| h.strip_prefix("Bearer ")) {
        Some(token) => match policy.verify(token.trim()) {
            Ok(()) => Ok(next.run(request).await),
            Err(reason) => {
                tracing::warn!(%reason, "Invalid bearer token");
                Err(ApiError::Unauthorized("Invalid bearer token".to_string()))
            }
        },
        None => {
            tracing::warn!(
                path = %request.uri().path(),
                "Missing or malformed Authorization header"
            );
            Err(ApiError::Unauthorized(
                "Missing or malformed Authorization header".to_string(),
            ))
        }
    }
}
