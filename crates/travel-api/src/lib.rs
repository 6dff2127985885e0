//! travel-api - REST API layer for the travel gateway
//!
//! Exposes the aggregation engine over HTTP:
//!
//! - `GET /api/routes?from=&to=` - search every provider at once
//! - `GET /api/routes/{serviceType}/{id}` - one record from one provider
//! - `GET /health` - liveness, no credential required
//!
//! # Usage
//!
//! ```ignore
//! use travel_api::{create_router, AppState, AuthPolicy, JwtSettings};
//! use travel_client::ServiceClient;
//!
//! let source = Arc::new(ServiceClient::new()?);
//! let state = AppState::new(Arc::new(registry), source, Duration::from_secs(5));
//! let router = create_router(state, AuthPolicy::jwt(&settings));
//! ```

pub mod auth;
pub mod error;
pub mod handlers;
pub mod state;

pub use auth::{AuthPolicy, JwtSettings};
pub use error::ApiError;
pub use state::AppState;

use axum::middleware;
use axum::response::Response;
use axum::routing::get;
use axum::{Extension, Router};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

fn search_panicked(payload: Box<dyn std::any::Any + Send + 'static>) -> Response {
    error::panic_response("Failed to retrieve routes", payload)
}

fn lookup_panicked(payload: Box<dyn std::any::Any + Send + 'static>) -> Response {
    error::panic_response("Failed to retrieve route", payload)
}

/// Create the gateway REST API router with the given application state
pub fn create_router(state: AppState, auth: AuthPolicy) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route(
            "/api/routes",
            get(handlers::routes::search_routes).layer(CatchPanicLayer::custom(search_panicked)),
        )
        .route(
            "/api/routes/{service_type}/{id}",
            get(handlers::routes::get_route_by_id)
                .layer(CatchPanicLayer::custom(lookup_panicked)),
        )
        .route_layer(middleware::from_fn(auth::require_bearer))
        .layer(Extension(auth));

    Router::new()
        // Health check
        .route("/health", get(|| async { "OK" }))
        .merge(api)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
