//! Route search handlers

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::Json;
use serde_json::Value;
use travel_core::{AggregatedResponse, SearchQuery};

use crate::error::ApiError;
use crate::state::AppState;

/// Raw `Authorization` value, forwarded to providers unmodified
fn credential(headers: &HeaderMap) -> Option<&str> {
    headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok())
}

/// GET /api/routes?from=&to=
///
/// Always 200 when the aggregation completes, whatever the backends did.
/// A panic while aggregating is turned into a 500 by the route's
/// panic layer.
pub async fn search_routes(
    State(state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
    headers: HeaderMap,
) -> Result<Json<AggregatedResponse>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let response = state
        .aggregator()
        .aggregate(&query, credential(&headers))
        .await;

    Ok(Json(response))
}

/// GET /api/routes/{service_type}/{id}
pub async fn get_route_by_id(
    State(state): State<AppState>,
    Path((service_type, id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let route = state
        .router()
        .route_by_id(&service_type, &id, credential(&headers))
        .await?;

    Ok(Json(route))
}
