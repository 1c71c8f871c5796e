//! System endpoints: health check and broker counters.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;
use crate::service::BrokerStats;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// `GET /api/health`: Service health status.
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// `GET /api/stats`: Live broker counters.
#[utoipa::path(
    get,
    path = "/api/stats",
    tag = "System",
    summary = "Broker statistics",
    description = "Returns the number of waiting participants, active pairings, and live connections on the socket broker.",
    responses(
        (status = 200, description = "Current counters", body = BrokerStats),
    )
)]
pub async fn stats_handler(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.broker.stats().await))
}

/// System routes, relative to `/api`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/stats", get(stats_handler))
}
