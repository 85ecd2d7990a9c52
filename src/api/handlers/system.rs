//! System endpoints: health check and event type catalog.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// `GET /health` — Service health status.
#[utoipa::path(
    get,
    path = "/health",
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

/// Journal event type info.
#[derive(Debug, Serialize, ToSchema)]
struct EventTypeInfo {
    event_type: &'static str,
    description: &'static str,
    transition: bool,
}

/// `GET /config/event-types` — List journal event types.
#[utoipa::path(
    get,
    path = "/config/event-types",
    tag = "System",
    summary = "List journal event types",
    description = "Returns metadata for every event type the journal can record.",
    responses(
        (status = 200, description = "Event type catalog", body = Vec<EventTypeInfo>),
    )
)]
pub async fn event_types_handler() -> impl IntoResponse {
    let types = vec![
        EventTypeInfo {
            event_type: "start",
            description: "Asset transitioned STOPPED → RUNNING; duration is the stop that ended",
            transition: true,
        },
        EventTypeInfo {
            event_type: "stop",
            description: "Asset transitioned RUNNING → STOPPED; duration is the run that ended",
            transition: true,
        },
        EventTypeInfo {
            event_type: "shift",
            description: "Shift lifecycle marker recorded at shift start and end",
            transition: false,
        },
    ];
    (StatusCode::OK, Json(types))
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/config/event-types", get(event_types_handler))
}
