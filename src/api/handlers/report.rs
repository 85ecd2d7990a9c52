//! Device report intake handler.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::{StateReportRequest, StateReportResponse};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, MonitorError};
use crate::service::StateReport;

/// `POST /reports` — Apply a device state report.
///
/// # Errors
///
/// Returns [`MonitorError::LoggerChannelNotFound`] if the logger/channel
/// pair has no asset mapped.
#[utoipa::path(
    post,
    path = "/api/v1/reports",
    tag = "Reports",
    summary = "Apply a device state report",
    description = "Ingests a logger's running/stopped report. Elapsed time since the previous report is attributed to the asset's prior state; a transition event is journaled only when the state actually changed.",
    request_body = StateReportRequest,
    responses(
        (status = 200, description = "Report applied", body = StateReportResponse),
        (status = 404, description = "Unknown logger/channel", body = ErrorResponse),
    )
)]
pub async fn apply_report(
    State(state): State<AppState>,
    Json(req): Json<StateReportRequest>,
) -> Result<impl IntoResponse, MonitorError> {
    let timestamp = req.parsed_timestamp();
    let outcome = state
        .report_service
        .apply_state_report(StateReport {
            logger_id: req.logger_id,
            channel: req.channel,
            is_running: req.is_running,
            timestamp,
        })
        .await?;

    Ok(Json(StateReportResponse::from(outcome)))
}

/// Report intake routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/reports", post(apply_report))
}
