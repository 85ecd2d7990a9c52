//! Shift lifecycle handlers: start, end, get, and list.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    EndShiftRequest, ShiftListResponse, ShiftResponse, ShiftSummaryDto, StartShiftRequest,
};
use crate::app_state::AppState;
use crate::domain::ShiftId;
use crate::error::{ErrorResponse, MonitorError};

/// `POST /shifts/start` — Open a new shift.
///
/// # Errors
///
/// Returns [`MonitorError::ShiftAlreadyActive`] if a shift is active or
/// [`MonitorError::NoAssetsConfigured`] if no assets are registered.
#[utoipa::path(
    post,
    path = "/api/v1/shifts/start",
    tag = "Shifts",
    summary = "Start a shift",
    description = "Opens a new shift, snapshotting every registered asset with zeroed shift-scoped counters. At most one shift may be active at a time.",
    request_body = StartShiftRequest,
    responses(
        (status = 201, description = "Shift started", body = ShiftResponse),
        (status = 400, description = "No assets configured", body = ErrorResponse),
        (status = 409, description = "A shift is already active", body = ErrorResponse),
    )
)]
pub async fn start_shift(
    State(state): State<AppState>,
    Json(req): Json<StartShiftRequest>,
) -> Result<impl IntoResponse, MonitorError> {
    let (shift, _events) = state.shift_service.start_shift(req.name, req.notes).await?;
    Ok((StatusCode::CREATED, Json(ShiftResponse::from(shift))))
}

/// `POST /shifts/end` — Close the active shift.
///
/// # Errors
///
/// Returns [`MonitorError::NoActiveShift`] if no shift is active.
#[utoipa::path(
    post,
    path = "/api/v1/shifts/end",
    tag = "Shifts",
    summary = "End the active shift",
    description = "Closes the active shift, recomputing per-asset shift-scoped metrics from journal events and aggregating them.",
    request_body = EndShiftRequest,
    responses(
        (status = 200, description = "Shift ended", body = ShiftResponse),
        (status = 404, description = "No active shift", body = ErrorResponse),
    )
)]
pub async fn end_shift(
    State(state): State<AppState>,
    Json(req): Json<EndShiftRequest>,
) -> Result<impl IntoResponse, MonitorError> {
    let (shift, _events) = state.shift_service.end_shift(req.notes).await?;
    Ok(Json(ShiftResponse::from(shift)))
}

/// `GET /shifts/active` — Get the currently active shift.
///
/// # Errors
///
/// Returns [`MonitorError::NoActiveShift`] if no shift is active.
#[utoipa::path(
    get,
    path = "/api/v1/shifts/active",
    tag = "Shifts",
    summary = "Get the active shift",
    responses(
        (status = 200, description = "Active shift", body = ShiftResponse),
        (status = 404, description = "No active shift", body = ErrorResponse),
    )
)]
pub async fn get_active_shift(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, MonitorError> {
    let shift = state
        .shift_service
        .ledger()
        .get_active()
        .await
        .ok_or(MonitorError::NoActiveShift)?;
    Ok(Json(ShiftResponse::from(shift)))
}

/// `GET /shifts/:id` — Get shift details.
///
/// # Errors
///
/// Returns [`MonitorError::ShiftNotFound`] if the shift does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/shifts/{id}",
    tag = "Shifts",
    summary = "Get shift details",
    params(
        ("id" = uuid::Uuid, Path, description = "Shift UUID"),
    ),
    responses(
        (status = 200, description = "Shift details", body = ShiftResponse),
        (status = 404, description = "Shift not found", body = ErrorResponse),
    )
)]
pub async fn get_shift(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, MonitorError> {
    let shift = state
        .shift_service
        .ledger()
        .get(ShiftId::from_uuid(id))
        .await?;
    Ok(Json(ShiftResponse::from(shift)))
}

/// `GET /shifts` — List all shifts, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/shifts",
    tag = "Shifts",
    summary = "List shifts",
    responses(
        (status = 200, description = "Shift list, newest first", body = ShiftListResponse),
    )
)]
pub async fn list_shifts(State(state): State<AppState>) -> impl IntoResponse {
    let shifts = state.shift_service.ledger().list_all().await;
    let data: Vec<ShiftSummaryDto> = shifts.iter().map(ShiftSummaryDto::from).collect();
    let total = data.len();
    Json(ShiftListResponse { data, total })
}

/// Shift management routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/shifts", get(list_shifts))
        .route("/shifts/start", post(start_shift))
        .route("/shifts/end", post(end_shift))
        .route("/shifts/active", get(get_active_shift))
        .route("/shifts/{id}", get(get_shift))
}
