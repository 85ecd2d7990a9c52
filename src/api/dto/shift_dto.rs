//! Shift-related DTOs for start, end, get, and list operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Shift, ShiftAssetState, ShiftId};

/// Request body for `POST /shifts/start`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct StartShiftRequest {
    /// Optional shift name; defaults to `"Shift {number}"`.
    #[serde(default)]
    pub name: Option<String>,
    /// Optional operator notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Request body for `POST /shifts/end`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct EndShiftRequest {
    /// Optional closing notes; existing notes are kept when absent.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Full shift detail returned by shift endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct ShiftResponse {
    /// Shift identifier.
    pub id: ShiftId,
    /// Shift sequence number.
    pub shift_number: u64,
    /// Shift name.
    pub name: String,
    /// When the shift opened.
    pub start_time: DateTime<Utc>,
    /// When the shift closed, if it has.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    /// Whether this shift is active.
    pub active: bool,
    /// Per-asset shift-scoped states.
    pub asset_states: Vec<ShiftAssetState>,
    /// Aggregate running time in milliseconds.
    pub runtime_ms: u64,
    /// Aggregate stopped time in milliseconds.
    pub downtime_ms: u64,
    /// Aggregate stop count.
    pub stops: u64,
    /// Aggregate availability percentage.
    pub availability_percent: f64,
    /// Operator notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl From<Shift> for ShiftResponse {
    fn from(shift: Shift) -> Self {
        Self {
            id: shift.id,
            shift_number: shift.shift_number,
            name: shift.name,
            start_time: shift.start_time,
            end_time: shift.end_time,
            active: shift.active,
            asset_states: shift.asset_states,
            runtime_ms: shift.runtime_ms,
            downtime_ms: shift.downtime_ms,
            stops: shift.stops,
            availability_percent: shift.availability_percent,
            notes: shift.notes,
        }
    }
}

/// Lightweight shift summary for list responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct ShiftSummaryDto {
    /// Shift identifier.
    pub id: ShiftId,
    /// Shift sequence number.
    pub shift_number: u64,
    /// Shift name.
    pub name: String,
    /// When the shift opened.
    pub start_time: DateTime<Utc>,
    /// When the shift closed, if it has.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    /// Whether this shift is active.
    pub active: bool,
    /// Aggregate availability percentage.
    pub availability_percent: f64,
}

impl From<&Shift> for ShiftSummaryDto {
    fn from(shift: &Shift) -> Self {
        Self {
            id: shift.id,
            shift_number: shift.shift_number,
            name: shift.name.clone(),
            start_time: shift.start_time,
            end_time: shift.end_time,
            active: shift.active,
            availability_percent: shift.availability_percent,
        }
    }
}

/// Response body for `GET /shifts`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ShiftListResponse {
    /// Shift summaries, newest first.
    pub data: Vec<ShiftSummaryDto>,
    /// Total number of shifts.
    pub total: usize,
}
