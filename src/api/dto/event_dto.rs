//! DTOs for journal event queries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{AssetId, EventId, EventType, JournalEvent, MachineState, ShiftId};

/// Query parameters for `GET /assets/:id/events`.
#[derive(Debug, Clone, Deserialize)]
pub struct EventQueryParams {
    /// Restrict to events attributed to this shift.
    #[serde(default)]
    pub shift_id: Option<uuid::Uuid>,
    /// Events strictly after this timestamp.
    #[serde(default)]
    pub after: Option<DateTime<Utc>>,
    /// Events strictly before this timestamp.
    #[serde(default)]
    pub before: Option<DateTime<Utc>>,
}

/// A journal event as returned by the API.
#[derive(Debug, Serialize, ToSchema)]
pub struct EventDto {
    /// Event identifier.
    pub id: EventId,
    /// Asset the event belongs to.
    pub asset_id: AssetId,
    /// Event kind.
    pub event_type: EventType,
    /// Asset state after the event.
    pub state: MachineState,
    /// Duration attributed to the state that just ended, in seconds.
    pub duration_sec: f64,
    /// Short-stop flag, present on STOP events only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_short_stop: Option<bool>,
    /// Shift the event is attributed to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shift_id: Option<ShiftId>,
    /// Free-form annotation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Event timestamp.
    pub timestamp: DateTime<Utc>,
}

impl From<&JournalEvent> for EventDto {
    fn from(event: &JournalEvent) -> Self {
        Self {
            id: event.id,
            asset_id: event.asset_id,
            event_type: event.event_type,
            state: event.state,
            duration_sec: event.duration_secs(),
            is_short_stop: event.is_short_stop,
            shift_id: event.shift_id,
            note: event.note.clone(),
            timestamp: event.timestamp,
        }
    }
}

/// Response body for `GET /assets/:id/events`.
#[derive(Debug, Serialize, ToSchema)]
pub struct EventListResponse {
    /// Matching events, ordered ascending by timestamp.
    pub data: Vec<EventDto>,
    /// Total number of matching events.
    pub total: usize,
}
