//! Journal entries recording asset state transitions and shift markers.
//!
//! Events are immutable once appended to the [`super::EventJournal`].
//! A START or STOP event is created only when an asset's observed state
//! actually changes; SHIFT events bracket shift start and end.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{AssetId, EventId, MachineState, ShiftId};

/// Discriminator for journal event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// The asset transitioned STOPPED → RUNNING.
    Start,
    /// The asset transitioned RUNNING → STOPPED.
    Stop,
    /// Shift lifecycle marker (start or end of a shift).
    Shift,
}

impl EventType {
    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Shift => "shift",
        }
    }
}

/// Per-asset metrics carried by shift-end SHIFT events.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ShiftAssetMetrics {
    /// Running time attributed to the shift window, in milliseconds.
    pub runtime_ms: u64,
    /// Stopped time attributed to the shift window, in milliseconds.
    pub downtime_ms: u64,
    /// Stops counted within the shift window.
    pub stops: u64,
    /// Shift-scoped availability percentage.
    pub availability_percent: f64,
}

/// An immutable entry in the event journal.
///
/// `duration_ms` is the elapsed time attributed to the state that just
/// ended — for a STOP event it is the length of the run that preceded
/// it, for a START event the length of the stop. Durations are kept as
/// integer milliseconds so downstream aggregation sums exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEvent {
    /// Unique event identifier.
    pub id: EventId,

    /// Asset this event belongs to.
    pub asset_id: AssetId,

    /// Event kind.
    pub event_type: EventType,

    /// Asset state after this event.
    pub state: MachineState,

    /// Elapsed time attributed to the state that just ended.
    pub duration_ms: u64,

    /// Set only on STOP events: whether the event's attributed duration
    /// was at or below the asset's short-stop threshold.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_short_stop: Option<bool>,

    /// Shift this event is attributed to, if one was active.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shift_id: Option<ShiftId>,

    /// Per-asset metrics, present only on shift-end SHIFT events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shift_metrics: Option<ShiftAssetMetrics>,

    /// Free-form annotation (e.g. `"Shift started"`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    /// Event timestamp. Monotonically increasing per asset.
    pub timestamp: DateTime<Utc>,
}

impl JournalEvent {
    /// Builds a transition event (START or STOP) for an asset.
    ///
    /// `is_short_stop` is derived only for STOP events, comparing the
    /// duration against the asset's short-stop threshold.
    #[must_use]
    pub fn transition(
        asset_id: AssetId,
        new_state: MachineState,
        duration_ms: u64,
        short_stop_threshold_secs: u64,
        shift_id: Option<ShiftId>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let (event_type, is_short_stop) = match new_state {
            MachineState::Running => (EventType::Start, None),
            MachineState::Stopped => (
                EventType::Stop,
                Some(duration_ms <= short_stop_threshold_secs.saturating_mul(1000)),
            ),
        };
        Self {
            id: EventId::new(),
            asset_id,
            event_type,
            state: new_state,
            duration_ms,
            is_short_stop,
            shift_id,
            shift_metrics: None,
            note: None,
            timestamp,
        }
    }

    /// Builds a SHIFT marker event for an asset.
    #[must_use]
    pub fn shift_marker(
        asset_id: AssetId,
        state: MachineState,
        shift_id: ShiftId,
        note: &str,
        metrics: Option<ShiftAssetMetrics>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: EventId::new(),
            asset_id,
            event_type: EventType::Shift,
            state,
            duration_ms: 0,
            is_short_stop: None,
            shift_id: Some(shift_id),
            shift_metrics: metrics,
            note: Some(note.to_string()),
            timestamp,
        }
    }

    /// Returns the duration in fractional seconds.
    #[must_use]
    pub fn duration_secs(&self) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        {
            self.duration_ms as f64 / 1000.0
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn stop_transition_classifies_short_stop() {
        let event = JournalEvent::transition(
            AssetId::new(),
            MachineState::Stopped,
            5_000,
            300,
            None,
            Utc::now(),
        );
        assert_eq!(event.event_type, EventType::Stop);
        assert_eq!(event.is_short_stop, Some(true));
    }

    #[test]
    fn stop_transition_over_threshold_is_not_short() {
        let event = JournalEvent::transition(
            AssetId::new(),
            MachineState::Stopped,
            301_000,
            300,
            None,
            Utc::now(),
        );
        assert_eq!(event.is_short_stop, Some(false));
    }

    #[test]
    fn stop_at_exact_threshold_is_short() {
        let event = JournalEvent::transition(
            AssetId::new(),
            MachineState::Stopped,
            300_000,
            300,
            None,
            Utc::now(),
        );
        assert_eq!(event.is_short_stop, Some(true));
    }

    #[test]
    fn start_transition_has_no_short_stop_flag() {
        let event = JournalEvent::transition(
            AssetId::new(),
            MachineState::Running,
            10_000,
            300,
            None,
            Utc::now(),
        );
        assert_eq!(event.event_type, EventType::Start);
        assert_eq!(event.is_short_stop, None);
    }

    #[test]
    fn shift_marker_carries_note_and_metrics() {
        let shift_id = ShiftId::new();
        let metrics = ShiftAssetMetrics {
            runtime_ms: 3_600_000,
            downtime_ms: 1_800_000,
            stops: 2,
            availability_percent: 66.67,
        };
        let event = JournalEvent::shift_marker(
            AssetId::new(),
            MachineState::Running,
            shift_id,
            "Shift ended",
            Some(metrics),
            Utc::now(),
        );
        assert_eq!(event.event_type, EventType::Shift);
        assert_eq!(event.shift_id, Some(shift_id));
        assert_eq!(event.note.as_deref(), Some("Shift ended"));
        assert!(event.shift_metrics.is_some());
    }

    #[test]
    fn duration_secs_is_fractional() {
        let event = JournalEvent::transition(
            AssetId::new(),
            MachineState::Running,
            1_500,
            300,
            None,
            Utc::now(),
        );
        assert!((event.duration_secs() - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn event_serializes_without_empty_options() {
        let event = JournalEvent::transition(
            AssetId::new(),
            MachineState::Running,
            1_000,
            300,
            None,
            Utc::now(),
        );
        let json = serde_json::to_string(&event).unwrap_or_default();
        assert!(json.contains("start"));
        assert!(!json.contains("is_short_stop"));
        assert!(!json.contains("shift_id"));
    }
}
