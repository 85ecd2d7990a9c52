//! Domain events broadcast after core state mutations.
//!
//! Every transition and shift lifecycle change emits a [`MonitorEvent`]
//! through the [`super::EventBus`]. Events are broadcast to WebSocket
//! subscribers and optionally archived to PostgreSQL.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{AssetId, MachineState, ShiftId};

/// Domain event emitted after a state transition or shift change.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum MonitorEvent {
    /// Emitted when an asset's observed state actually changes.
    ///
    /// No-op heartbeats (unchanged state) never emit this event.
    StateChanged {
        /// Asset identifier.
        asset_id: AssetId,
        /// Asset name at transition time.
        asset_name: String,
        /// Logger device that produced the report.
        logger_id: String,
        /// Logger input channel.
        channel: u16,
        /// New state after the transition.
        state: MachineState,
        /// Time attributed to the state that just ended, in milliseconds.
        elapsed_ms: u64,
        /// Short-stop classification, set only on STOP transitions.
        is_short_stop: Option<bool>,
        /// Transition timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted when a shift opens.
    ShiftStarted {
        /// Shift identifier.
        shift_id: ShiftId,
        /// Shift sequence number.
        shift_number: u64,
        /// Shift name.
        name: String,
        /// Number of assets snapshotted at shift start.
        asset_count: usize,
        /// Shift start timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted when a shift closes.
    ShiftEnded {
        /// Shift identifier.
        shift_id: ShiftId,
        /// Shift sequence number.
        shift_number: u64,
        /// Aggregate running time across all assets, in milliseconds.
        runtime_ms: u64,
        /// Aggregate stopped time across all assets, in milliseconds.
        downtime_ms: u64,
        /// Aggregate stop count.
        stops: u64,
        /// Aggregate availability percentage.
        availability_percent: f64,
        /// Shift end timestamp.
        timestamp: DateTime<Utc>,
    },
}

impl MonitorEvent {
    /// Returns the asset ID for per-asset events, `None` for shift events.
    #[must_use]
    pub const fn asset_id(&self) -> Option<AssetId> {
        match self {
            Self::StateChanged { asset_id, .. } => Some(*asset_id),
            Self::ShiftStarted { .. } | Self::ShiftEnded { .. } => None,
        }
    }

    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::StateChanged { .. } => "state_changed",
            Self::ShiftStarted { .. } => "shift_started",
            Self::ShiftEnded { .. } => "shift_ended",
        }
    }
}
