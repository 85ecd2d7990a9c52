//! Shift records: bounded work periods with per-asset metric snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{AssetId, MachineState, ShiftId, availability_percent};

/// Shift-scoped state and metrics for one asset.
///
/// Counters start at zero when the shift opens, regardless of the
/// asset's lifetime totals, and are filled in from journal events when
/// the shift closes.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ShiftAssetState {
    /// Asset identifier.
    pub asset_id: AssetId,
    /// Asset state at the most recent snapshot (start or end of shift).
    pub state: MachineState,
    /// Running time within the shift window, in milliseconds.
    pub runtime_ms: u64,
    /// Stopped time within the shift window, in milliseconds.
    pub downtime_ms: u64,
    /// Stops counted within the shift window.
    pub stops: u64,
    /// Shift-scoped availability percentage.
    pub availability_percent: f64,
}

impl ShiftAssetState {
    /// Creates a zeroed entry for an asset at shift start.
    #[must_use]
    pub const fn opening(asset_id: AssetId, state: MachineState) -> Self {
        Self {
            asset_id,
            state,
            runtime_ms: 0,
            downtime_ms: 0,
            stops: 0,
            availability_percent: 0.0,
        }
    }
}

/// A bounded work period over which per-asset metrics are snapshotted.
///
/// At most one shift is active at any time; the invariant is enforced
/// by [`super::ShiftLedger::create`] and by the lifecycle mutex in the
/// shift service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shift {
    /// Unique shift identifier.
    pub id: ShiftId,

    /// Monotonically increasing shift sequence number.
    pub shift_number: u64,

    /// Human-readable shift name.
    pub name: String,

    /// When the shift opened.
    pub start_time: DateTime<Utc>,

    /// When the shift closed. `None` while the shift is active.
    pub end_time: Option<DateTime<Utc>>,

    /// Whether this shift is the currently active one.
    pub active: bool,

    /// Exactly one entry per asset that existed when the shift started.
    pub asset_states: Vec<ShiftAssetState>,

    /// Aggregate running time across all asset entries, in milliseconds.
    pub runtime_ms: u64,

    /// Aggregate stopped time across all asset entries, in milliseconds.
    pub downtime_ms: u64,

    /// Aggregate stop count across all asset entries.
    pub stops: u64,

    /// Aggregate availability computed from the totals above.
    pub availability_percent: f64,

    /// Operator notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Shift {
    /// Opens a new shift with zeroed per-asset entries.
    #[must_use]
    pub fn open(
        shift_number: u64,
        name: String,
        notes: Option<String>,
        asset_states: Vec<ShiftAssetState>,
    ) -> Self {
        Self {
            id: ShiftId::new(),
            shift_number,
            name,
            start_time: Utc::now(),
            end_time: None,
            active: true,
            asset_states,
            runtime_ms: 0,
            downtime_ms: 0,
            stops: 0,
            availability_percent: 0.0,
            notes,
        }
    }

    /// Recomputes the shift-level aggregates from the per-asset entries.
    pub fn recompute_aggregates(&mut self) {
        self.runtime_ms = self
            .asset_states
            .iter()
            .fold(0u64, |acc, s| acc.saturating_add(s.runtime_ms));
        self.downtime_ms = self
            .asset_states
            .iter()
            .fold(0u64, |acc, s| acc.saturating_add(s.downtime_ms));
        self.stops = self
            .asset_states
            .iter()
            .fold(0u64, |acc, s| acc.saturating_add(s.stops));
        self.availability_percent = availability_percent(self.runtime_ms, self.downtime_ms);
    }
}
