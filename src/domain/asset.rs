//! Asset record combining logger mapping with lifetime counters.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::AssetId;

/// Default short-stop classification threshold in seconds.
pub const DEFAULT_SHORT_STOP_THRESHOLD_SECS: u64 = 300;

/// Default long-stop classification threshold in seconds.
pub const DEFAULT_LONG_STOP_THRESHOLD_SECS: u64 = 1800;

/// Observed running state of a machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, serde::Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MachineState {
    /// The machine is producing.
    Running,
    /// The machine is stopped.
    Stopped,
}

impl MachineState {
    /// Maps a device's boolean running flag to a state.
    #[must_use]
    pub const fn from_running(is_running: bool) -> Self {
        if is_running { Self::Running } else { Self::Stopped }
    }

    /// Returns the state as a static string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Stopped => "stopped",
        }
    }
}

/// A monitored machine mapped to one input channel of a field logger.
///
/// Each asset in the registry is stored as an `Asset`. The counter
/// fields are lifetime totals: monotonically non-decreasing, mutated
/// exclusively by the report accumulation path.
#[derive(Debug, Clone)]
pub struct Asset {
    /// Unique asset identifier (immutable after registration).
    pub id: AssetId,

    /// Field logger device identifier.
    pub logger_id: String,

    /// Physical input channel on the logger.
    pub channel: u16,

    /// Human-readable asset name.
    pub name: String,

    /// Last observed running state.
    pub current_state: MachineState,

    /// Cumulative running time in milliseconds.
    pub runtime_ms: u64,

    /// Cumulative stopped time in milliseconds.
    pub downtime_ms: u64,

    /// Number of RUNNING → STOPPED transitions observed.
    pub total_stops: u64,

    /// Timestamp of the last accepted state report.
    pub last_state_change: DateTime<Utc>,

    /// Cached availability, derived from the counters.
    pub availability_percent: f64,

    /// Stops at or below this duration are classified as short stops.
    pub short_stop_threshold_secs: u64,

    /// Stops above this duration are logged as long stops.
    pub long_stop_threshold_secs: u64,

    /// Registration timestamp (immutable after creation).
    pub created_at: DateTime<Utc>,
}

impl Asset {
    /// Creates a new asset starting in the given state with zeroed counters.
    #[must_use]
    pub fn new(
        id: AssetId,
        logger_id: String,
        channel: u16,
        name: String,
        initial_state: MachineState,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            logger_id,
            channel,
            name,
            current_state: initial_state,
            runtime_ms: 0,
            downtime_ms: 0,
            total_stops: 0,
            last_state_change: now,
            availability_percent: 0.0,
            short_stop_threshold_secs: DEFAULT_SHORT_STOP_THRESHOLD_SECS,
            long_stop_threshold_secs: DEFAULT_LONG_STOP_THRESHOLD_SECS,
            created_at: now,
        }
    }
}

/// Computes availability as `runtime / (runtime + downtime) * 100`.
///
/// Returns `0.0` when no time has been tracked yet, so the derivation
/// never divides by zero. The result is always within `[0, 100]`.
#[must_use]
pub fn availability_percent(runtime_ms: u64, downtime_ms: u64) -> f64 {
    let total = runtime_ms.saturating_add(downtime_ms);
    if total == 0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    {
        runtime_ms as f64 / total as f64 * 100.0
    }
}

/// Lightweight summary of an asset for list endpoints.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AssetSummary {
    /// Asset identifier.
    pub id: AssetId,
    /// Field logger device identifier.
    pub logger_id: String,
    /// Physical input channel on the logger.
    pub channel: u16,
    /// Human-readable asset name.
    pub name: String,
    /// Last observed running state.
    pub current_state: MachineState,
    /// Cumulative running time in milliseconds.
    pub runtime_ms: u64,
    /// Cumulative stopped time in milliseconds.
    pub downtime_ms: u64,
    /// Number of RUNNING → STOPPED transitions observed.
    pub total_stops: u64,
    /// Cached availability percentage.
    pub availability_percent: f64,
    /// Timestamp of the last accepted state report.
    pub last_state_change: DateTime<Utc>,
}

impl From<&Asset> for AssetSummary {
    fn from(asset: &Asset) -> Self {
        Self {
            id: asset.id,
            logger_id: asset.logger_id.clone(),
            channel: asset.channel,
            name: asset.name.clone(),
            current_state: asset.current_state,
            runtime_ms: asset.runtime_ms,
            downtime_ms: asset.downtime_ms,
            total_stops: asset.total_stops,
            availability_percent: asset.availability_percent,
            last_state_change: asset.last_state_change,
        }
    }
}
