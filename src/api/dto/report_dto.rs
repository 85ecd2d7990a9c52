//! DTOs for the device report intake endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{AssetId, MachineState};
use crate::service::ReportOutcome;

/// Request body for `POST /reports`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct StateReportRequest {
    /// Logger device identifier.
    pub logger_id: String,
    /// Input channel on the logger.
    pub channel: u16,
    /// Observed running flag.
    pub is_running: bool,
    /// Optional device timestamp in epoch milliseconds. When absent
    /// the server clock is used.
    #[serde(default)]
    pub timestamp: Option<i64>,
}

impl StateReportRequest {
    /// Converts the optional epoch-millis timestamp to a UTC datetime.
    ///
    /// Malformed (out-of-range) values resolve to `None`, falling back
    /// to the server clock rather than failing the ingest path.
    #[must_use]
    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp.and_then(DateTime::from_timestamp_millis)
    }
}

/// Response body for `POST /reports`.
#[derive(Debug, Serialize, ToSchema)]
pub struct StateReportResponse {
    /// Asset the report resolved to.
    pub asset_id: AssetId,
    /// Asset name.
    pub asset_name: String,
    /// State after the report was applied.
    pub new_state: MachineState,
    /// Time attributed to the previous state, in seconds.
    pub elapsed_sec: f64,
    /// Whether the report changed the observed state.
    pub transitioned: bool,
    /// Short-stop classification for RUNNING → STOPPED transitions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_short_stop: Option<bool>,
}

impl From<ReportOutcome> for StateReportResponse {
    fn from(outcome: ReportOutcome) -> Self {
        Self {
            asset_id: outcome.asset_id,
            asset_name: outcome.asset_name.clone(),
            new_state: outcome.new_state,
            elapsed_sec: outcome.elapsed_secs(),
            transitioned: outcome.transitioned,
            is_short_stop: outcome.is_short_stop,
        }
    }
}
