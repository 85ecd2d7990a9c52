//! Asset-related DTOs for registration, get, and list operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::common_dto::PaginationMeta;
use crate::domain::{Asset, AssetId, AssetSummary, MachineState};

/// Request body for `POST /assets`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterAssetRequest {
    /// Logger device identifier.
    pub logger_id: String,
    /// Input channel on the logger.
    pub channel: u16,
    /// Human-readable asset name.
    pub name: String,
    /// Initial observed state; defaults to stopped.
    #[serde(default)]
    pub initial_running: bool,
    /// Short-stop threshold override, in seconds.
    #[serde(default)]
    pub short_stop_threshold_secs: Option<u64>,
    /// Long-stop threshold override, in seconds.
    #[serde(default)]
    pub long_stop_threshold_secs: Option<u64>,
}

/// Full asset detail for `POST /assets` and `GET /assets/:id`.
#[derive(Debug, Serialize, ToSchema)]
pub struct AssetDetailResponse {
    /// Asset identifier.
    pub id: AssetId,
    /// Logger device identifier.
    pub logger_id: String,
    /// Input channel on the logger.
    pub channel: u16,
    /// Asset name.
    pub name: String,
    /// Last observed state.
    pub current_state: MachineState,
    /// Lifetime running time in milliseconds.
    pub runtime_ms: u64,
    /// Lifetime stopped time in milliseconds.
    pub downtime_ms: u64,
    /// Lifetime stop count.
    pub total_stops: u64,
    /// Cached availability percentage.
    pub availability_percent: f64,
    /// Timestamp of the last accepted report.
    pub last_state_change: DateTime<Utc>,
    /// Short-stop threshold in seconds.
    pub short_stop_threshold_secs: u64,
    /// Long-stop threshold in seconds.
    pub long_stop_threshold_secs: u64,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<&Asset> for AssetDetailResponse {
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
            short_stop_threshold_secs: asset.short_stop_threshold_secs,
            long_stop_threshold_secs: asset.long_stop_threshold_secs,
            created_at: asset.created_at,
        }
    }
}

/// Paginated list response for `GET /assets`.
#[derive(Debug, Serialize, ToSchema)]
pub struct AssetListResponse {
    /// Asset summaries.
    pub data: Vec<AssetSummary>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}
