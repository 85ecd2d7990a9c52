//! Asset handlers: register, list, get, and event queries.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    AssetDetailResponse, AssetListResponse, EventDto, EventListResponse, EventQueryParams,
    PaginationMeta, PaginationParams, RegisterAssetRequest,
};
use crate::app_state::AppState;
use crate::domain::{Asset, AssetId, EventFilter, MachineState, ShiftId};
use crate::error::{ErrorResponse, MonitorError};

/// `POST /assets` — Register a new asset.
///
/// # Errors
///
/// Returns [`MonitorError::InvalidRequest`] if the name is empty or the
/// (logger, channel) pair is already mapped.
#[utoipa::path(
    post,
    path = "/api/v1/assets",
    tag = "Assets",
    summary = "Register an asset",
    description = "Maps a (logger, channel) pair to a new monitored asset with zeroed counters.",
    request_body = RegisterAssetRequest,
    responses(
        (status = 201, description = "Asset registered", body = AssetDetailResponse),
        (status = 400, description = "Invalid request or duplicate mapping", body = ErrorResponse),
    )
)]
pub async fn register_asset(
    State(state): State<AppState>,
    Json(req): Json<RegisterAssetRequest>,
) -> Result<impl IntoResponse, MonitorError> {
    if req.name.trim().is_empty() {
        return Err(MonitorError::InvalidRequest(
            "asset name must not be empty".to_string(),
        ));
    }

    let mut asset = Asset::new(
        AssetId::new(),
        req.logger_id,
        req.channel,
        req.name,
        MachineState::from_running(req.initial_running),
    );
    asset.short_stop_threshold_secs = req
        .short_stop_threshold_secs
        .unwrap_or(state.config.default_short_stop_threshold_secs);
    asset.long_stop_threshold_secs = req
        .long_stop_threshold_secs
        .unwrap_or(state.config.default_long_stop_threshold_secs);

    let response = AssetDetailResponse::from(&asset);
    let asset_id = state.report_service.registry().insert(asset).await?;
    tracing::info!(%asset_id, "asset registered");

    Ok((StatusCode::CREATED, Json(response)))
}

/// `GET /assets` — List all assets with pagination.
///
/// # Errors
///
/// Returns [`MonitorError`] on internal failures.
#[utoipa::path(
    get,
    path = "/api/v1/assets",
    tag = "Assets",
    summary = "List assets",
    description = "Returns a paginated list of all registered assets with live counters.",
    responses(
        (status = 200, description = "Paginated asset list", body = AssetListResponse),
    )
)]
pub async fn list_assets(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<impl IntoResponse, MonitorError> {
    let params = params.clamped();
    let summaries = state.report_service.registry().summaries().await;

    #[allow(clippy::cast_possible_truncation)]
    let total = summaries.len() as u32;
    let per_page = params.per_page;
    let page = params.page;
    let total_pages = if total == 0 {
        0
    } else {
        total.div_ceil(per_page)
    };

    // Offset math in u64: both factors are client-controlled u32s.
    let start = usize::try_from(u64::from(page - 1) * u64::from(per_page)).unwrap_or(usize::MAX);
    let data = summaries
        .into_iter()
        .skip(start)
        .take(per_page as usize)
        .collect();

    Ok(Json(AssetListResponse {
        data,
        pagination: PaginationMeta {
            page,
            per_page,
            total,
            total_pages,
        },
    }))
}

/// `GET /assets/:id` — Get asset details.
///
/// # Errors
///
/// Returns [`MonitorError::AssetNotFound`] if the asset does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/assets/{id}",
    tag = "Assets",
    summary = "Get asset details",
    description = "Returns full details for a single asset including lifetime counters and availability.",
    params(
        ("id" = uuid::Uuid, Path, description = "Asset UUID"),
    ),
    responses(
        (status = 200, description = "Asset details", body = AssetDetailResponse),
        (status = 404, description = "Asset not found", body = ErrorResponse),
    )
)]
pub async fn get_asset(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, MonitorError> {
    let asset_id = AssetId::from_uuid(id);
    let asset_lock = state.report_service.registry().get(asset_id).await?;
    let asset = asset_lock.read().await;
    Ok(Json(AssetDetailResponse::from(&*asset)))
}

/// `GET /assets/:id/events` — Query the journal for one asset.
///
/// # Errors
///
/// Returns [`MonitorError::AssetNotFound`] if the asset does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/assets/{id}/events",
    tag = "Assets",
    summary = "Query asset events",
    description = "Returns journal events for an asset, optionally filtered by shift and time window, ordered ascending by timestamp.",
    params(
        ("id" = uuid::Uuid, Path, description = "Asset UUID"),
    ),
    responses(
        (status = 200, description = "Matching events", body = EventListResponse),
        (status = 404, description = "Asset not found", body = ErrorResponse),
    )
)]
pub async fn list_asset_events(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Query(params): Query<EventQueryParams>,
) -> Result<impl IntoResponse, MonitorError> {
    let asset_id = AssetId::from_uuid(id);
    // Resolve first so an unknown asset is a 404, not an empty list.
    let _ = state.report_service.registry().get(asset_id).await?;

    let events = state
        .report_service
        .journal()
        .query(EventFilter {
            asset_id: Some(asset_id),
            shift_id: params.shift_id.map(ShiftId::from_uuid),
            after: params.after,
            before: params.before,
        })
        .await;

    let data: Vec<EventDto> = events.iter().map(EventDto::from).collect();
    let total = data.len();
    Ok(Json(EventListResponse { data, total }))
}

/// Asset management routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/assets", post(register_asset).get(list_assets))
        .route("/assets/{id}", get(get_asset))
        .route("/assets/{id}/events", get(list_asset_events))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::MonitorConfig;
    use crate::domain::{Asset, AssetRegistry, EventBus, EventJournal, ShiftLedger};
    use crate::service::{ReportService, ShiftService};

    fn test_config() -> MonitorConfig {
        MonitorConfig {
            listen_addr: "127.0.0.1:0".parse().map_or_else(
                |_| panic!("valid listen addr"),
                |addr| addr,
            ),
            database_url: String::new(),
            database_max_connections: 1,
            database_connect_timeout_secs: 1,
            archive_enabled: false,
            archive_cleanup_after_days: 30,
            event_bus_capacity: 100,
            default_short_stop_threshold_secs: 300,
            default_long_stop_threshold_secs: 1800,
        }
    }

    async fn test_state(asset_count: u16) -> AppState {
        let registry = Arc::new(AssetRegistry::new());
        let journal = Arc::new(EventJournal::new());
        let ledger = Arc::new(ShiftLedger::new());
        let event_bus = EventBus::new(100);

        for channel in 0..asset_count {
            let asset = Asset::new(
                AssetId::new(),
                "logger-1".to_string(),
                channel,
                format!("machine-{channel}"),
                MachineState::Stopped,
            );
            let _ = registry.insert(asset).await;
        }

        AppState {
            report_service: Arc::new(ReportService::new(
                Arc::clone(&registry),
                Arc::clone(&journal),
                Arc::clone(&ledger),
                event_bus.clone(),
            )),
            shift_service: Arc::new(ShiftService::new(registry, journal, ledger, event_bus.clone())),
            event_bus,
            config: Arc::new(test_config()),
        }
    }

    #[tokio::test]
    async fn list_survives_extreme_pagination_values() {
        let state = test_state(3).await;
        let params = PaginationParams {
            page: u32::MAX,
            per_page: 100,
        };
        let result = list_assets(State(state), Query(params)).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn list_first_page_succeeds() {
        let state = test_state(3).await;
        let params = PaginationParams {
            page: 1,
            per_page: 2,
        };
        let result = list_assets(State(state), Query(params)).await;
        assert!(result.is_ok());
    }
}
