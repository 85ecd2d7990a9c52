//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::config::MonitorConfig;
use crate::domain::EventBus;
use crate::service::{ReportService, ShiftService};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Report accumulation service.
    pub report_service: Arc<ReportService>,
    /// Shift lifecycle service.
    pub shift_service: Arc<ShiftService>,
    /// Event bus for WebSocket subscriptions.
    pub event_bus: EventBus,
    /// Loaded service configuration.
    pub config: Arc<MonitorConfig>,
}
