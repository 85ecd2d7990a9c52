//! plantwatch server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints and,
//! when enabled, the background event archiver.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::get;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use plantwatch::api;
use plantwatch::app_state::AppState;
use plantwatch::config::MonitorConfig;
use plantwatch::domain::{AssetRegistry, EventBus, EventJournal, ShiftLedger};
use plantwatch::persistence::archiver::{run_archive_cleanup, run_event_archiver};
use plantwatch::persistence::postgres::PostgresPersistence;
use plantwatch::service::{ReportService, ShiftService};
use plantwatch::ws::handler::ws_handler;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = Arc::new(MonitorConfig::from_env()?);
    tracing::info!(addr = %config.listen_addr, "starting plantwatch");

    // Build domain layer
    let registry = Arc::new(AssetRegistry::new());
    let journal = Arc::new(EventJournal::new());
    let ledger = Arc::new(ShiftLedger::new());
    let event_bus = EventBus::new(config.event_bus_capacity);

    // Build service layer
    let report_service = Arc::new(ReportService::new(
        Arc::clone(&registry),
        Arc::clone(&journal),
        Arc::clone(&ledger),
        event_bus.clone(),
    ));
    let shift_service = Arc::new(ShiftService::new(
        registry,
        journal,
        Arc::clone(&ledger),
        event_bus.clone(),
    ));

    // Optional write-behind archive
    if config.archive_enabled {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect_lazy(&config.database_url)?;
        let persistence = Arc::new(PostgresPersistence::new(pool));

        tokio::spawn(run_event_archiver(
            Arc::clone(&persistence),
            ledger,
            event_bus.subscribe(),
        ));
        tokio::spawn(run_archive_cleanup(
            persistence,
            config.archive_cleanup_after_days,
        ));
        tracing::info!("event archiver enabled");
    }

    // Build application state
    let app_state = AppState {
        report_service,
        shift_service,
        event_bus,
        config: Arc::clone(&config),
    };

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
