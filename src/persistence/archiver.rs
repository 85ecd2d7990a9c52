//! Background task that copies monitoring events into the archive.
//!
//! Subscribes to the event bus and writes each event to PostgreSQL;
//! when a shift closes, the full shift record is archived as well.
//! Archive failures are logged and never block report ingestion.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;

use super::postgres::PostgresPersistence;
use crate::domain::{MonitorEvent, Shift, ShiftLedger};

/// How often the retention sweep runs.
const CLEANUP_INTERVAL: Duration = Duration::from_secs(3600);

/// Consumes events from the bus and writes them to the archive until
/// the bus is closed.
pub async fn run_event_archiver(
    persistence: Arc<PostgresPersistence>,
    ledger: Arc<ShiftLedger>,
    mut event_rx: broadcast::Receiver<MonitorEvent>,
) {
    loop {
        match event_rx.recv().await {
            Ok(event) => {
                let asset_id = event.asset_id().map(|id| *id.as_uuid());
                let event_type = event.event_type_str();
                let payload = match serde_json::to_value(&event) {
                    Ok(value) => value,
                    Err(e) => {
                        tracing::error!(error = %e, "failed to serialize event for archive");
                        continue;
                    }
                };
                if let Err(e) = persistence
                    .save_event(asset_id, event_type, &payload)
                    .await
                {
                    tracing::error!(error = %e, event_type, "failed to archive event");
                }

                if let Some(shift) = ended_shift(&ledger, &event).await
                    && let Err(e) = persistence.archive_shift(&shift).await
                {
                    tracing::error!(error = %e, shift_id = %shift.id, "failed to archive shift");
                }
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                tracing::warn!(lagged = n, "archiver lagged behind event bus");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }

    tracing::debug!("event archiver stopped");
}

/// Resolves the closed shift record a lifecycle event refers to.
///
/// Returns `None` for anything other than a shift-end event, and for
/// shift ids the ledger no longer knows.
async fn ended_shift(ledger: &ShiftLedger, event: &MonitorEvent) -> Option<Shift> {
    let MonitorEvent::ShiftEnded { shift_id, .. } = event else {
        return None;
    };
    ledger.get(*shift_id).await.ok()
}

/// Periodically deletes archived events older than the retention window.
pub async fn run_archive_cleanup(persistence: Arc<PostgresPersistence>, retain_days: u64) {
    let mut interval = tokio::time::interval(CLEANUP_INTERVAL);
    loop {
        interval.tick().await;
        match persistence.delete_old_events(retain_days).await {
            Ok(deleted) if deleted > 0 => {
                tracing::info!(deleted, retain_days, "pruned archived events");
            }
            Ok(_) => {}
            Err(e) => {
                tracing::error!(error = %e, "archive cleanup failed");
            }
        }
    }
}
