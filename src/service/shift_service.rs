//! Shift service: lifecycle manager for bounded work periods.
//!
//! Enforces the at-most-one-active-shift invariant, snapshots per-asset
//! state when a shift opens, and recomputes shift-scoped per-asset
//! deltas from the event journal when it closes.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;

use crate::domain::{
    AssetRegistry, EventBus, EventFilter, EventJournal, EventType, JournalEvent, MachineState,
    MonitorEvent, Shift, ShiftAssetMetrics, ShiftAssetState, ShiftLedger, availability_percent,
};
use crate::error::MonitorError;

/// Orchestration layer for shift start/end.
///
/// The whole check-then-act sequence of both operations runs under a
/// single lifecycle mutex; without it two concurrent `start_shift`
/// calls could both observe "no active shift" and create two.
#[derive(Debug)]
pub struct ShiftService {
    registry: Arc<AssetRegistry>,
    journal: Arc<EventJournal>,
    ledger: Arc<ShiftLedger>,
    event_bus: EventBus,
    lifecycle: Mutex<()>,
}

impl ShiftService {
    /// Creates a new `ShiftService`.
    #[must_use]
    pub fn new(
        registry: Arc<AssetRegistry>,
        journal: Arc<EventJournal>,
        ledger: Arc<ShiftLedger>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            registry,
            journal,
            ledger,
            event_bus,
            lifecycle: Mutex::new(()),
        }
    }

    /// Returns a reference to the inner [`ShiftLedger`].
    #[must_use]
    pub fn ledger(&self) -> &Arc<ShiftLedger> {
        &self.ledger
    }

    /// Opens a new shift, snapshotting every registered asset with
    /// zeroed shift-scoped counters.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::ShiftAlreadyActive`] if a shift is
    /// already active and [`MonitorError::NoAssetsConfigured`] if no
    /// assets are registered. Neither case mutates anything.
    pub async fn start_shift(
        &self,
        name: Option<String>,
        notes: Option<String>,
    ) -> Result<(Shift, Vec<JournalEvent>), MonitorError> {
        let _guard = self.lifecycle.lock().await;

        if let Some(active) = self.ledger.get_active().await {
            return Err(MonitorError::ShiftAlreadyActive {
                shift_id: active.id,
                name: active.name,
            });
        }

        let assets = self.registry.list_all().await;
        if assets.is_empty() {
            return Err(MonitorError::NoAssetsConfigured);
        }

        let shift_number = self.ledger.next_shift_number().await;
        let name = name.unwrap_or_else(|| format!("Shift {shift_number}"));

        let mut opening_states = Vec::with_capacity(assets.len());
        for asset_lock in &assets {
            let asset = asset_lock.read().await;
            opening_states.push(ShiftAssetState::opening(asset.id, asset.current_state));
        }

        let shift = Shift::open(shift_number, name, notes, opening_states);
        let created = self.ledger.create(shift).await?;

        let mut events = Vec::with_capacity(created.asset_states.len());
        for state in &created.asset_states {
            let event = JournalEvent::shift_marker(
                state.asset_id,
                state.state,
                created.id,
                "Shift started",
                None,
                created.start_time,
            );
            events.push(self.journal.append(event).await);
        }

        let _ = self.event_bus.publish(MonitorEvent::ShiftStarted {
            shift_id: created.id,
            shift_number: created.shift_number,
            name: created.name.clone(),
            asset_count: created.asset_states.len(),
            timestamp: created.start_time,
        });

        tracing::info!(
            shift_id = %created.id,
            shift_number = created.shift_number,
            assets = created.asset_states.len(),
            "shift started"
        );
        Ok((created, events))
    }

    /// Closes the active shift, recomputing per-asset shift-scoped
    /// metrics from journal events and aggregating them.
    ///
    /// Per-asset runtime/downtime/stops come exclusively from the
    /// immutable journal entries tagged with the shift id, never from
    /// the live asset counters, so the continuous report stream cannot
    /// skew the shift totals mid-computation.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::NoActiveShift`] if no shift is active;
    /// no mutation occurs.
    pub async fn end_shift(
        &self,
        notes: Option<String>,
    ) -> Result<(Shift, Vec<JournalEvent>), MonitorError> {
        let _guard = self.lifecycle.lock().await;

        let mut shift = self
            .ledger
            .get_active()
            .await
            .ok_or(MonitorError::NoActiveShift)?;

        let end_time = Utc::now();
        let mut events = Vec::with_capacity(shift.asset_states.len());

        for state in &mut shift.asset_states {
            let shift_events = self
                .journal
                .query(EventFilter {
                    asset_id: Some(state.asset_id),
                    shift_id: Some(shift.id),
                    ..EventFilter::default()
                })
                .await;

            let mut runtime_ms: u64 = 0;
            let mut downtime_ms: u64 = 0;
            let mut stops: u64 = 0;
            for event in &shift_events {
                // Each transition event's duration belongs to the state
                // that preceded it: a STOP event closes a run, a START
                // event closes a stop.
                match event.event_type {
                    EventType::Stop => {
                        runtime_ms = runtime_ms.saturating_add(event.duration_ms);
                        stops = stops.saturating_add(1);
                    }
                    EventType::Start => {
                        downtime_ms = downtime_ms.saturating_add(event.duration_ms);
                    }
                    EventType::Shift => {}
                }
            }

            let availability = availability_percent(runtime_ms, downtime_ms);
            let current_state = match self.registry.get(state.asset_id).await {
                Ok(asset_lock) => asset_lock.read().await.current_state,
                Err(_) => state.state,
            };

            state.state = current_state;
            state.runtime_ms = runtime_ms;
            state.downtime_ms = downtime_ms;
            state.stops = stops;
            state.availability_percent = availability;

            let event = JournalEvent::shift_marker(
                state.asset_id,
                current_state,
                shift.id,
                "Shift ended",
                Some(ShiftAssetMetrics {
                    runtime_ms,
                    downtime_ms,
                    stops,
                    availability_percent: availability,
                }),
                end_time,
            );
            events.push(self.journal.append(event).await);
        }

        shift.recompute_aggregates();
        shift.active = false;
        shift.end_time = Some(end_time);
        if notes.is_some() {
            shift.notes = notes;
        }

        let updated = self.ledger.update(shift).await?;

        let _ = self.event_bus.publish(MonitorEvent::ShiftEnded {
            shift_id: updated.id,
            shift_number: updated.shift_number,
            runtime_ms: updated.runtime_ms,
            downtime_ms: updated.downtime_ms,
            stops: updated.stops,
            availability_percent: updated.availability_percent,
            timestamp: end_time,
        });

        tracing::info!(
            shift_id = %updated.id,
            shift_number = updated.shift_number,
            runtime_ms = updated.runtime_ms,
            downtime_ms = updated.downtime_ms,
            stops = updated.stops,
            "shift ended"
        );
        Ok((updated, events))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{Asset, AssetId};
    use crate::service::report_service::{ReportService, StateReport};
    use chrono::{DateTime, Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 6, 0, 0).single().map_or_else(
            || panic!("valid timestamp"),
            |t| t,
        )
    }

    struct Env {
        report: ReportService,
        shift: ShiftService,
    }

    async fn make_env(asset_count: usize) -> Env {
        let registry = Arc::new(AssetRegistry::new());
        let journal = Arc::new(EventJournal::new());
        let ledger = Arc::new(ShiftLedger::new());
        let event_bus = EventBus::new(1000);

        for i in 0..asset_count {
            let mut asset = Asset::new(
                AssetId::new(),
                "logger-1".to_string(),
                u16::try_from(i).unwrap_or(0),
                format!("machine-{i}"),
                MachineState::Stopped,
            );
            asset.last_state_change = t0();
            let _ = registry.insert(asset).await;
        }

        Env {
            report: ReportService::new(
                Arc::clone(&registry),
                Arc::clone(&journal),
                Arc::clone(&ledger),
                event_bus.clone(),
            ),
            shift: ShiftService::new(registry, journal, ledger, event_bus),
        }
    }

    fn report_at(channel: u16, offset_secs: i64, is_running: bool) -> StateReport {
        StateReport {
            logger_id: "logger-1".to_string(),
            channel,
            is_running,
            timestamp: Some(t0() + Duration::seconds(offset_secs)),
        }
    }

    #[tokio::test]
    async fn start_with_no_assets_is_a_validation_error() {
        let env = make_env(0).await;
        let result = env.shift.start_shift(None, None).await;
        assert!(matches!(result, Err(MonitorError::NoAssetsConfigured)));
        assert!(env.shift.ledger().get_active().await.is_none());
    }

    #[tokio::test]
    async fn start_snapshots_every_asset_zeroed() {
        // Scenario D: three assets, three zeroed entries.
        let env = make_env(3).await;
        let result = env.shift.start_shift(Some("Day".to_string()), None).await;
        let Ok((shift, events)) = result else {
            panic!("start failed");
        };
        assert!(shift.active);
        assert_eq!(shift.shift_number, 1);
        assert_eq!(shift.asset_states.len(), 3);
        for state in &shift.asset_states {
            assert_eq!(state.runtime_ms, 0);
            assert_eq!(state.downtime_ms, 0);
            assert_eq!(state.stops, 0);
        }
        assert_eq!(events.len(), 3);
        assert!(events.iter().all(|e| e.event_type == EventType::Shift));
        assert!(
            events
                .iter()
                .all(|e| e.note.as_deref() == Some("Shift started"))
        );
    }

    #[tokio::test]
    async fn second_start_is_a_conflict() {
        let env = make_env(1).await;
        let _ = env.shift.start_shift(Some("Day".to_string()), None).await;

        let result = env.shift.start_shift(None, None).await;
        let Err(MonitorError::ShiftAlreadyActive { name, .. }) = result else {
            panic!("expected conflict");
        };
        assert_eq!(name, "Day");
        assert_eq!(env.shift.ledger().list_all().await.len(), 1);
    }

    #[tokio::test]
    async fn end_without_active_shift_is_not_found() {
        let env = make_env(1).await;
        let result = env.shift.end_shift(None).await;
        assert!(matches!(result, Err(MonitorError::NoActiveShift)));
    }

    #[tokio::test]
    async fn end_aggregates_journal_events_per_asset() {
        // Scenario E: one asset, 1h runtime and 30min downtime inside
        // the shift window → availability 66.67%.
        let env = make_env(1).await;
        let _ = env.shift.start_shift(None, None).await;

        // Stopped T0 → runs at +60s, stops at +3660s (1h run),
        // runs again at +5460s (30min stop), stops at +5470s.
        let _ = env.report.apply_state_report(report_at(0, 60, true)).await;
        let _ = env
            .report
            .apply_state_report(report_at(0, 3660, false))
            .await;
        let _ = env
            .report
            .apply_state_report(report_at(0, 5460, true))
            .await;
        let _ = env
            .report
            .apply_state_report(report_at(0, 5470, false))
            .await;

        let result = env.shift.end_shift(Some("handover".to_string())).await;
        let Ok((shift, events)) = result else {
            panic!("end failed");
        };

        assert!(!shift.active);
        assert!(shift.end_time.is_some());
        assert_eq!(shift.notes.as_deref(), Some("handover"));

        let Some(state) = shift.asset_states.first() else {
            panic!("asset state missing");
        };
        assert_eq!(state.runtime_ms, 3_600_000 + 10_000);
        // 60s of pre-start downtime plus the 30min stop.
        assert_eq!(state.downtime_ms, 60_000 + 1_800_000);
        assert_eq!(state.stops, 2);

        // Aggregates mirror the single asset.
        assert_eq!(shift.runtime_ms, state.runtime_ms);
        assert_eq!(shift.downtime_ms, state.downtime_ms);
        assert_eq!(shift.stops, 2);

        assert_eq!(events.len(), 1);
        let Some(end_event) = events.first() else {
            panic!("end event missing");
        };
        assert_eq!(end_event.note.as_deref(), Some("Shift ended"));
        let Some(metrics) = end_event.shift_metrics else {
            panic!("metrics missing");
        };
        assert_eq!(metrics.stops, 2);
    }

    #[tokio::test]
    async fn shift_availability_two_thirds() {
        let env = make_env(1).await;
        let _ = env.shift.start_shift(None, None).await;

        // Exactly 1h running then 30min stopped within the shift.
        let _ = env.report.apply_state_report(report_at(0, 0, true)).await;
        let _ = env
            .report
            .apply_state_report(report_at(0, 3600, false))
            .await;
        let _ = env
            .report
            .apply_state_report(report_at(0, 5400, true))
            .await;

        let result = env.shift.end_shift(None).await;
        let Ok((shift, _)) = result else {
            panic!("end failed");
        };
        let Some(state) = shift.asset_states.first() else {
            panic!("asset state missing");
        };
        assert_eq!(state.runtime_ms, 3_600_000);
        assert_eq!(state.downtime_ms, 1_800_000);
        assert!((state.availability_percent - 66.67).abs() < 0.01);
        assert!((shift.availability_percent - 66.67).abs() < 0.01);
    }

    #[tokio::test]
    async fn shift_scope_is_independent_of_lifetime_counters() {
        let env = make_env(1).await;

        // Pre-shift activity accrues lifetime counters only.
        let _ = env.report.apply_state_report(report_at(0, 100, true)).await;
        let _ = env
            .report
            .apply_state_report(report_at(0, 200, false))
            .await;

        let _ = env.shift.start_shift(None, None).await;
        let result = env.shift.end_shift(None).await;
        let Ok((shift, _)) = result else {
            panic!("end failed");
        };

        // No transitions inside the shift window: shift metrics stay zero.
        let Some(state) = shift.asset_states.first() else {
            panic!("asset state missing");
        };
        assert_eq!(state.runtime_ms, 0);
        assert_eq!(state.downtime_ms, 0);
        assert_eq!(state.stops, 0);

        // Lifetime counters are untouched by shift end.
        let assets = env.report.registry().list_all().await;
        let Some(asset_lock) = assets.first() else {
            panic!("asset missing");
        };
        let asset = asset_lock.read().await;
        assert_eq!(asset.downtime_ms, 100_000);
        assert_eq!(asset.runtime_ms, 100_000);
        assert_eq!(asset.total_stops, 1);
    }

    #[tokio::test]
    async fn shift_numbers_are_sequential() {
        let env = make_env(1).await;
        let first = env.shift.start_shift(None, None).await.ok();
        let Some((first, _)) = first else {
            panic!("start failed");
        };
        assert_eq!(first.shift_number, 1);
        let _ = env.shift.end_shift(None).await;

        let second = env.shift.start_shift(None, None).await.ok();
        let Some((second, _)) = second else {
            panic!("start failed");
        };
        assert_eq!(second.shift_number, 2);
    }

    #[tokio::test]
    async fn end_keeps_existing_notes_when_none_given() {
        let env = make_env(1).await;
        let _ = env
            .shift
            .start_shift(None, Some("opening note".to_string()))
            .await;

        let result = env.shift.end_shift(None).await;
        let Ok((shift, _)) = result else {
            panic!("end failed");
        };
        assert_eq!(shift.notes.as_deref(), Some("opening note"));
    }

    #[tokio::test]
    async fn lifecycle_events_are_broadcast() {
        let env = make_env(1).await;
        let mut rx = env.shift.event_bus.subscribe();

        let _ = env.shift.start_shift(None, None).await;
        let started = rx.recv().await;
        let Ok(started) = started else {
            panic!("expected shift_started");
        };
        assert_eq!(started.event_type_str(), "shift_started");

        let _ = env.shift.end_shift(None).await;
        let ended = rx.recv().await;
        let Ok(ended) = ended else {
            panic!("expected shift_ended");
        };
        assert_eq!(ended.event_type_str(), "shift_ended");
    }
}
