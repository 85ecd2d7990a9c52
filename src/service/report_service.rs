//! Report service: the asset state accumulation engine.
//!
//! Converts a device's raw state report into counter updates on the
//! asset record and, when the observed state actually changed, a
//! journal event plus a broadcast notification.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::{
    AssetId, AssetRegistry, EventBus, EventJournal, JournalEvent, MachineState, MonitorEvent,
    ShiftLedger, availability_percent,
};
use crate::error::MonitorError;

/// A raw state report from a field logger.
#[derive(Debug, Clone)]
pub struct StateReport {
    /// Logger device identifier.
    pub logger_id: String,
    /// Input channel on the logger.
    pub channel: u16,
    /// Observed running flag.
    pub is_running: bool,
    /// Device-reported timestamp. When absent the server clock is used.
    pub timestamp: Option<DateTime<Utc>>,
}

/// Result of applying a state report.
#[derive(Debug, Clone)]
pub struct ReportOutcome {
    /// Asset the report resolved to.
    pub asset_id: AssetId,
    /// Asset name at report time.
    pub asset_name: String,
    /// State the asset was in before this report.
    pub previous_state: MachineState,
    /// State the asset is in after this report.
    pub new_state: MachineState,
    /// Time attributed to the previous state, in milliseconds.
    pub elapsed_ms: u64,
    /// Whether the state actually changed (an event was journaled).
    pub transitioned: bool,
    /// Short-stop classification, set only on RUNNING → STOPPED.
    pub is_short_stop: Option<bool>,
}

impl ReportOutcome {
    /// Returns the attributed elapsed time in fractional seconds.
    #[must_use]
    pub fn elapsed_secs(&self) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        {
            self.elapsed_ms as f64 / 1000.0
        }
    }
}

/// Accumulation engine for device state reports.
///
/// Stateless coordinator: owns references to the [`AssetRegistry`] for
/// asset state, the [`EventJournal`] for transition events, the
/// [`ShiftLedger`] to tag events with the active shift, and the
/// [`EventBus`] for fire-and-forget notification. Every report follows
/// the pattern: acquire the per-asset write lock → attribute elapsed
/// time → update counters → journal/emit on transition → return.
#[derive(Debug, Clone)]
pub struct ReportService {
    registry: Arc<AssetRegistry>,
    journal: Arc<EventJournal>,
    ledger: Arc<ShiftLedger>,
    event_bus: EventBus,
}

impl ReportService {
    /// Creates a new `ReportService`.
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
        }
    }

    /// Returns a reference to the inner [`AssetRegistry`].
    #[must_use]
    pub fn registry(&self) -> &Arc<AssetRegistry> {
        &self.registry
    }

    /// Returns a reference to the inner [`EventJournal`].
    #[must_use]
    pub fn journal(&self) -> &Arc<EventJournal> {
        &self.journal
    }

    /// Applies a device state report to the asset it resolves to.
    ///
    /// Elapsed time since the last accepted report is attributed to the
    /// state the asset was in *before* this report, on every report —
    /// heartbeats with an unchanged state still accrue time. A journal
    /// event and a broadcast notification are produced only when the
    /// state actually changed. Negative elapsed time (clock skew,
    /// out-of-order arrival) is clamped to zero and never subtracts
    /// from the counters.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::LoggerChannelNotFound`] if the report's
    /// logger/channel pair has no asset mapped; no mutation occurs.
    pub async fn apply_state_report(
        &self,
        report: StateReport,
    ) -> Result<ReportOutcome, MonitorError> {
        let entry_lock = self
            .registry
            .get_by_logger_channel(&report.logger_id, report.channel)
            .await?;
        let mut asset = entry_lock.write().await;

        let effective_ts = report.timestamp.unwrap_or_else(Utc::now);
        let new_state = MachineState::from_running(report.is_running);
        let previous_state = asset.current_state;

        // Idempotency key (asset id, last_state_change): a redelivered
        // report with the same timestamp and unchanged state mutates
        // nothing.
        if report.timestamp == Some(asset.last_state_change) && new_state == previous_state {
            tracing::debug!(
                asset_id = %asset.id,
                logger_id = %asset.logger_id,
                "duplicate report ignored"
            );
            return Ok(ReportOutcome {
                asset_id: asset.id,
                asset_name: asset.name.clone(),
                previous_state,
                new_state,
                elapsed_ms: 0,
                transitioned: false,
                is_short_stop: None,
            });
        }

        #[allow(clippy::cast_sign_loss)]
        let elapsed_ms = (effective_ts - asset.last_state_change)
            .num_milliseconds()
            .max(0) as u64;

        // Attribute elapsed time to the state the asset was in before
        // this report, whether or not the state changed.
        match previous_state {
            MachineState::Running => {
                asset.runtime_ms = asset.runtime_ms.saturating_add(elapsed_ms);
            }
            MachineState::Stopped => {
                asset.downtime_ms = asset.downtime_ms.saturating_add(elapsed_ms);
            }
        }

        let transitioned = new_state != previous_state;
        if transitioned
            && previous_state == MachineState::Running
            && new_state == MachineState::Stopped
        {
            asset.total_stops = asset.total_stops.saturating_add(1);
        }

        asset.availability_percent = availability_percent(asset.runtime_ms, asset.downtime_ms);
        asset.current_state = new_state;
        asset.last_state_change = effective_ts;

        let mut is_short_stop = None;
        if transitioned {
            let shift_id = self.ledger.get_active().await.map(|s| s.id);
            let event = JournalEvent::transition(
                asset.id,
                new_state,
                elapsed_ms,
                asset.short_stop_threshold_secs,
                shift_id,
                effective_ts,
            );
            is_short_stop = event.is_short_stop;

            if new_state == MachineState::Running
                && elapsed_ms > asset.long_stop_threshold_secs.saturating_mul(1000)
            {
                tracing::warn!(
                    asset_id = %asset.id,
                    asset_name = %asset.name,
                    stopped_ms = elapsed_ms,
                    "long stop ended"
                );
            }

            // Append while the per-asset lock is held so journal order
            // matches report order for this asset.
            let _ = self.journal.append(event).await;
        }

        let outcome = ReportOutcome {
            asset_id: asset.id,
            asset_name: asset.name.clone(),
            previous_state,
            new_state,
            elapsed_ms,
            transitioned,
            is_short_stop,
        };
        let logger_id = asset.logger_id.clone();
        let channel = asset.channel;
        drop(asset);

        if transitioned {
            let _ = self.event_bus.publish(MonitorEvent::StateChanged {
                asset_id: outcome.asset_id,
                asset_name: outcome.asset_name.clone(),
                logger_id,
                channel,
                state: new_state,
                elapsed_ms,
                is_short_stop,
                timestamp: effective_ts,
            });
            tracing::info!(
                asset_id = %outcome.asset_id,
                state = new_state.as_str(),
                elapsed_ms,
                "asset state changed"
            );
        }

        Ok(outcome)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{Asset, EventFilter, EventType};
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 6, 0, 0).single().map_or_else(
            || panic!("valid timestamp"),
            |t| t,
        )
    }

    async fn make_service_with_asset(initial: MachineState) -> (ReportService, AssetId) {
        let registry = Arc::new(AssetRegistry::new());
        let journal = Arc::new(EventJournal::new());
        let ledger = Arc::new(ShiftLedger::new());
        let event_bus = EventBus::new(1000);

        let mut asset = Asset::new(
            AssetId::new(),
            "logger-1".to_string(),
            0,
            "press".to_string(),
            initial,
        );
        asset.last_state_change = t0();
        let id = asset.id;
        let _ = registry.insert(asset).await;

        (
            ReportService::new(registry, journal, ledger, event_bus),
            id,
        )
    }

    fn report_at(offset_secs: i64, is_running: bool) -> StateReport {
        StateReport {
            logger_id: "logger-1".to_string(),
            channel: 0,
            is_running,
            timestamp: Some(t0() + Duration::seconds(offset_secs)),
        }
    }

    #[tokio::test]
    async fn unknown_logger_is_rejected_without_mutation() {
        let (service, id) = make_service_with_asset(MachineState::Stopped).await;

        let result = service
            .apply_state_report(StateReport {
                logger_id: "logger-9".to_string(),
                channel: 0,
                is_running: true,
                timestamp: None,
            })
            .await;
        assert!(matches!(
            result,
            Err(MonitorError::LoggerChannelNotFound { .. })
        ));

        let asset = service.registry().get(id).await.ok();
        let Some(asset) = asset else {
            panic!("asset missing");
        };
        let asset = asset.read().await;
        assert_eq!(asset.downtime_ms, 0);
        assert!(service.journal().is_empty().await);
    }

    #[tokio::test]
    async fn stopped_to_running_attributes_downtime() {
        // Scenario A: stopped at T0, report running at T0+10s.
        let (service, id) = make_service_with_asset(MachineState::Stopped).await;

        let outcome = service.apply_state_report(report_at(10, true)).await.ok();
        let Some(outcome) = outcome else {
            panic!("report failed");
        };
        assert_eq!(outcome.new_state, MachineState::Running);
        assert_eq!(outcome.elapsed_ms, 10_000);
        assert!(outcome.transitioned);

        let asset_lock = service.registry().get(id).await.ok();
        let Some(asset_lock) = asset_lock else {
            panic!("asset missing");
        };
        let asset = asset_lock.read().await;
        assert_eq!(asset.downtime_ms, 10_000);
        assert_eq!(asset.runtime_ms, 0);
        assert_eq!(asset.total_stops, 0);
        assert_eq!(asset.current_state, MachineState::Running);
        drop(asset);

        let events = service.journal().query(EventFilter::default()).await;
        assert_eq!(events.len(), 1);
        let Some(event) = events.first() else {
            panic!("event missing");
        };
        assert_eq!(event.event_type, EventType::Start);
        assert_eq!(event.duration_ms, 10_000);
        assert_eq!(event.is_short_stop, None);
    }

    #[tokio::test]
    async fn running_to_stopped_counts_a_short_stop() {
        // Scenario B: continue from A, report stopped 5s later.
        let (service, id) = make_service_with_asset(MachineState::Stopped).await;
        let _ = service.apply_state_report(report_at(10, true)).await;

        let outcome = service.apply_state_report(report_at(15, false)).await.ok();
        let Some(outcome) = outcome else {
            panic!("report failed");
        };
        assert_eq!(outcome.elapsed_ms, 5_000);
        assert_eq!(outcome.is_short_stop, Some(true));

        let asset_lock = service.registry().get(id).await.ok();
        let Some(asset_lock) = asset_lock else {
            panic!("asset missing");
        };
        let asset = asset_lock.read().await;
        assert_eq!(asset.runtime_ms, 5_000);
        assert_eq!(asset.total_stops, 1);
        drop(asset);

        let stops = service
            .journal()
            .query(EventFilter {
                asset_id: Some(id),
                ..EventFilter::default()
            })
            .await;
        let stop_event = stops.iter().find(|e| e.event_type == EventType::Stop);
        let Some(stop_event) = stop_event else {
            panic!("stop event missing");
        };
        assert_eq!(stop_event.duration_ms, 5_000);
        assert_eq!(stop_event.is_short_stop, Some(true));
    }

    #[tokio::test]
    async fn heartbeat_accrues_time_without_event() {
        // Scenario C: unchanged state still attributes elapsed time.
        let (service, id) = make_service_with_asset(MachineState::Stopped).await;

        let outcome = service.apply_state_report(report_at(30, false)).await.ok();
        let Some(outcome) = outcome else {
            panic!("report failed");
        };
        assert!(!outcome.transitioned);
        assert_eq!(outcome.elapsed_ms, 30_000);

        let asset_lock = service.registry().get(id).await.ok();
        let Some(asset_lock) = asset_lock else {
            panic!("asset missing");
        };
        let asset = asset_lock.read().await;
        assert_eq!(asset.downtime_ms, 30_000);
        drop(asset);

        assert!(service.journal().is_empty().await);
    }

    #[tokio::test]
    async fn accumulation_matches_sum_of_attributions() {
        let (service, id) = make_service_with_asset(MachineState::Stopped).await;

        let mut attributed: u64 = 0;
        for (offset, running) in [(10, true), (25, true), (40, false), (41, false), (90, true)] {
            let outcome = service
                .apply_state_report(report_at(offset, running))
                .await
                .ok();
            let Some(outcome) = outcome else {
                panic!("report failed");
            };
            attributed += outcome.elapsed_ms;
        }

        let asset_lock = service.registry().get(id).await.ok();
        let Some(asset_lock) = asset_lock else {
            panic!("asset missing");
        };
        let asset = asset_lock.read().await;
        assert_eq!(asset.runtime_ms + asset.downtime_ms, attributed);
        assert_eq!(asset.runtime_ms + asset.downtime_ms, 90_000);
        assert_eq!(asset.total_stops, 1);
        assert!(asset.availability_percent >= 0.0 && asset.availability_percent <= 100.0);
    }

    #[tokio::test]
    async fn negative_elapsed_is_clamped_to_zero() {
        let (service, id) = make_service_with_asset(MachineState::Stopped).await;
        let _ = service.apply_state_report(report_at(60, false)).await;

        // Out-of-order report dated before the last accepted one.
        let outcome = service.apply_state_report(report_at(30, true)).await.ok();
        let Some(outcome) = outcome else {
            panic!("report failed");
        };
        assert_eq!(outcome.elapsed_ms, 0);
        assert!(outcome.transitioned);

        let asset_lock = service.registry().get(id).await.ok();
        let Some(asset_lock) = asset_lock else {
            panic!("asset missing");
        };
        let asset = asset_lock.read().await;
        assert_eq!(asset.downtime_ms, 60_000);
        assert_eq!(asset.runtime_ms, 0);
    }

    #[tokio::test]
    async fn duplicate_report_is_ignored() {
        let (service, id) = make_service_with_asset(MachineState::Stopped).await;
        let _ = service.apply_state_report(report_at(10, false)).await;
        let before = {
            let asset_lock = service.registry().get(id).await.ok();
            let Some(asset_lock) = asset_lock else {
                panic!("asset missing");
            };
            let asset = asset_lock.read().await;
            asset.downtime_ms
        };

        // Redelivery of the same report.
        let outcome = service.apply_state_report(report_at(10, false)).await.ok();
        let Some(outcome) = outcome else {
            panic!("report failed");
        };
        assert_eq!(outcome.elapsed_ms, 0);
        assert!(!outcome.transitioned);

        let asset_lock = service.registry().get(id).await.ok();
        let Some(asset_lock) = asset_lock else {
            panic!("asset missing");
        };
        let asset = asset_lock.read().await;
        assert_eq!(asset.downtime_ms, before);
    }

    #[tokio::test]
    async fn stop_counter_only_on_running_to_stopped() {
        let (service, id) = make_service_with_asset(MachineState::Stopped).await;
        let _ = service.apply_state_report(report_at(10, true)).await;
        let _ = service.apply_state_report(report_at(20, true)).await;
        let _ = service.apply_state_report(report_at(30, false)).await;
        let _ = service.apply_state_report(report_at(40, false)).await;
        let _ = service.apply_state_report(report_at(50, true)).await;

        let asset_lock = service.registry().get(id).await.ok();
        let Some(asset_lock) = asset_lock else {
            panic!("asset missing");
        };
        let asset = asset_lock.read().await;
        assert_eq!(asset.total_stops, 1);
    }

    #[tokio::test]
    async fn transition_is_broadcast() {
        let (service, _) = make_service_with_asset(MachineState::Stopped).await;
        let mut rx = service.event_bus.subscribe();

        let _ = service.apply_state_report(report_at(10, true)).await;

        let event = rx.recv().await;
        let Ok(event) = event else {
            panic!("expected broadcast");
        };
        assert_eq!(event.event_type_str(), "state_changed");
    }

    #[tokio::test]
    async fn heartbeat_is_not_broadcast() {
        let (service, _) = make_service_with_asset(MachineState::Stopped).await;
        let rx = service.event_bus.subscribe();

        let _ = service.apply_state_report(report_at(10, false)).await;
        drop(rx);
        // Nothing was published: receiver count reflects no send errors,
        // and the journal stayed empty.
        assert!(service.journal().is_empty().await);
    }

    #[tokio::test]
    async fn transition_is_tagged_with_active_shift() {
        let registry = Arc::new(AssetRegistry::new());
        let journal = Arc::new(EventJournal::new());
        let ledger = Arc::new(ShiftLedger::new());
        let event_bus = EventBus::new(1000);

        let mut asset = Asset::new(
            AssetId::new(),
            "logger-1".to_string(),
            0,
            "press".to_string(),
            MachineState::Stopped,
        );
        asset.last_state_change = t0();
        let _ = registry.insert(asset).await;

        let shift = crate::domain::Shift::open(1, "Day shift".to_string(), None, Vec::new());
        let shift_id = shift.id;
        let _ = ledger.create(shift).await;

        let service = ReportService::new(registry, journal, ledger, event_bus);
        let _ = service.apply_state_report(report_at(10, true)).await;

        let events = service
            .journal()
            .query(EventFilter {
                shift_id: Some(shift_id),
                ..EventFilter::default()
            })
            .await;
        assert_eq!(events.len(), 1);
    }
}
