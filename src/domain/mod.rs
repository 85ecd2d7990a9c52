//! Domain layer: core types, stores, and the event system.
//!
//! This module contains the server-side domain model: typed ids, asset
//! records with lifetime counters, the append-only event journal, shift
//! records, the broadcast event bus, and the concurrent stores backing
//! the accumulation and shift lifecycle services.

pub mod asset;
pub mod asset_registry;
pub mod event;
pub mod event_bus;
pub mod event_journal;
pub mod ids;
pub mod monitor_event;
pub mod shift;
pub mod shift_ledger;

pub use asset::{Asset, AssetSummary, MachineState, availability_percent};
pub use asset_registry::AssetRegistry;
pub use event::{EventType, JournalEvent, ShiftAssetMetrics};
pub use event_bus::EventBus;
pub use event_journal::{EventFilter, EventJournal};
pub use ids::{AssetId, EventId, ShiftId};
pub use monitor_event::MonitorEvent;
pub use shift::{Shift, ShiftAssetState};
pub use shift_ledger::ShiftLedger;
