//! Append-only journal of state transition and shift marker events.

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::event::JournalEvent;
use super::{AssetId, ShiftId};

/// Filter for journal queries. All fields are optional conjuncts.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventFilter {
    /// Match events for this asset only.
    pub asset_id: Option<AssetId>,
    /// Match events attributed to this shift only.
    pub shift_id: Option<ShiftId>,
    /// Match events strictly after this timestamp.
    pub after: Option<DateTime<Utc>>,
    /// Match events strictly before this timestamp.
    pub before: Option<DateTime<Utc>>,
}

impl EventFilter {
    fn matches(&self, event: &JournalEvent) -> bool {
        if let Some(asset_id) = self.asset_id
            && event.asset_id != asset_id
        {
            return false;
        }
        if let Some(shift_id) = self.shift_id
            && event.shift_id != Some(shift_id)
        {
            return false;
        }
        if let Some(after) = self.after
            && event.timestamp <= after
        {
            return false;
        }
        if let Some(before) = self.before
            && event.timestamp >= before
        {
            return false;
        }
        true
    }
}

/// Append-only store of [`JournalEvent`]s.
///
/// Entries are immutable once appended; they are never updated, only
/// superseded by new events. Queries return matches ordered ascending
/// by timestamp.
#[derive(Debug, Default)]
pub struct EventJournal {
    events: RwLock<Vec<JournalEvent>>,
}

impl EventJournal {
    /// Creates an empty journal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event to the journal, returning it back.
    pub async fn append(&self, event: JournalEvent) -> JournalEvent {
        let mut events = self.events.write().await;
        events.push(event.clone());
        event
    }

    /// Returns all events matching the filter, ordered ascending by
    /// timestamp.
    pub async fn query(&self, filter: EventFilter) -> Vec<JournalEvent> {
        let events = self.events.read().await;
        let mut matched: Vec<JournalEvent> = events
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();
        drop(events);
        matched.sort_by_key(|e| e.timestamp);
        matched
    }

    /// Returns the total number of journaled events.
    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    /// Returns `true` if the journal is empty.
    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }
}
