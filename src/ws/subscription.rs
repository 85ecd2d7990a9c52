//! Per-connection subscription manager.
//!
//! Tracks which asset IDs a WebSocket client is subscribed to and
//! provides server-side event filtering.

use std::collections::HashSet;

use crate::domain::{AssetId, MonitorEvent};

/// Manages the set of asset subscriptions for a single WebSocket connection.
#[derive(Debug, Default)]
pub struct SubscriptionManager {
    /// Subscribed asset IDs. If `subscribe_all` is true, this set is ignored.
    asset_ids: HashSet<AssetId>,
    /// Whether the client subscribes to all assets (wildcard `"*"`).
    subscribe_all: bool,
}

impl SubscriptionManager {
    /// Creates a new empty subscription manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds asset IDs to the subscription set. `"*"` enables the wildcard.
    pub fn subscribe(&mut self, ids: &[AssetId], wildcard: bool) {
        if wildcard {
            self.subscribe_all = true;
        }
        for id in ids {
            self.asset_ids.insert(*id);
        }
    }

    /// Removes asset IDs from the subscription set.
    pub fn unsubscribe(&mut self, ids: &[AssetId]) {
        for id in ids {
            self.asset_ids.remove(id);
        }
    }

    /// Returns `true` if the event matches the subscription filter.
    ///
    /// Shift lifecycle events carry no asset ID and are delivered to any
    /// connection with at least one subscription.
    #[must_use]
    pub fn matches_event(&self, event: &MonitorEvent) -> bool {
        match event.asset_id() {
            Some(asset_id) => self.subscribe_all || self.asset_ids.contains(&asset_id),
            None => self.subscribe_all || !self.asset_ids.is_empty(),
        }
    }

    /// Returns the number of explicitly subscribed asset IDs.
    #[must_use]
    pub fn count(&self) -> usize {
        self.asset_ids.len()
    }

    /// Returns `true` if the wildcard subscription is active.
    #[must_use]
    pub fn is_subscribed_all(&self) -> bool {
        self.subscribe_all
    }
}
