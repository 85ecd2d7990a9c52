//! Concurrent asset storage with per-asset fine-grained locking.
//!
//! [`AssetRegistry`] stores all registered assets in a `HashMap` where
//! each entry is individually protected by a [`tokio::sync::RwLock`].
//! Holding an asset's write lock across a full read-modify-write is
//! what serializes concurrent state reports for the same asset while
//! reports for different assets proceed fully in parallel.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::AssetId;
use super::asset::{Asset, AssetSummary};
use crate::error::MonitorError;

#[derive(Debug, Default)]
struct RegistryInner {
    by_id: HashMap<AssetId, Arc<RwLock<Asset>>>,
    /// Maps a (logger, channel) pair to the asset it identifies.
    by_channel: HashMap<(String, u16), AssetId>,
}

/// Central store for all monitored assets.
///
/// Uses a `RwLock` for the outer maps and per-entry
/// `Arc<RwLock<Asset>>` for fine-grained per-asset locking.
///
/// # Concurrency
///
/// - Multiple tasks may read the same asset concurrently.
/// - Writes to different assets are concurrent.
/// - Writes to the same asset are serialized.
#[derive(Debug, Default)]
pub struct AssetRegistry {
    inner: RwLock<RegistryInner>,
}

impl AssetRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a new asset into the registry.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::InvalidRequest`] if the (logger, channel)
    /// pair is already mapped to another asset.
    pub async fn insert(&self, asset: Asset) -> Result<AssetId, MonitorError> {
        let asset_id = asset.id;
        let key = (asset.logger_id.clone(), asset.channel);
        let mut inner = self.inner.write().await;
        if inner.by_channel.contains_key(&key) {
            return Err(MonitorError::InvalidRequest(format!(
                "logger {} channel {} is already mapped to an asset",
                key.0, key.1
            )));
        }
        inner.by_channel.insert(key, asset_id);
        inner.by_id.insert(asset_id, Arc::new(RwLock::new(asset)));
        Ok(asset_id)
    }

    /// Returns a shared reference to the asset behind its per-asset lock.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::AssetNotFound`] if no asset with the
    /// given ID exists.
    pub async fn get(&self, asset_id: AssetId) -> Result<Arc<RwLock<Asset>>, MonitorError> {
        let inner = self.inner.read().await;
        inner
            .by_id
            .get(&asset_id)
            .cloned()
            .ok_or(MonitorError::AssetNotFound(asset_id))
    }

    /// Resolves the asset mapped to a (logger, channel) pair.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::LoggerChannelNotFound`] if the pair has
    /// no asset mapped.
    pub async fn get_by_logger_channel(
        &self,
        logger_id: &str,
        channel: u16,
    ) -> Result<Arc<RwLock<Asset>>, MonitorError> {
        let inner = self.inner.read().await;
        let asset_id = inner
            .by_channel
            .get(&(logger_id.to_string(), channel))
            .copied()
            .ok_or_else(|| MonitorError::LoggerChannelNotFound {
                logger_id: logger_id.to_string(),
                channel,
            })?;
        inner
            .by_id
            .get(&asset_id)
            .cloned()
            .ok_or(MonitorError::AssetNotFound(asset_id))
    }

    /// Returns the locked entries of all assets.
    pub async fn list_all(&self) -> Vec<Arc<RwLock<Asset>>> {
        let inner = self.inner.read().await;
        inner.by_id.values().cloned().collect()
    }

    /// Returns summaries of all assets, sorted by name.
    pub async fn summaries(&self) -> Vec<AssetSummary> {
        let inner = self.inner.read().await;
        let mut summaries = Vec::with_capacity(inner.by_id.len());
        for entry_lock in inner.by_id.values() {
            let asset = entry_lock.read().await;
            summaries.push(AssetSummary::from(&*asset));
        }
        drop(inner);
        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        summaries
    }

    /// Returns the number of registered assets.
    pub async fn len(&self) -> usize {
        self.inner.read().await.by_id.len()
    }

    /// Returns `true` if the registry contains no assets.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.by_id.is_empty()
    }
}
