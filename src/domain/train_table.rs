//! Latest-value table for simulated trains.

use std::collections::HashMap;

use tokio::sync::RwLock;

use super::{StationId, TrainId, TrainUpdate};

/// Most recent [`TrainUpdate`] per train.
///
/// Written only by the state generator and read by point queries, which
/// may observe a value one tick old. Entries are overwritten, never
/// removed, so the table is bounded by the number of distinct adjacent
/// station pairs the directory has ever produced.
#[derive(Debug, Default)]
pub struct TrainTable {
    trains: RwLock<HashMap<TrainId, TrainUpdate>>,
}

impl TrainTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `update`, replacing any previous value for the same train.
    pub async fn upsert(&self, update: TrainUpdate) {
        self.trains
            .write()
            .await
            .insert(update.train_id.clone(), update);
    }

    /// Returns the latest value for `train_id`.
    pub async fn get(&self, train_id: &TrainId) -> Option<TrainUpdate> {
        self.trains.read().await.get(train_id).cloned()
    }

    /// Returns every train running from or to `station`, ordered by id.
    pub async fn touching(&self, station: StationId) -> Vec<TrainUpdate> {
        let mut trains: Vec<TrainUpdate> = self
            .trains
            .read()
            .await
            .values()
            .filter(|t| t.touches(station))
            .cloned()
            .collect();
        trains.sort_by(|a, b| a.train_id.cmp(&b.train_id));
        trains
    }

    /// Returns the number of trains in the table.
    pub async fn len(&self) -> usize {
        self.trains.read().await.len()
    }

    /// Returns `true` if no train has been produced yet.
    pub async fn is_empty(&self) -> bool {
        self.trains.read().await.is_empty()
    }
}
