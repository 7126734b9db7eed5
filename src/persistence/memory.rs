//! In-memory station store.
//!
//! Used when persistence is disabled and by the test suites. Stations are
//! kept in a `BTreeMap` so listing is naturally ordered by id.

use std::collections::BTreeMap;

use tokio::sync::RwLock;

use crate::domain::{Station, StationDirectory, StationDraft, StationId, station};
use crate::error::GatewayError;

#[derive(Debug)]
struct Catalog {
    stations: BTreeMap<StationId, Station>,
    next_id: i64,
}

/// Station store backed by process memory.
#[derive(Debug)]
pub struct InMemoryStationStore {
    inner: RwLock<Catalog>,
}

impl InMemoryStationStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Catalog {
                stations: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Creates a store holding the default catalog.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] if an id cannot be assigned.
    pub async fn with_default_catalog() -> Result<Self, GatewayError> {
        Self::with_stations(station::default_catalog()).await
    }

    /// Creates a store holding `drafts`, assigning ids from 1 in order.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] if an id cannot be assigned.
    pub async fn with_stations(
        drafts: impl IntoIterator<Item = StationDraft>,
    ) -> Result<Self, GatewayError> {
        let store = Self::new();
        for draft in drafts {
            store.create(&draft).await?;
        }
        Ok(store)
    }

    /// Returns every station ordered by id.
    ///
    /// # Errors
    ///
    /// Never fails; the signature matches the database store.
    pub async fn list(&self) -> Result<Vec<Station>, GatewayError> {
        Ok(self.inner.read().await.stations.values().cloned().collect())
    }

    /// Returns one station.
    ///
    /// # Errors
    ///
    /// Never fails; the signature matches the database store.
    pub async fn get(&self, id: StationId) -> Result<Option<Station>, GatewayError> {
        Ok(self.inner.read().await.stations.get(&id).cloned())
    }

    /// Inserts a station under the next free id.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Internal`] if the id space is exhausted.
    pub async fn create(&self, draft: &StationDraft) -> Result<Station, GatewayError> {
        let mut catalog = self.inner.write().await;
        let id = StationId::new(catalog.next_id)
            .map_err(|_| GatewayError::Internal("station id space exhausted".to_string()))?;
        catalog.next_id = catalog.next_id.saturating_add(1);
        let station = draft.clone().into_station(id);
        catalog.stations.insert(id, station.clone());
        Ok(station)
    }

    /// Replaces every field of a station.
    ///
    /// # Errors
    ///
    /// Never fails; the signature matches the database store.
    pub async fn update(
        &self,
        id: StationId,
        draft: &StationDraft,
    ) -> Result<Option<Station>, GatewayError> {
        let mut catalog = self.inner.write().await;
        let Some(slot) = catalog.stations.get_mut(&id) else {
            return Ok(None);
        };
        *slot = draft.clone().into_station(id);
        Ok(Some(slot.clone()))
    }

    /// Deletes a station and returns the removed record.
    ///
    /// # Errors
    ///
    /// Never fails; the signature matches the database store.
    pub async fn delete(&self, id: StationId) -> Result<Option<Station>, GatewayError> {
        Ok(self.inner.write().await.stations.remove(&id))
    }
}

impl Default for InMemoryStationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StationDirectory for InMemoryStationStore {
    async fn list_stations(&self) -> Result<Vec<Station>, GatewayError> {
        self.list().await
    }

    async fn get_station(&self, id: StationId) -> Result<Option<Station>, GatewayError> {
        self.get(id).await
    }
}
