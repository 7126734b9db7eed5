//! Persistence layer: station catalog storage.
//!
//! [`StationStore`] selects between the PostgreSQL store (the default) and
//! an in-memory store used when persistence is disabled. Both implement
//! [`StationDirectory`], the read view the realtime core consumes.

pub mod memory;
pub mod models;
pub mod postgres;

pub use memory::InMemoryStationStore;
pub use postgres::PostgresStationStore;

use crate::domain::{Station, StationDirectory, StationDraft, StationId};
use crate::error::GatewayError;

/// Station store selected at startup.
#[derive(Debug)]
pub enum StationStore {
    /// PostgreSQL via `sqlx`.
    Postgres(PostgresStationStore),
    /// Process memory.
    Memory(InMemoryStationStore),
}

impl StationStore {
    /// Returns every station ordered by id.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on storage failure.
    pub async fn list(&self) -> Result<Vec<Station>, GatewayError> {
        match self {
            Self::Postgres(store) => store.list().await,
            Self::Memory(store) => store.list().await,
        }
    }

    /// Returns one station.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on storage failure.
    pub async fn get(&self, id: StationId) -> Result<Option<Station>, GatewayError> {
        match self {
            Self::Postgres(store) => store.get(id).await,
            Self::Memory(store) => store.get(id).await,
        }
    }

    /// Inserts a station.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on storage failure.
    pub async fn create(&self, draft: &StationDraft) -> Result<Station, GatewayError> {
        match self {
            Self::Postgres(store) => store.create(draft).await,
            Self::Memory(store) => store.create(draft).await,
        }
    }

    /// Replaces a station's fields.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on storage failure.
    pub async fn update(
        &self,
        id: StationId,
        draft: &StationDraft,
    ) -> Result<Option<Station>, GatewayError> {
        match self {
            Self::Postgres(store) => store.update(id, draft).await,
            Self::Memory(store) => store.update(id, draft).await,
        }
    }

    /// Deletes a station.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on storage failure.
    pub async fn delete(&self, id: StationId) -> Result<Option<Station>, GatewayError> {
        match self {
            Self::Postgres(store) => store.delete(id).await,
            Self::Memory(store) => store.delete(id).await,
        }
    }

    /// Short backend name for logs and status endpoints.
    #[must_use]
    pub const fn backend(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::Memory(_) => "memory",
        }
    }
}

impl StationDirectory for StationStore {
    async fn list_stations(&self) -> Result<Vec<Station>, GatewayError> {
        self.list().await
    }

    async fn get_station(&self, id: StationId) -> Result<Option<Station>, GatewayError> {
        self.get(id).await
    }
}
