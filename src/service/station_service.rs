//! Station service: validated CRUD over the station catalog.

use std::sync::Arc;

use crate::domain::{Station, StationDraft, StationId};
use crate::error::GatewayError;
use crate::persistence::StationStore;

/// Orchestrates catalog operations on top of a [`StationStore`].
///
/// Drafts are validated here, so both store backends only ever see
/// well-formed records.
#[derive(Debug, Clone)]
pub struct StationService {
    store: Arc<StationStore>,
}

impl StationService {
    /// Creates a new `StationService`.
    #[must_use]
    pub const fn new(store: Arc<StationStore>) -> Self {
        Self { store }
    }

    /// Returns a reference to the inner store.
    #[must_use]
    pub const fn store(&self) -> &Arc<StationStore> {
        &self.store
    }

    /// Lists every station ordered by id.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on storage failure.
    pub async fn list(&self) -> Result<Vec<Station>, GatewayError> {
        self.store.list().await
    }

    /// Fetches one station.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::StationNotFound`] if no station has `id`.
    pub async fn get(&self, id: StationId) -> Result<Station, GatewayError> {
        self.store
            .get(id)
            .await?
            .ok_or(GatewayError::StationNotFound(id.get()))
    }

    /// Validates and inserts a new station.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] for an invalid draft.
    pub async fn create(&self, draft: &StationDraft) -> Result<Station, GatewayError> {
        draft.validate()?;
        let station = self.store.create(draft).await?;
        tracing::info!(station_id = %station.id, name = %station.name, "station created");
        Ok(station)
    }

    /// Validates and replaces an existing station.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] for an invalid draft or
    /// [`GatewayError::StationNotFound`] if no station has `id`.
    pub async fn update(&self, id: StationId, draft: &StationDraft) -> Result<Station, GatewayError> {
        draft.validate()?;
        let station = self
            .store
            .update(id, draft)
            .await?
            .ok_or(GatewayError::StationNotFound(id.get()))?;
        tracing::info!(station_id = %id, "station updated");
        Ok(station)
    }

    /// Deletes a station and returns the removed record.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::StationNotFound`] if no station has `id`.
    pub async fn delete(&self, id: StationId) -> Result<Station, GatewayError> {
        let station = self
            .store
            .delete(id)
            .await?
            .ok_or(GatewayError::StationNotFound(id.get()))?;
        tracing::info!(station_id = %id, "station deleted");
        Ok(station)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::persistence::InMemoryStationStore;

    fn service() -> StationService {
        StationService::new(Arc::new(StationStore::Memory(InMemoryStationStore::new())))
    }

    fn draft(name: &str, latitude: f64) -> StationDraft {
        StationDraft {
            name: name.to_string(),
            city: "Fes".to_string(),
            latitude,
            longitude: -5.0,
            phone: Some("+212 5 35 93 03 33".to_string()),
            description: None,
        }
    }

    #[tokio::test]
    async fn create_then_get() {
        let svc = service();
        let Ok(created) = svc.create(&draft("Gare de Fes", 34.04)).await else {
            panic!("create failed");
        };
        let Ok(fetched) = svc.get(created.id).await else {
            panic!("get failed");
        };
        assert_eq!(created, fetched);
    }

    #[tokio::test]
    async fn create_rejects_invalid_draft() {
        let svc = service();
        let result = svc.create(&draft("Nowhere", 120.0)).await;
        assert!(matches!(result, Err(GatewayError::InvalidRequest(_))));
        let Ok(list) = svc.list().await else {
            panic!("list failed");
        };
        assert!(list.is_empty());
    }

    #[tokio::test]
    async fn missing_station_is_not_found() {
        let svc = service();
        let Ok(id) = StationId::new(9) else {
            panic!("valid id");
        };
        assert!(matches!(svc.get(id).await, Err(GatewayError::StationNotFound(9))));
        assert!(matches!(
            svc.update(id, &draft("X", 0.0)).await,
            Err(GatewayError::StationNotFound(9))
        ));
        assert!(matches!(svc.delete(id).await, Err(GatewayError::StationNotFound(9))));
    }

    #[tokio::test]
    async fn update_then_delete() {
        let svc = service();
        let Ok(created) = svc.create(&draft("Old", 34.0)).await else {
            panic!("create failed");
        };
        let Ok(updated) = svc.update(created.id, &draft("New", 34.1)).await else {
            panic!("update failed");
        };
        assert_eq!(updated.name, "New");
        let Ok(removed) = svc.delete(created.id).await else {
            panic!("delete failed");
        };
        assert_eq!(removed.name, "New");
        assert!(svc.get(created.id).await.is_err());
    }
}
