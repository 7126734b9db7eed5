//! PostgreSQL implementation of the station store.

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::models::{STATION_COLUMNS, StationRow, station_from_row};
use crate::config::GatewayConfig;
use crate::domain::{Station, StationDirectory, StationDraft, StationId, station};
use crate::error::GatewayError;

/// PostgreSQL-backed station store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresStationStore {
    pool: PgPool,
}

impl PostgresStationStore {
    /// Creates a store over an existing connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool sized from the gateway configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] if the database cannot
    /// be reached within the configured timeout.
    pub async fn connect(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Applies the embedded migrations.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] if a migration fails.
    pub async fn migrate(&self) -> Result<(), GatewayError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| GatewayError::PersistenceError(e.to_string()))
    }

    /// Inserts the default catalog when the table is empty.
    ///
    /// Returns the number of stations inserted.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure.
    pub async fn seed_if_empty(&self) -> Result<usize, GatewayError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM stations")
            .fetch_one(&self.pool)
            .await?;
        if count > 0 {
            return Ok(0);
        }
        let catalog = station::default_catalog();
        let mut tx = self.pool.begin().await?;
        for draft in &catalog {
            sqlx::query(
                "INSERT INTO stations (name, city, latitude, longitude, phone, description) \
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(&draft.name)
            .bind(&draft.city)
            .bind(draft.latitude)
            .bind(draft.longitude)
            .bind(&draft.phone)
            .bind(&draft.description)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(catalog.len())
    }

    /// Returns every station ordered by id.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure.
    pub async fn list(&self) -> Result<Vec<Station>, GatewayError> {
        let rows = sqlx::query_as::<_, StationRow>(&format!(
            "SELECT {STATION_COLUMNS} FROM stations ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(station_from_row).collect()
    }

    /// Returns one station.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure.
    pub async fn get(&self, id: StationId) -> Result<Option<Station>, GatewayError> {
        let row = sqlx::query_as::<_, StationRow>(&format!(
            "SELECT {STATION_COLUMNS} FROM stations WHERE id = $1"
        ))
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await?;
        row.map(station_from_row).transpose()
    }

    /// Inserts a station and returns it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure.
    pub async fn create(&self, draft: &StationDraft) -> Result<Station, GatewayError> {
        let row = sqlx::query_as::<_, StationRow>(&format!(
            "INSERT INTO stations (name, city, latitude, longitude, phone, description) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {STATION_COLUMNS}"
        ))
        .bind(&draft.name)
        .bind(&draft.city)
        .bind(draft.latitude)
        .bind(draft.longitude)
        .bind(&draft.phone)
        .bind(&draft.description)
        .fetch_one(&self.pool)
        .await?;
        station_from_row(row)
    }

    /// Replaces every field of a station.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure.
    pub async fn update(
        &self,
        id: StationId,
        draft: &StationDraft,
    ) -> Result<Option<Station>, GatewayError> {
        let row = sqlx::query_as::<_, StationRow>(&format!(
            "UPDATE stations SET name = $1, city = $2, latitude = $3, longitude = $4, \
             phone = $5, description = $6 WHERE id = $7 RETURNING {STATION_COLUMNS}"
        ))
        .bind(&draft.name)
        .bind(&draft.city)
        .bind(draft.latitude)
        .bind(draft.longitude)
        .bind(&draft.phone)
        .bind(&draft.description)
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await?;
        row.map(station_from_row).transpose()
    }

    /// Deletes a station and returns the removed record.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure.
    pub async fn delete(&self, id: StationId) -> Result<Option<Station>, GatewayError> {
        let row = sqlx::query_as::<_, StationRow>(&format!(
            "DELETE FROM stations WHERE id = $1 RETURNING {STATION_COLUMNS}"
        ))
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await?;
        row.map(station_from_row).transpose()
    }
}

impl StationDirectory for PostgresStationStore {
    async fn list_stations(&self) -> Result<Vec<Station>, GatewayError> {
        self.list().await
    }

    async fn get_station(&self, id: StationId) -> Result<Option<Station>, GatewayError> {
        self.get(id).await
    }
}
