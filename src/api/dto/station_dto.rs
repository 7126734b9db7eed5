//! Station DTOs for catalog endpoints.
//!
//! Create and update requests take a [`crate::domain::StationDraft`]
//! directly; single-station responses are the [`Station`] itself.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::Station;

/// Response body for `GET /stations`.
#[derive(Debug, Serialize, ToSchema)]
pub struct StationListResponse {
    /// Stations ordered by id.
    pub data: Vec<Station>,
    /// Number of stations returned.
    pub count: usize,
}

impl From<Vec<Station>> for StationListResponse {
    fn from(data: Vec<Station>) -> Self {
        Self {
            count: data.len(),
            data,
        }
    }
}
