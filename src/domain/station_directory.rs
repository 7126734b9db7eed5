//! Read access to the station catalog.

use std::future::Future;

use super::{Station, StationId};
use crate::error::GatewayError;

/// Read-only view of the station catalog used by the realtime core.
///
/// Implemented by every station store. The generator calls
/// [`StationDirectory::list_stations`] once per tick; point queries call
/// [`StationDirectory::get_station`].
pub trait StationDirectory: Send + Sync {
    /// Returns every station ordered by id ascending.
    fn list_stations(&self) -> impl Future<Output = Result<Vec<Station>, GatewayError>> + Send;

    /// Returns one station, or `None` if the id is unknown.
    fn get_station(
        &self,
        id: StationId,
    ) -> impl Future<Output = Result<Option<Station>, GatewayError>> + Send;
}

impl<T: StationDirectory> StationDirectory for std::sync::Arc<T> {
    fn list_stations(&self) -> impl Future<Output = Result<Vec<Station>, GatewayError>> + Send {
        (**self).list_stations()
    }

    fn get_station(
        &self,
        id: StationId,
    ) -> impl Future<Output = Result<Option<Station>, GatewayError>> + Send {
        (**self).get_station(id)
    }
}
