//! Synthetic train state produced by the generator each tick.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{Station, StationId, TrainId};

/// Operational status of a simulated train.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrainStatus {
    /// Running to schedule.
    OnTime,
    /// Running late.
    Delayed,
    /// Approaching the next station.
    Arriving,
    /// Leaving the current station.
    Departing,
    /// Passengers are boarding.
    Boarding,
}

impl TrainStatus {
    /// Every status, in declaration order. Draws are uniform over this list.
    pub const ALL: [Self; 5] = [
        Self::OnTime,
        Self::Delayed,
        Self::Arriving,
        Self::Departing,
        Self::Boarding,
    ];
}

/// Latest-known state of one train between two adjacent stations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainUpdate {
    /// Id derived from `(current_station.id, next_station.id)`.
    pub train_id: TrainId,
    /// Station the train is currently at or leaving.
    pub current_station: Station,
    /// Station the train is heading to.
    pub next_station: Station,
    /// Current status.
    pub status: TrainStatus,
    /// Expected arrival at `next_station`.
    pub estimated_arrival: DateTime<Utc>,
    /// Delay in minutes.
    pub delay_minutes: u32,
    /// Platform number.
    pub platform: u8,
    /// Passengers on board.
    pub passenger_count: u32,
}

impl TrainUpdate {
    /// Returns `true` if the train runs from or to `station`.
    #[must_use]
    pub fn touches(&self, station: StationId) -> bool {
        self.current_station.id == station || self.next_station.id == station
    }
}
