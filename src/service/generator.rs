//! Periodic synthetic train-state generator.
//!
//! Each tick reads the station catalog, walks adjacent pairs in id order,
//! draws a plausible [`TrainUpdate`] for each pair, stores it in the
//! [`TrainTable`] and fans it out to the two station topics and the train
//! topic. The pass ends with a `system-update` and a `system-heartbeat` to
//! every connection.
//!
//! Ticks are serialized: [`StateGenerator::run`] owns the generator and
//! awaits each tick before waiting for the next timer deadline. A tick
//! that cannot read the catalog is logged and skipped; the loop keeps
//! going.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use rand::Rng;
use rand::seq::IndexedRandom;
use serde_json::json;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::domain::{
    Broadcaster, EventName, EventSource, OutboundMessage, Station, StationDirectory, TopicKey,
    TrainId, TrainStatus, TrainTable, TrainUpdate,
};
use crate::error::GatewayError;

/// Delays, in minutes, a train may report.
pub const DELAY_CHOICES: [u32; 6] = [0, 2, 5, 8, 12, 15];

/// Platforms a train may be assigned to.
pub const PLATFORMS: std::ops::RangeInclusive<u8> = 1..=4;

/// Passenger count bounds.
pub const PASSENGERS: std::ops::RangeInclusive<u32> = 50..=250;

/// Minutes until estimated arrival.
pub const ARRIVAL_MINUTES: std::ops::RangeInclusive<i64> = 1..=30;

/// Outcome of one successful tick.
#[derive(Debug, Clone)]
pub struct TickSummary {
    /// Updates produced this tick, one per adjacent station pair.
    pub updates: Vec<TrainUpdate>,
    /// Size of the station snapshot.
    pub total_stations: usize,
    /// Size of the latest-value table after the tick.
    pub active_trains: usize,
    /// Tick timestamp.
    pub at: DateTime<Utc>,
}

/// Draws a synthetic update for the train running `current` → `next`.
pub fn simulate_train<R: Rng>(
    rng: &mut R,
    current: &Station,
    next: &Station,
    now: DateTime<Utc>,
) -> TrainUpdate {
    let status = TrainStatus::ALL
        .choose(&mut *rng)
        .copied()
        .unwrap_or(TrainStatus::OnTime);
    let minutes = rng.random_range(ARRIVAL_MINUTES);
    let delay_minutes = DELAY_CHOICES.choose(&mut *rng).copied().unwrap_or(0);
    let platform = rng.random_range(PLATFORMS);
    let passenger_count = rng.random_range(PASSENGERS);

    TrainUpdate {
        train_id: TrainId::from_pair(current.id, next.id),
        current_station: current.clone(),
        next_station: next.clone(),
        status,
        estimated_arrival: now + TimeDelta::minutes(minutes),
        delay_minutes,
        platform,
        passenger_count,
    }
}

/// Serialized producer of synthetic train state.
#[derive(Debug)]
pub struct StateGenerator<D, R> {
    directory: D,
    broadcaster: Broadcaster,
    trains: Arc<TrainTable>,
    rng: R,
}

impl<D, R> StateGenerator<D, R>
where
    D: StationDirectory,
    R: Rng + Send,
{
    /// Creates a generator reading from `directory` and drawing from `rng`.
    pub const fn new(
        directory: D,
        broadcaster: Broadcaster,
        trains: Arc<TrainTable>,
        rng: R,
    ) -> Self {
        Self {
            directory,
            broadcaster,
            trains,
            rng,
        }
    }

    /// Runs one generator pass.
    ///
    /// # Errors
    ///
    /// Returns the directory error if the station snapshot cannot be read.
    /// Nothing is emitted in that case.
    pub async fn tick(&mut self) -> Result<TickSummary, GatewayError> {
        let mut stations = self.directory.list_stations().await?;
        stations.sort_by_key(|s| s.id);
        let now = Utc::now();

        let mut updates = Vec::with_capacity(stations.len().saturating_sub(1));
        for pair in stations.windows(2) {
            let [current, next] = pair else {
                continue;
            };
            let update = simulate_train(&mut self.rng, current, next, now);
            self.trains.upsert(update.clone()).await;
            self.publish(&update).await?;
            updates.push(update);
        }

        let active_trains = self.trains.len().await;
        let total_stations = stations.len();
        self.broadcaster
            .publish_all(
                OutboundMessage::new(
                    EventName::SystemUpdate,
                    json!({
                        "active_trains": active_trains,
                        "total_stations": total_stations,
                        "last_update": now,
                    }),
                )
                .with_source(EventSource::Generator),
            )
            .await;
        self.heartbeat("operational", now).await;

        Ok(TickSummary {
            updates,
            total_stations,
            active_trains,
            at: now,
        })
    }

    async fn publish(&self, update: &TrainUpdate) -> Result<(), GatewayError> {
        let payload = serde_json::to_value(update)?;
        let message = |event| {
            OutboundMessage::new(event, payload.clone()).with_source(EventSource::Generator)
        };
        let from = TopicKey::Station(update.current_station.id);
        let to = TopicKey::Station(update.next_station.id);
        let train = TopicKey::Train(update.train_id.clone());

        self.broadcaster
            .publish_to_topic(&from, message(EventName::TrainUpdate))
            .await;
        self.broadcaster
            .publish_to_topic(&to, message(EventName::TrainUpdate))
            .await;
        self.broadcaster
            .publish_to_topic(&train, message(EventName::TrainStatus))
            .await;
        Ok(())
    }

    async fn heartbeat(&self, status: &str, now: DateTime<Utc>) -> usize {
        self.broadcaster
            .publish_all(
                OutboundMessage::new(
                    EventName::SystemHeartbeat,
                    json!({ "status": status, "last_update": now }),
                )
                .with_source(EventSource::Generator),
            )
            .await
    }

    /// Ticks every `period` until the task is dropped or aborted.
    ///
    /// The first tick fires one full period after start. Failed ticks are
    /// logged and followed by a `degraded` heartbeat.
    pub async fn run(mut self, period: Duration) {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval.tick().await;

        tracing::info!(period_ms = period.as_millis(), "state generator started");
        loop {
            interval.tick().await;
            match self.tick().await {
                Ok(summary) => {
                    tracing::debug!(
                        updates = summary.updates.len(),
                        total_stations = summary.total_stations,
                        active_trains = summary.active_trains,
                        "generator tick complete"
                    );
                }
                Err(e) => {
                    tracing::warn!(error = %e, "generator tick skipped");
                    self.heartbeat("degraded", Utc::now()).await;
                }
            }
        }
    }
}

impl<D, R> StateGenerator<D, R>
where
    D: StationDirectory + 'static,
    R: Rng + Send + Sync + 'static,
{
    /// Spawns [`StateGenerator::run`] on the Tokio runtime.
    pub fn spawn(self, period: Duration) -> JoinHandle<()> {
        tokio::spawn(self.run(period))
    }
}
