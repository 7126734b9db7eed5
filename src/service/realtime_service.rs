//! Realtime service: subscription commands, point queries, manual
//! triggers, and connection statistics.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{
    Broadcaster, Connection, ConnectionId, ConnectionRegistry, EventName, EventSource,
    OutboundMessage, RegisteredConnection, StationDirectory, StationId, SubscriptionRouter,
    TopicKey, TrainId, TrainTable,
};
use crate::error::GatewayError;
use crate::persistence::StationStore;

/// Connection statistics for operational tooling.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ConnectionStats {
    /// Number of live connections.
    pub total_connections: usize,
    /// Sum of subscription-set sizes over all connections.
    pub active_subscriptions: usize,
    /// Trains in the latest-value table.
    pub active_trains: usize,
    /// When the statistics were taken.
    pub timestamp: DateTime<Utc>,
}

/// Destination of a manually triggered update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManualTarget {
    /// Members of one station topic.
    Station(StationId),
    /// Members of one train topic.
    Train(TrainId),
    /// Every connection.
    System,
}

impl ManualTarget {
    /// Resolves a target from a kind string and its payload.
    ///
    /// `station` reads `station_id` from the payload and `train` reads
    /// `train_id`. Any other kind, `system` included, targets every
    /// connection.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] if a station or train kind
    /// lacks a valid id in the payload.
    pub fn resolve(kind: &str, data: &serde_json::Value) -> Result<Self, GatewayError> {
        match kind {
            "station" => {
                let raw = data
                    .get("station_id")
                    .and_then(serde_json::Value::as_i64)
                    .ok_or_else(|| {
                        GatewayError::InvalidRequest("station target requires station_id".to_string())
                    })?;
                Ok(Self::Station(StationId::new(raw)?))
            }
            "train" => {
                let raw = data
                    .get("train_id")
                    .and_then(serde_json::Value::as_str)
                    .ok_or_else(|| {
                        GatewayError::InvalidRequest("train target requires train_id".to_string())
                    })?;
                Ok(Self::Train(TrainId::parse(raw)?))
            }
            _ => Ok(Self::System),
        }
    }
}

/// Facade over the realtime core used by the WebSocket and REST layers.
///
/// Every inbound client command maps to one method here. Replies to the
/// requesting connection go through the same [`Broadcaster`] queue as
/// topic traffic, so a client sees them in order with everything else.
#[derive(Debug, Clone)]
pub struct RealtimeService {
    registry: Arc<ConnectionRegistry>,
    broadcaster: Broadcaster,
    trains: Arc<TrainTable>,
    stations: Arc<StationStore>,
}

impl RealtimeService {
    /// Wires a service around fresh registry, router, and train tables.
    #[must_use]
    pub fn new(stations: Arc<StationStore>, queue_capacity: usize) -> Self {
        let router = Arc::new(SubscriptionRouter::new());
        let registry = Arc::new(ConnectionRegistry::new(router, queue_capacity));
        let broadcaster = Broadcaster::new(Arc::clone(&registry));
        Self {
            registry,
            broadcaster,
            trains: Arc::new(TrainTable::new()),
            stations,
        }
    }

    /// Returns the broadcaster shared with the state generator.
    #[must_use]
    pub const fn broadcaster(&self) -> &Broadcaster {
        &self.broadcaster
    }

    /// Returns the latest-value table shared with the state generator.
    #[must_use]
    pub const fn trains(&self) -> &Arc<TrainTable> {
        &self.trains
    }

    /// Returns the connection registry.
    #[must_use]
    pub const fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// Registers a new client connection.
    pub async fn connect(&self) -> RegisteredConnection {
        let connection = self.registry.register().await;
        tracing::info!(connection_id = %connection.id, "client connected");
        connection
    }

    /// Removes a client connection and all of its subscriptions.
    pub async fn disconnect(&self, connection: ConnectionId) {
        if self.registry.unregister(connection).await {
            tracing::info!(connection_id = %connection, "client disconnected");
        }
    }

    /// Returns a snapshot of one connection.
    pub async fn connection(&self, connection: ConnectionId) -> Option<Connection> {
        self.registry.get(connection).await
    }

    /// Subscribes `connection` to `topic` and acknowledges with the
    /// connection's subscription count.
    ///
    /// Returns `false` if the connection is not registered or was already
    /// subscribed.
    pub async fn join(&self, connection: ConnectionId, topic: TopicKey) -> bool {
        if !self.registry.contains(connection).await {
            return false;
        }
        let router = self.registry.router();
        let joined = router.join(connection, topic.clone()).await;
        // An unregister between the check and the join has already run
        // drop_all, so the membership just added would dangle.
        if !self.registry.contains(connection).await {
            router.leave(connection, &topic).await;
            return false;
        }
        if joined {
            tracing::debug!(connection_id = %connection, %topic, "joined topic");
        }
        let count = router.subscription_count(connection).await;
        self.acknowledge(connection, EventName::Subscribed, &topic, count)
            .await;
        joined
    }

    /// Unsubscribes `connection` from `topic` and acknowledges with the
    /// remaining subscription count. Leaving a topic that was never joined
    /// is valid.
    pub async fn leave(&self, connection: ConnectionId, topic: TopicKey) -> bool {
        let router = self.registry.router();
        let left = router.leave(connection, &topic).await;
        if left {
            tracing::debug!(connection_id = %connection, %topic, "left topic");
        }
        let count = router.subscription_count(connection).await;
        self.acknowledge(connection, EventName::Unsubscribed, &topic, count)
            .await;
        left
    }

    async fn acknowledge(
        &self,
        connection: ConnectionId,
        event: EventName,
        topic: &TopicKey,
        subscriptions: usize,
    ) {
        self.broadcaster
            .emit_to_connection(
                connection,
                event,
                json!({ "topic": topic, "subscriptions": subscriptions }),
            )
            .await;
    }

    /// Sends the station record and its active trains to `connection`.
    ///
    /// Unknown stations and catalog failures are answered with an `error`
    /// event rather than propagated.
    pub async fn request_station_updates(&self, connection: ConnectionId, station_id: StationId) {
        let (event, payload) = match self.stations.get_station(station_id).await {
            Ok(Some(station)) => {
                let active_trains = self.trains.touching(station_id).await;
                (
                    EventName::StationUpdates,
                    json!({
                        "station": station,
                        "active_trains": active_trains,
                        "timestamp": Utc::now(),
                    }),
                )
            }
            Ok(None) => (
                EventName::Error,
                json!({
                    "code": 404,
                    "message": "station not found",
                    "station_id": station_id,
                }),
            ),
            Err(e) => {
                tracing::warn!(error = %e, %station_id, "station lookup failed");
                (
                    EventName::Error,
                    json!({
                        "code": 503,
                        "message": "station catalog unavailable",
                        "station_id": station_id,
                    }),
                )
            }
        };
        self.broadcaster
            .emit_to_connection(connection, event, payload)
            .await;
    }

    /// Sends the latest state of `train_id` to `connection`, or a
    /// `train-not-found` event if no tick has produced it.
    pub async fn request_train_status(&self, connection: ConnectionId, train_id: TrainId) {
        let (event, payload) = match self.trains.get(&train_id).await {
            Some(update) => match serde_json::to_value(&update) {
                Ok(value) => (EventName::TrainStatus, value),
                Err(e) => {
                    tracing::error!(error = %e, %train_id, "failed to encode train status");
                    return;
                }
            },
            None => (
                EventName::TrainNotFound,
                json!({ "train_id": train_id, "message": "Train not found" }),
            ),
        };
        self.broadcaster
            .emit_to_connection(connection, event, payload)
            .await;
    }

    /// Routes an operator message as a `manual-update` tagged with
    /// `source: "manual"`.
    ///
    /// Returns the number of connections the message was queued for.
    pub async fn trigger_manual_update(
        &self,
        target: ManualTarget,
        data: serde_json::Value,
    ) -> usize {
        let message =
            OutboundMessage::new(EventName::ManualUpdate, data).with_source(EventSource::Manual);
        let delivered = match &target {
            ManualTarget::Station(id) => {
                self.broadcaster
                    .publish_to_topic(&TopicKey::Station(*id), message)
                    .await
            }
            ManualTarget::Train(id) => {
                self.broadcaster
                    .publish_to_topic(&TopicKey::Train(id.clone()), message)
                    .await
            }
            ManualTarget::System => self.broadcaster.publish_all(message).await,
        };
        tracing::info!(?target, delivered, "manual update triggered");
        delivered
    }

    /// Returns current connection statistics.
    pub async fn connection_stats(&self) -> ConnectionStats {
        ConnectionStats {
            total_connections: self.registry.len().await,
            active_subscriptions: self.registry.router().total_subscriptions().await,
            active_trains: self.trains.len().await,
            timestamp: Utc::now(),
        }
    }
}
