//! Outbound realtime messages.
//!
//! Every message pushed to a client is an [`OutboundMessage`]: an event
//! name, a send-time timestamp, the topic it was addressed to (if any),
//! and a JSON payload.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{StationId, TopicKey, TrainId};

/// Name of an outbound event, serialized in kebab-case
/// (e.g. `"train-update"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventName {
    /// A train touching a subscribed station changed state.
    TrainUpdate,
    /// State of a tracked train, or the answer to a status query.
    TrainStatus,
    /// Snapshot of a station and its active trains.
    StationUpdates,
    /// Aggregate counters after each generator pass.
    SystemUpdate,
    /// Liveness signal emitted every tick.
    SystemHeartbeat,
    /// Operator-triggered message.
    ManualUpdate,
    /// A status query named a train no tick has produced.
    TrainNotFound,
    /// Acknowledges a join or track request.
    Subscribed,
    /// Acknowledges a leave or untrack request.
    Unsubscribed,
    /// An inbound frame was rejected.
    Error,
}

impl EventName {
    /// Every event a client may receive.
    pub const ALL: [Self; 10] = [
        Self::TrainUpdate,
        Self::TrainStatus,
        Self::StationUpdates,
        Self::SystemUpdate,
        Self::SystemHeartbeat,
        Self::ManualUpdate,
        Self::TrainNotFound,
        Self::Subscribed,
        Self::Unsubscribed,
        Self::Error,
    ];

    /// Returns the wire name of the event.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TrainUpdate => "train-update",
            Self::TrainStatus => "train-status",
            Self::StationUpdates => "station-updates",
            Self::SystemUpdate => "system-update",
            Self::SystemHeartbeat => "system-heartbeat",
            Self::ManualUpdate => "manual-update",
            Self::TrainNotFound => "train-not-found",
            Self::Subscribed => "subscribed",
            Self::Unsubscribed => "unsubscribed",
            Self::Error => "error",
        }
    }
}

/// Who produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSource {
    /// The periodic state generator.
    Generator,
    /// An operator through the management API.
    Manual,
}

/// Message envelope delivered to a connection.
#[derive(Debug, Clone, Serialize)]
pub struct OutboundMessage {
    /// Server-generated message id (UUID v4).
    pub id: String,
    /// Event name.
    pub event: EventName,
    /// Send time.
    pub timestamp: DateTime<Utc>,
    /// Station the message was addressed to, for station topic emits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub station_id: Option<StationId>,
    /// Train the message was addressed to, for train topic emits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub train_id: Option<TrainId>,
    /// Producer tag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<EventSource>,
    /// Event payload.
    pub data: serde_json::Value,
}

impl OutboundMessage {
    /// Creates an untargeted message stamped with the current time.
    #[must_use]
    pub fn new(event: EventName, data: serde_json::Value) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            event,
            timestamp: Utc::now(),
            station_id: None,
            train_id: None,
            source: None,
            data,
        }
    }

    /// Records the topic the message is addressed to.
    #[must_use]
    pub fn for_topic(mut self, topic: &TopicKey) -> Self {
        match topic {
            TopicKey::Station(id) => self.station_id = Some(*id),
            TopicKey::Train(id) => self.train_id = Some(id.clone()),
        }
        self
    }

    /// Tags the message with its producer.
    #[must_use]
    pub fn with_source(mut self, source: EventSource) -> Self {
        self.source = Some(source);
        self
    }
}
