//! Realtime management DTOs: status, event catalog, and manual triggers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{StationId, TrainId};

/// Request body for `POST /realtime/trigger-update`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct TriggerUpdateRequest {
    /// Target kind: `station`, `train`, or `system`. Anything else is
    /// treated as `system`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Payload forwarded to clients. Must carry `station_id` or `train_id`
    /// for the station and train kinds.
    pub data: serde_json::Value,
}

/// Request body for `POST /realtime/broadcast`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct BroadcastRequest {
    /// Operator label for the broadcast (e.g. `"maintenance"`).
    pub event: String,
    /// Human-readable message.
    pub message: String,
    /// Extra payload.
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

/// Request body for `POST /realtime/notify-station`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct NotifyStationRequest {
    /// Station whose subscribers are notified.
    #[schema(value_type = i32)]
    pub station_id: StationId,
    /// Human-readable message.
    pub message: String,
    /// Extra payload.
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

/// Request body for `POST /realtime/notify-train`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct NotifyTrainRequest {
    /// Train whose trackers are notified.
    #[schema(value_type = String)]
    pub train_id: TrainId,
    /// Human-readable message.
    pub message: String,
    /// Extra payload.
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

/// Response body for every manual-update endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct ManualUpdateResponse {
    /// Resolved target kind.
    pub target: String,
    /// Number of connections the update was queued for.
    pub delivered: usize,
    /// Payload sent to clients.
    pub data: serde_json::Value,
    /// Always `"manual"`.
    pub source: String,
    /// Server timestamp.
    pub timestamp: DateTime<Utc>,
}

/// WebSocket endpoint description inside [`RealtimeStatusResponse`].
#[derive(Debug, Serialize, ToSchema)]
pub struct RealtimeEndpoints {
    /// WebSocket path.
    pub websocket: String,
    /// Server events a client may receive.
    pub events: Vec<String>,
}

/// Response body for `GET /realtime/status`.
#[derive(Debug, Serialize, ToSchema)]
pub struct RealtimeStatusResponse {
    /// Service name.
    pub service: String,
    /// `active` while the server is up.
    pub status: String,
    /// Whether the state generator loop is running.
    pub generator_enabled: bool,
    /// Generator period in milliseconds.
    pub tick_interval_ms: u64,
    /// Station store backend.
    pub station_store: String,
    /// Supported features.
    pub features: Vec<String>,
    /// WebSocket endpoint description.
    pub endpoints: RealtimeEndpoints,
    /// Server timestamp.
    pub timestamp: DateTime<Utc>,
}

/// Response body for `GET /realtime/events`.
#[derive(Debug, Serialize, ToSchema)]
pub struct EventCatalogResponse {
    /// Events a client may send.
    pub client_events: Vec<EventDescription>,
    /// Events the server may send.
    pub server_events: Vec<EventDescription>,
}

/// Name and meaning of one event.
#[derive(Debug, Serialize, ToSchema)]
pub struct EventDescription {
    /// Kebab-case event name.
    pub name: String,
    /// What the event does.
    pub description: String,
}
