//! WebSocket inbound frames: `{"event": <name>, "data": <arg>}`.
//!
//! Outbound frames are [`crate::domain::OutboundMessage`] serialized as-is.

use serde::Deserialize;
use serde_json::json;

use crate::domain::{StationId, TopicKey, TrainId};

/// Commands that a client can send over WebSocket.
///
/// Ids are validated during deserialization, so a command that parses
/// always carries a well-formed [`StationId`] or [`TrainId`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientCommand {
    /// Subscribe to updates touching a station.
    JoinStation(StationId),
    /// Unsubscribe from a station.
    LeaveStation(StationId),
    /// Subscribe to one train's status.
    TrackTrain(TrainId),
    /// Unsubscribe from one train's status.
    UntrackTrain(TrainId),
    /// Ask for a station record and its active trains.
    RequestStationUpdates(StationId),
    /// Ask for the latest state of one train.
    RequestTrainStatus(TrainId),
}

impl ClientCommand {
    /// Inbound event names, in declaration order.
    pub const NAMES: [&'static str; 6] = [
        "join-station",
        "leave-station",
        "track-train",
        "untrack-train",
        "request-station-updates",
        "request-train-status",
    ];

    /// Describes an inbound event by name.
    #[must_use]
    pub fn describe(name: &str) -> Option<&'static str> {
        match name {
            "join-station" => Some("Subscribe to updates for trains touching a station"),
            "leave-station" => Some("Unsubscribe from a station"),
            "track-train" => Some("Subscribe to one train's status"),
            "untrack-train" => Some("Unsubscribe from one train"),
            "request-station-updates" => Some("Fetch a station and its active trains"),
            "request-train-status" => Some("Fetch the latest state of one train"),
            _ => None,
        }
    }

    /// Parses a text frame.
    ///
    /// # Errors
    ///
    /// Returns an [`InboundError`] describing whether the frame was not
    /// JSON, named an unknown event, or carried an invalid argument.
    pub fn parse(text: &str) -> Result<Self, InboundError> {
        serde_json::from_str(text).map_err(|e| InboundError::classify(text, &e))
    }
}

/// Bare frame shape used to explain parse failures.
#[derive(Debug, Deserialize)]
struct RawFrame {
    event: String,
}

/// A rejected inbound frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundError {
    /// HTTP-like status code.
    pub code: u16,
    /// Human-readable reason.
    pub message: String,
}

impl InboundError {
    fn classify(text: &str, err: &serde_json::Error) -> Self {
        match serde_json::from_str::<RawFrame>(text) {
            Err(_) => Self {
                code: 400,
                message: "malformed frame: expected {\"event\", \"data\"}".to_string(),
            },
            Ok(raw) if !ClientCommand::NAMES.contains(&raw.event.as_str()) => Self {
                code: 404,
                message: format!("unknown event: {}", raw.event),
            },
            Ok(raw) => Self {
                code: 400,
                message: format!("invalid data for {}: {err}", raw.event),
            },
        }
    }

    /// Payload of the outbound `error` event.
    #[must_use]
    pub fn to_payload(&self) -> serde_json::Value {
        json!({ "code": self.code, "message": self.message })
    }
}

/// What the connection loop should do with a parsed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Join a topic.
    Join(TopicKey),
    /// Leave a topic.
    Leave(TopicKey),
    /// Point query for a station.
    StationUpdates(StationId),
    /// Point query for a train.
    TrainStatus(TrainId),
}

impl From<ClientCommand> for Dispatch {
    fn from(command: ClientCommand) -> Self {
        match command {
            ClientCommand::JoinStation(id) => Self::Join(TopicKey::Station(id)),
            ClientCommand::LeaveStation(id) => Self::Leave(TopicKey::Station(id)),
            ClientCommand::TrackTrain(id) => Self::Join(TopicKey::Train(id)),
            ClientCommand::UntrackTrain(id) => Self::Leave(TopicKey::Train(id)),
            ClientCommand::RequestStationUpdates(id) => Self::StationUpdates(id),
            ClientCommand::RequestTrainStatus(id) => Self::TrainStatus(id),
        }
    }
}
