//! Subscription topics.

use std::fmt;

use serde::Serialize;

use super::{StationId, TrainId};

/// Addressable subscription target.
///
/// Used as the key of the router's membership table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum TopicKey {
    /// Everything happening at one station.
    Station(StationId),
    /// One simulated train.
    Train(TrainId),
}

impl fmt::Display for TopicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Station(id) => write!(f, "station-{id}"),
            Self::Train(id) => write!(f, "train-{id}"),
        }
    }
}

impl From<StationId> for TopicKey {
    fn from(id: StationId) -> Self {
        Self::Station(id)
    }
}

impl From<TrainId> for TopicKey {
    fn from(id: TrainId) -> Self {
        Self::Train(id)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_room_names() {
        let Ok(station) = StationId::new(3) else {
            panic!("valid id");
        };
        assert_eq!(TopicKey::from(station).to_string(), "station-3");
        let Ok(train) = TrainId::parse("T3-4") else {
            panic!("valid id");
        };
        assert_eq!(TopicKey::from(train).to_string(), "train-T3-4");
    }

    #[test]
    fn station_and_train_topics_never_collide() {
        use std::collections::HashSet;
        let Ok(station) = StationId::new(1) else {
            panic!("valid id");
        };
        let Ok(train) = TrainId::parse("1") else {
            panic!("valid id");
        };
        let set: HashSet<TopicKey> = [TopicKey::from(station), TopicKey::from(train)].into();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn serializes_tagged() {
        let Ok(station) = StationId::new(9) else {
            panic!("valid id");
        };
        let json = serde_json::to_value(TopicKey::Station(station)).unwrap_or_default();
        assert_eq!(json, serde_json::json!({"kind": "station", "id": 9}));
    }
}
