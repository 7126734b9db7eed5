//! Domain layer: core types, subscription tables, and fan-out.
//!
//! This module contains the server-side domain model: station and train
//! identity, the connection registry and subscription router that track
//! who listens to what, the broadcaster that pushes messages into
//! connection queues, and the latest-value table of simulated trains.

pub mod broadcaster;
pub mod connection_id;
pub mod connection_registry;
pub mod realtime_event;
pub mod station;
pub mod station_directory;
pub mod station_id;
pub mod subscription_router;
pub mod topic;
pub mod train_id;
pub mod train_table;
pub mod train_update;

pub use broadcaster::Broadcaster;
pub use connection_id::ConnectionId;
pub use connection_registry::{Connection, ConnectionRegistry, RegisteredConnection};
pub use realtime_event::{EventName, EventSource, OutboundMessage};
pub use station::{Station, StationDraft};
pub use station_directory::StationDirectory;
pub use station_id::StationId;
pub use subscription_router::SubscriptionRouter;
pub use topic::TopicKey;
pub use train_id::TrainId;
pub use train_table::TrainTable;
pub use train_update::{TrainStatus, TrainUpdate};
