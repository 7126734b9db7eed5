//! Service layer: business logic orchestration.
//!
//! [`StationService`] owns catalog CRUD, [`RealtimeService`] fronts the
//! live-update core for the transports, and [`StateGenerator`] drives the
//! periodic synthetic train updates.

pub mod generator;
pub mod realtime_service;
pub mod station_service;

pub use generator::{StateGenerator, TickSummary};
pub use realtime_service::{ConnectionStats, ManualTarget, RealtimeService};
pub use station_service::StationService;
