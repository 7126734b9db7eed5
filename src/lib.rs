//! # station-gateway
//!
//! REST API for a railway station catalog plus a WebSocket channel that
//! pushes live train updates to subscribed clients.
//!
//! Clients subscribe to stations (every train arriving at or leaving that
//! station) or to individual trains. A periodic generator synthesizes one
//! train per pair of adjacent stations and routes each update only to the
//! connections subscribed to a station or train it touches.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Handler (ws/)
//!     │
//!     ├── StationService / RealtimeService (service/)
//!     ├── StateGenerator (service/) ── ticks every period
//!     │
//!     ├── ConnectionRegistry ─ SubscriptionRouter (domain/)
//!     ├── Broadcaster ─ TrainTable (domain/)
//!     │
//!     └── StationStore: PostgreSQL or in-memory (persistence/)
//! ```

pub mod api;
pub mod app;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
pub mod ws;
