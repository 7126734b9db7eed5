//! WebSocket layer: connection handling and inbound command parsing.
//!
//! The WebSocket endpoint at `/ws` carries client subscription commands
//! and point queries in, and live train and system events out.

pub mod connection;
pub mod handler;
pub mod messages;
