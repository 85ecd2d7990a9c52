//! WebSocket layer: connection handling, message routing, subscriptions.
//!
//! The WebSocket endpoint at `/ws` streams state transition and shift
//! lifecycle events to live subscribers.

pub mod connection;
pub mod handler;
pub mod messages;
pub mod subscription;
