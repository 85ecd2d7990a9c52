//! # plantwatch
//!
//! Asset state accumulation engine and shift lifecycle manager for
//! industrial telemetry.
//!
//! Data loggers on the plant floor report running/stopped states per
//! channel. This service resolves each report to a registered asset,
//! accumulates runtime, downtime, and stop counts, derives availability,
//! and groups production metrics into operator-managed shifts. Live
//! transitions and shift lifecycle changes are streamed to WebSocket
//! subscribers.
//!
//! ## Architecture
//!
//! ```text
//! Loggers / Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Handler (ws/)
//!     │
//!     ├── ReportService / ShiftService (service/)
//!     ├── EventBus (domain/)
//!     │
//!     ├── AssetRegistry / EventJournal / ShiftLedger (domain/)
//!     │
//!     └── PostgreSQL Archive
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
pub mod ws;
