//! Persistence layer: PostgreSQL event archive and shift records.
//!
//! Durable storage for the monitoring event feed and closed shift
//! records. The in-memory journal remains the source of truth for
//! shift-end metric derivation; the archive is a write-behind copy
//! fed by a background task subscribed to the event bus. The concrete
//! implementation uses `sqlx::PgPool` for async PostgreSQL access.

pub mod archiver;
pub mod postgres;
