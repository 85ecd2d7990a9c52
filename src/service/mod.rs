//! Service layer: business logic orchestration.
//!
//! [`ReportService`] accumulates device state reports into asset
//! counters; [`ShiftService`] manages the shift lifecycle. Both emit
//! events through the [`super::domain::EventBus`].

pub mod report_service;
pub mod shift_service;

pub use report_service::{ReportOutcome, ReportService, StateReport};
pub use shift_service::ShiftService;
