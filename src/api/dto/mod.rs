//! Data Transfer Objects for REST request/response serialization.

pub mod asset_dto;
pub mod common_dto;
pub mod event_dto;
pub mod report_dto;
pub mod shift_dto;

pub use asset_dto::*;
pub use common_dto::*;
pub use event_dto::*;
pub use report_dto::*;
pub use shift_dto::*;
