//! REST endpoint handlers organized by resource.

pub mod asset;
pub mod report;
pub mod shift;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(report::routes())
        .merge(asset::routes())
        .merge(shift::routes())
}
