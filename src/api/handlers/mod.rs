//! REST endpoint handlers organized by resource.

pub mod matchmaking;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes, relative to `/api`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(matchmaking::routes())
        .merge(system::routes())
}
