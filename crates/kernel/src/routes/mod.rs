//! HTTP route handlers.

pub mod api;
pub mod health;
pub mod helpers;
pub mod post;

use axum::Router;

use crate::state::AppState;

/// Build the application router with all routes and state attached.
///
/// Middleware layers (tracing, CORS) are added by the caller.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(post::router())
        .merge(api::router())
        .with_state(state)
}
