//! API route configuration.

use std::sync::Arc;

use axum::{routing::get, Router};

use crate::handlers;
use crate::state::AppState;

/// Creates the API router with all routes configured.
///
/// Static segments win over `:user_id`, so `/api/pfp/...` and friends never
/// reach the avatar JSON handler.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/ping", get(handlers::ping))
        .route("/api", get(handlers::list_endpoints))
        // Discord
        .route("/api/:user_id", get(handlers::get_avatar))
        .route("/api/pfp/:user_id/:variant", get(handlers::get_avatar_image))
        .route("/api/user/:user_id/raw", get(handlers::get_raw_user))
        .route("/api/banner/:user_id", get(handlers::get_banner))
        .route("/api/banner/:user_id/image", get(handlers::get_banner_image))
        // GitHub
        .route("/api/github/:username", get(handlers::get_github_user))
        .route("/api/github/:username/pfp", get(handlers::get_github_avatar))
        .fallback(handlers::not_found)
        .with_state(state)
}
