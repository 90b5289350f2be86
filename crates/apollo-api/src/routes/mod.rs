//! Route definitions
//!
//! Paths mirror the site's public AJAX endpoints, so nothing is nested
//! under a version prefix.

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{admin, ajax, auth, events, health, meta, stats};
use crate::state::AppState;

/// Create the main router with all routes (excluding health for separate middleware handling)
pub fn create_router() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(ajax_routes())
        .merge(event_routes())
        .merge(dashboard_routes())
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// Account and session routes
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
}

/// Engagement routes
fn ajax_routes() -> Router<AppState> {
    Router::new()
        .route("/ajax/nonce", get(ajax::nonce))
        .route("/ajax/toggle/:kind", post(ajax::toggle))
        .route("/ajax/status/:kind/:event_id", get(ajax::status))
        .route("/ajax/relations/:kind", get(ajax::relations))
        .route("/ajax/view", post(ajax::view))
}

/// Event listing routes
fn event_routes() -> Router<AppState> {
    Router::new()
        .route("/events", get(events::list).post(events::create))
        .route("/events/:id", get(events::get).post(events::update))
        .route("/events/:id/delete", post(events::delete))
        .route("/events/:id/card", get(events::card))
        // Event meta
        .route("/events/:id/meta", get(meta::get_meta).post(meta::update_meta))
        .route("/events/:id/meta/delete", post(meta::delete_meta))
        // View statistics
        .route("/events/:id/stats", get(stats::event_stats))
}

/// Dashboard and administration routes
fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard/top-events", get(stats::top_events))
        .route("/admin/recount", post(admin::recount))
}
