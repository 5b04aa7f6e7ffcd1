//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                     - Liveness check
//! GET  /health/ready               - Readiness check (settings store reachable)
//!
//! # Auth (access token issued by `cd-cli admin create`)
//! GET  /auth/login                 - Login page
//! POST /auth/login                 - Sign in
//! POST /auth/logout                - Sign out
//!
//! # Category display (manage_options)
//! GET  /                           - Redirect to the editor
//! GET  /categories                 - Reorderable category editor
//! POST /api/categories/order       - Save order and flags
//!
//! # Public render surface
//! GET  /shortcodes/{name}          - Rendered category display fragment
//! ```

use axum::{Router, response::Redirect, routing::get};

use crate::state::AppState;

pub mod auth;
pub mod categories;
pub mod health;
pub mod shortcodes;

/// Build the complete application router (without session or tracing layers).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/categories") }))
        .merge(health::router())
        .merge(auth::router())
        .merge(categories::router())
        .merge(shortcodes::router())
}
