//! HTTP middleware and extractors for admin.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, outermost)
//! 2. `TraceLayer` (request tracing)
//! 3. Session layer (tower-sessions)
//! 4. Auth extractors on protected handlers ([`RequireOptionsManager`])

pub mod auth;
pub mod csrf;
pub mod session;

pub use auth::{
    AdminAuthRejection, OptionalAdminAuth, RequireOptionsManager,
    clear_current_admin, set_current_admin,
};
pub use csrf::{CsrfToken, ensure_csrf_token, rotate_csrf_token, session_csrf_token};
pub use session::{SESSION_COOKIE_NAME, create_session_layer};
