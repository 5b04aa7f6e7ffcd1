//! Business logic services for admin.
//!
//! # Services
//!
//! - `auth` - Access-token sign-in and anti-forgery token checks
//! - `category_display` - Category display configuration and rendering pipeline

pub mod auth;
pub mod category_display;

pub use auth::{AdminAuthError, AdminAuthService};
pub use category_display::{
    CategoryDisplayService, CategoryDisplayTemplate, RenderError, SaveError, SaveSubmission,
    settings_keys,
};
