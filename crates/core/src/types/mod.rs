//! Core types for Category Display.
//!
//! This module provides type-safe wrappers for the domain concepts.

pub mod category;
pub mod display;
pub mod id;
pub mod role;
pub mod sanitize;

pub use category::Category;
pub use display::{DisplaySettings, coerce_flag, coerce_order};
pub use id::*;
pub use role::{AdminRole, RoleParseError};
pub use sanitize::{safe_url, sanitize_text_field};
