//! Category Display Core - Shared types library.
//!
//! This crate provides the domain model used across all Category Display components:
//! - `admin` - Admin panel, save endpoint and embeddable render surface
//! - `cli` - Command-line tools for migrations, seeding and rendering
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP. Persistence and the host catalog are collaborators injected
//! by the `admin` crate.
//!
//! # Modules
//!
//! - [`types`] - Category identifiers, categories, display settings, admin roles
//! - [`ordering`] - Editor arrangement and display selection over an ordered id list

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod ordering;
pub mod types;

pub use ordering::{EditorRow, arrange_for_editor, select_for_display};
pub use types::*;
