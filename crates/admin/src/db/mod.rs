//! `PostgreSQL` implementations of the collaborator traits.
//!
//! # Schema: `category_display`
//!
//! ## Tables
//!
//! - `settings` - Key/value options (JSONB)
//! - `product_categories` - Product category catalog
//! - `admin_users` - Admin accounts and access-token digests
//! - `session` - Admin session storage (tower-sessions)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/admin/migrations/` and run via:
//! ```bash
//! cargo run -p category-display-cli -- migrate
//! ```

pub mod admin_users;
pub mod categories;
pub mod settings;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

pub use admin_users::PgAdminDirectory;
pub use categories::PgCategorySource;
pub use settings::PgSettingsStore;

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
