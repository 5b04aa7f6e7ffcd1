//! CLI subcommands.

pub mod admin;
pub mod migrate;
pub mod render;
pub mod seed;

use secrecy::SecretString;

/// Database URL from `CATEGORY_DISPLAY_DATABASE_URL`, falling back to `DATABASE_URL`.
///
/// Loads `.env` first if present.
pub fn database_url() -> Option<SecretString> {
    dotenvy::dotenv().ok();
    std::env::var("CATEGORY_DISPLAY_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
        .map(SecretString::from)
}
