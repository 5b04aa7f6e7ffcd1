//! Admin account management commands.
//!
//! # Usage
//!
//! ```bash
//! cd-cli admin create -l ops -n "Ops Team" -r admin
//! ```
//!
//! The generated access token is printed once and never stored in clear text.
//!
//! # Environment Variables
//!
//! - `CATEGORY_DISPLAY_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string

use thiserror::Error;

use category_display_admin::db::{self, PgAdminDirectory};
use category_display_admin::services::auth::{digest_access_token, generate_access_token};
use category_display_admin::store::StoreError;
use category_display_core::{AdminRole, sanitize_text_field};

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Account could not be stored.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Invalid role.
    #[error("Invalid role: {0}. Valid roles: super_admin, admin, viewer")]
    InvalidRole(String),

    /// Invalid login name.
    #[error("Invalid login: {0:?}")]
    InvalidLogin(String),
}

/// Validate a login name: non-empty, no whitespace or markup.
fn validate_login(login: &str) -> Result<String, AdminError> {
    let cleaned = sanitize_text_field(login);
    if cleaned.is_empty() || cleaned != login || cleaned.contains(char::is_whitespace) {
        return Err(AdminError::InvalidLogin(login.to_owned()));
    }
    Ok(cleaned)
}

/// Create a new admin account and print its access token.
///
/// # Returns
///
/// The ID of the created admin account.
///
/// # Errors
///
/// Returns `AdminError` for an invalid login or role, a taken login, or a
/// database failure.
pub async fn create_user(login: &str, name: &str, role: &str) -> Result<i32, AdminError> {
    let role: AdminRole = role
        .parse()
        .map_err(|_| AdminError::InvalidRole(role.to_owned()))?;
    let login = validate_login(login)?;
    let name = sanitize_text_field(name);

    let database_url =
        super::database_url().ok_or(AdminError::MissingEnvVar("CATEGORY_DISPLAY_DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;

    let access_token = generate_access_token();
    let account = PgAdminDirectory::new(pool)
        .create(&login, &name, role, &digest_access_token(&access_token))
        .await?;

    tracing::info!(
        "Admin account created successfully! ID: {}, Login: {}, Role: {}",
        account.id,
        account.login,
        account.role
    );

    #[allow(clippy::print_stdout)]
    {
        println!("Access token for {}: {access_token}", account.login);
        println!("Store it now; it cannot be shown again.");
    }

    Ok(account.id.as_i32())
}
