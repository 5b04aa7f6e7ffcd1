//! Admin account domain types.

use chrono::{DateTime, Utc};

use category_display_core::AdminUserId;

// Re-export AdminRole from core for convenience
pub use category_display_core::AdminRole;

/// An admin account (domain type).
///
/// Accounts authenticate with a random access token generated by the CLI;
/// only its SHA-256 digest is stored.
#[derive(Clone)]
pub struct AdminAccount {
    /// Unique admin user ID.
    pub id: AdminUserId,
    /// Login name.
    pub login: String,
    /// Display name.
    pub name: String,
    /// Role/permission level.
    pub role: AdminRole,
    /// Hex-encoded SHA-256 digest of the access token.
    pub token_digest: String,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account last signed in.
    pub last_login_at: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for AdminAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminAccount")
            .field("id", &self.id)
            .field("login", &self.login)
            .field("name", &self.name)
            .field("role", &self.role)
            .field("token_digest", &"[REDACTED]")
            .field("created_at", &self.created_at)
            .field("last_login_at", &self.last_login_at)
            .finish()
    }
}
