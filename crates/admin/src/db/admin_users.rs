//! Admin account database operations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use category_display_core::AdminUserId;

use crate::models::admin_user::{AdminAccount, AdminRole};
use crate::store::{AdminDirectory, StoreError};

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct AdminUserRow {
    id: i32,
    login: String,
    name: String,
    role: AdminRole,
    token_digest: String,
    created_at: DateTime<Utc>,
    last_login_at: Option<DateTime<Utc>>,
}

impl From<AdminUserRow> for AdminAccount {
    fn from(row: AdminUserRow) -> Self {
        Self {
            id: AdminUserId::new(row.id),
            login: row.login,
            name: row.name,
            role: row.role,
            token_digest: row.token_digest,
            created_at: row.created_at,
            last_login_at: row.last_login_at,
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Admin accounts stored in `category_display.admin_users`.
#[derive(Debug, Clone)]
pub struct PgAdminDirectory {
    pool: PgPool,
}

impl PgAdminDirectory {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new admin account.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` if the login is already taken, or
    /// `StoreError::Database` if the query fails.
    pub async fn create(
        &self,
        login: &str,
        name: &str,
        role: AdminRole,
        token_digest: &str,
    ) -> Result<AdminAccount, StoreError> {
        let row = sqlx::query_as::<_, AdminUserRow>(
            r"
            INSERT INTO category_display.admin_users (login, name, role, token_digest)
            VALUES ($1, $2, $3, $4)
            RETURNING id, login, name, role, token_digest, created_at, last_login_at
            ",
        )
        .bind(login)
        .bind(name)
        .bind(role)
        .bind(token_digest)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return StoreError::Backend(format!("login already exists: {login}"));
            }
            StoreError::Database(e)
        })?;

        Ok(row.into())
    }
}

#[async_trait]
impl AdminDirectory for PgAdminDirectory {
    async fn find_by_login(&self, login: &str) -> Result<Option<AdminAccount>, StoreError> {
        let row = sqlx::query_as::<_, AdminUserRow>(
            r"
            SELECT id, login, name, role, token_digest, created_at, last_login_at
            FROM category_display.admin_users
            WHERE login = $1
            ",
        )
        .bind(login)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn record_login(&self, id: AdminUserId) -> Result<(), StoreError> {
        sqlx::query(
            r"
            UPDATE category_display.admin_users
            SET last_login_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
