//! Admin authentication error types.

use thiserror::Error;

use crate::store::StoreError;

/// Errors that can occur during admin authentication operations.
#[derive(Debug, Error)]
pub enum AdminAuthError {
    /// Unknown login or wrong access token.
    ///
    /// Deliberately the same error for both so the login form does not reveal
    /// which accounts exist.
    #[error("invalid login or access token")]
    InvalidCredentials,

    /// Account directory error.
    #[error("account directory error: {0}")]
    Store(#[from] StoreError),
}
