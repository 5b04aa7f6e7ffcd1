//! Admin authentication service.
//!
//! Admins sign in with a login name and a random access token issued by
//! `cd-cli admin create`. Only the SHA-256 digest of the token is stored.

mod error;

pub use error::AdminAuthError;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::models::CurrentAdmin;
use crate::store::AdminDirectory;

/// Size of a generated access token, in random bytes.
const ACCESS_TOKEN_BYTES: usize = 32;

/// Admin authentication service.
pub struct AdminAuthService<'a> {
    directory: &'a dyn AdminDirectory,
}

impl<'a> AdminAuthService<'a> {
    /// Create a new admin authentication service.
    #[must_use]
    pub const fn new(directory: &'a dyn AdminDirectory) -> Self {
        Self { directory }
    }

    /// Verify a login/access-token pair and return the session identity.
    ///
    /// # Errors
    ///
    /// Returns `AdminAuthError::InvalidCredentials` for an unknown login or a
    /// wrong token, and `AdminAuthError::Store` if the directory fails.
    pub async fn authenticate(
        &self,
        login: &str,
        access_token: &str,
    ) -> Result<CurrentAdmin, AdminAuthError> {
        let login = login.trim();
        let account = self
            .directory
            .find_by_login(login)
            .await?
            .ok_or(AdminAuthError::InvalidCredentials)?;

        if !verify_access_token(access_token.trim(), &account.token_digest) {
            tracing::warn!(login = %login, "Rejected admin sign-in: token mismatch");
            return Err(AdminAuthError::InvalidCredentials);
        }

        self.directory.record_login(account.id).await?;
        Ok(CurrentAdmin::from(&account))
    }
}

/// Generate a new random access token (URL-safe base64, 256 bits).
#[must_use]
pub fn generate_access_token() -> String {
    let mut bytes = [0u8; ACCESS_TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Hex-encoded SHA-256 digest of an access token, as stored in the directory.
#[must_use]
pub fn digest_access_token(access_token: &str) -> String {
    hex::encode(Sha256::digest(access_token.as_bytes()))
}

/// Check an access token against a stored digest.
#[must_use]
pub fn verify_access_token(access_token: &str, stored_digest: &str) -> bool {
    constant_time_eq(
        digest_access_token(access_token).as_bytes(),
        stored_digest.to_ascii_lowercase().as_bytes(),
    )
}

/// Compare a submitted anti-forgery token with the one held in the session.
///
/// A missing token on either side never matches.
#[must_use]
pub fn tokens_match(expected: Option<&str>, submitted: Option<&str>) -> bool {
    match (expected, submitted) {
        (Some(expected), Some(submitted)) if !expected.is_empty() => {
            constant_time_eq(expected.as_bytes(), submitted.as_bytes())
        }
        _ => false,
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
