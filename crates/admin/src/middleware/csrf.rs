//! Per-session anti-forgery tokens.
//!
//! A random token is stored in the session the first time the editor is
//! rendered and embedded in the page; state-changing requests must echo it
//! back. The token is replaced on every sign-in.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;
use tower_sessions::Session;

use crate::models::session_keys;

/// An anti-forgery token value.
///
/// 128 random bits, URL-safe base64 without padding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CsrfToken(pub String);

impl CsrfToken {
    /// Generate a new random token.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; 16];
        rand::rng().fill_bytes(&mut bytes);
        Self(URL_SAFE_NO_PAD.encode(bytes))
    }

    /// Get the token value for use in templates.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

/// The token currently held by the session, if any.
pub async fn session_csrf_token(session: &Session) -> Option<String> {
    session
        .get::<String>(session_keys::CSRF_TOKEN)
        .await
        .ok()
        .flatten()
}

/// Return the session's token, creating one if the session has none yet.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn ensure_csrf_token(
    session: &Session,
) -> Result<CsrfToken, tower_sessions::session::Error> {
    if let Some(existing) = session_csrf_token(session).await {
        return Ok(CsrfToken(existing));
    }
    rotate_csrf_token(session).await
}

/// Replace the session's token with a fresh one.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn rotate_csrf_token(
    session: &Session,
) -> Result<CsrfToken, tower_sessions::session::Error> {
    let token = CsrfToken::generate();
    session.insert(session_keys::CSRF_TOKEN, token.value()).await?;
    Ok(token)
}
