//! Identifier types.
//!
//! Category identifiers come from the host catalog and are treated as opaque
//! tokens. Admin user IDs are database keys.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::sanitize::sanitize_text_field;

/// Opaque, stable identifier of a catalog category.
///
/// The catalog decides the format (numeric term IDs, slugs, UUIDs); this type only
/// guarantees the token is non-empty and free of markup once it has passed through
/// [`CategoryId::sanitize`].
///
/// ```
/// use category_display_core::CategoryId;
///
/// let id = CategoryId::sanitize(" <i>17</i> ").unwrap();
/// assert_eq!(id.as_str(), "17");
/// assert!(CategoryId::sanitize("<br>").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(String);

impl CategoryId {
    /// Wrap an identifier that is already known to be clean (e.g. read from the catalog).
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Sanitize an untrusted identifier.
    ///
    /// Returns `None` when nothing is left after sanitization.
    #[must_use]
    pub fn sanitize(raw: &str) -> Option<Self> {
        let clean = sanitize_text_field(raw);
        if clean.is_empty() {
            None
        } else {
            Some(Self(clean))
        }
    }

    /// Get the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CategoryId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl AsRef<str> for CategoryId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Database ID of an admin account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type), sqlx(transparent))]
#[serde(transparent)]
pub struct AdminUserId(i32);

impl AdminUserId {
    /// Create a new ID from an i32 value.
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Get the underlying i32 value.
    #[must_use]
    pub const fn as_i32(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for AdminUserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
