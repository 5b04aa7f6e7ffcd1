//! Catalog category as supplied by the host catalog.

use serde::{Deserialize, Serialize};

use super::id::CategoryId;
use super::sanitize::safe_url;

/// A product category.
///
/// Read-only from the point of view of this service; the catalog owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Stable identifier.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
    /// URL slug used to build the category link.
    pub slug: String,
    /// Number of products in the category.
    pub product_count: u32,
    /// Thumbnail URL, if the category has one.
    pub image_url: Option<String>,
    /// Absolute link to the category page.
    pub link: String,
}

impl Category {
    /// Whether the category has no products.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.product_count == 0
    }

    /// Thumbnail URL, or `placeholder` when the category has none or its
    /// URL is not `http(s)` or root-relative.
    #[must_use]
    pub fn image_or<'a>(&'a self, placeholder: &'a str) -> &'a str {
        self.image_url
            .as_deref()
            .and_then(safe_url)
            .unwrap_or(placeholder)
    }
}
