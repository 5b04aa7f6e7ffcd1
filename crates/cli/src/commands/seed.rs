//! Seed the product category catalog from a YAML file.
//!
//! # File format
//!
//! ```yaml
//! categories:
//!   - id: "12"
//!     name: Shirts
//!     slug: shirts            # optional, derived from the name
//!     product_count: 5
//!     image_url: https://cdn.example.com/shirts.jpg   # optional
//! ```
//!
//! Categories keep the order they have in the file.

use std::path::Path;

use serde::Deserialize;
use tracing::{error, info};

use category_display_admin::db::{self, PgCategorySource};
use category_display_admin::db::categories::NewCategory;
use category_display_core::{CategoryId, sanitize_text_field};

/// Top-level YAML document.
#[derive(Debug, Deserialize)]
pub struct CatalogFile {
    pub categories: Vec<CategoryEntry>,
}

/// One category as written in the YAML file.
#[derive(Debug, Deserialize)]
pub struct CategoryEntry {
    pub id: serde_yaml::Value,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub product_count: u32,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Turn a display name into a URL slug.
fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Validate the file and convert it to insertable rows.
///
/// Returns every problem found rather than stopping at the first.
fn prepare(file: CatalogFile) -> Result<Vec<NewCategory>, Vec<String>> {
    let mut rows = Vec::with_capacity(file.categories.len());
    let mut errors = Vec::new();

    for (index, entry) in file.categories.into_iter().enumerate() {
        let raw_id = match &entry.id {
            serde_yaml::Value::String(s) => s.clone(),
            serde_yaml::Value::Number(n) => n.to_string(),
            other => {
                errors.push(format!("entry {index}: unsupported id {other:?}"));
                continue;
            }
        };
        let Some(id) = CategoryId::sanitize(&raw_id) else {
            errors.push(format!("entry {index}: empty id"));
            continue;
        };

        let name = sanitize_text_field(&entry.name);
        if name.is_empty() {
            errors.push(format!("entry {index} ({id}): empty name"));
            continue;
        }

        let slug = entry
            .slug
            .as_deref()
            .map_or_else(|| slugify(&name), slugify);
        if slug.is_empty() {
            errors.push(format!("entry {index} ({id}): empty slug"));
            continue;
        }

        let Ok(position) = i32::try_from(index) else {
            errors.push(format!("entry {index}: too many categories"));
            continue;
        };

        rows.push(NewCategory {
            id,
            name,
            slug,
            product_count: entry.product_count,
            image_url: entry.image_url.filter(|url| !url.trim().is_empty()),
            position,
        });
    }

    if errors.is_empty() { Ok(rows) } else { Err(errors) }
}

/// Upsert categories from a YAML file.
///
/// # Arguments
///
/// * `file_path` - Path to the YAML file
/// * `clear_existing` - If true, delete every existing category first
///
/// # Errors
///
/// Returns an error if the database URL is missing, the file cannot be read
/// or validated, or a database operation fails.
pub async fn categories(
    file_path: &str,
    clear_existing: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let database_url = super::database_url().ok_or("CATEGORY_DISPLAY_DATABASE_URL not set")?;

    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    info!(path = %file_path, "Loading categories from file");

    // Read and validate YAML before connecting to database
    let content = tokio::fs::read_to_string(path).await?;
    let file: CatalogFile = serde_yaml::from_str(&content)?;
    info!(categories = file.categories.len(), "Parsed file");

    let rows = match prepare(file) {
        Ok(rows) => rows,
        Err(errors) => {
            error!("Validation failed:");
            for err in &errors {
                error!("  - {err}");
            }
            return Err(format!("{} validation errors found", errors.len()).into());
        }
    };

    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    let source = PgCategorySource::new(pool, String::new());
    if clear_existing {
        let removed = source.clear().await?;
        info!(removed, "Cleared existing categories");
    }

    for row in &rows {
        source.upsert(row).await?;
    }

    info!("Seeding complete!");
    info!("  Categories upserted: {}", rows.len());
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Shirts"), "shirts");
        assert_eq!(slugify("Hats & Caps"), "hats-caps");
        assert_eq!(slugify("  Über Sale!  "), "über-sale");
        assert_eq!(slugify("***"), "");
    }

    #[test]
    fn test_prepare_keeps_file_order() {
        let file: CatalogFile = serde_yaml::from_str(
            r#"
categories:
  - id: 12
    name: Shirts
    product_count: 5
  - id: "7"
    name: Hats & Caps
    slug: hats
    image_url: https://cdn.test/hats.jpg
"#,
        )
        .unwrap();

        let rows = prepare(file).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id.as_str(), "12");
        assert_eq!(rows[0].slug, "shirts");
        assert_eq!(rows[0].position, 0);
        assert_eq!(rows[0].image_url, None);
        assert_eq!(rows[1].id.as_str(), "7");
        assert_eq!(rows[1].slug, "hats");
        assert_eq!(rows[1].product_count, 0);
        assert_eq!(rows[1].position, 1);
    }

    #[test]
    fn test_prepare_collects_all_errors() {
        let file: CatalogFile = serde_yaml::from_str(
            r#"
categories:
  - id: ""
    name: Nameless id
  - id: "3"
    name: "<b></b>"
  - id: [1]
    name: List id
"#,
        )
        .unwrap();

        let errors = prepare(file).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
