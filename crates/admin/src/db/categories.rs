//! Product category catalog.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;

use category_display_core::{Category, CategoryId};

use crate::store::{CategorySource, StoreError};

#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    id: String,
    name: String,
    slug: String,
    product_count: i32,
    image_url: Option<String>,
}

/// A category as imported by `cd-cli seed categories`.
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    pub product_count: u32,
    pub image_url: Option<String>,
    pub position: i32,
}

/// Categories stored in `category_display.product_categories`.
#[derive(Debug, Clone)]
pub struct PgCategorySource {
    pool: PgPool,
    storefront_url: String,
}

impl PgCategorySource {
    /// Links are built as `{storefront_url}/product-category/{slug}/`.
    #[must_use]
    pub fn new(pool: PgPool, storefront_url: impl Into<String>) -> Self {
        Self {
            pool,
            storefront_url: storefront_url.into(),
        }
    }

    fn to_category(&self, row: CategoryRow) -> Result<Category, StoreError> {
        let product_count = u32::try_from(row.product_count).map_err(|_| {
            StoreError::DataCorruption(format!(
                "negative product count {} for category {}",
                row.product_count, row.id
            ))
        })?;

        Ok(Category {
            link: format!("{}/product-category/{}/", self.storefront_url, row.slug),
            id: CategoryId::new(row.id),
            name: row.name,
            slug: row.slug,
            product_count,
            image_url: row.image_url,
        })
    }

    /// Insert or update a category.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the query fails.
    pub async fn upsert(&self, category: &NewCategory) -> Result<(), StoreError> {
        let product_count = i32::try_from(category.product_count).map_err(|_| {
            StoreError::DataCorruption(format!(
                "product count {} out of range",
                category.product_count
            ))
        })?;

        sqlx::query(
            r"
            INSERT INTO category_display.product_categories
                (id, name, slug, product_count, image_url, position)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                slug = EXCLUDED.slug,
                product_count = EXCLUDED.product_count,
                image_url = EXCLUDED.image_url,
                position = EXCLUDED.position
            ",
        )
        .bind(category.id.as_str())
        .bind(&category.name)
        .bind(&category.slug)
        .bind(product_count)
        .bind(&category.image_url)
        .bind(category.position)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Delete every category. Returns the number of rows removed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the query fails.
    pub async fn clear(&self) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM category_display.product_categories")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl CategorySource for PgCategorySource {
    async fn list_all(&self) -> Result<Vec<Category>, StoreError> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            r"
            SELECT id, name, slug, product_count, image_url
            FROM category_display.product_categories
            ORDER BY position, name
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|row| self.to_category(row)).collect()
    }

    async fn get(&self, id: &CategoryId) -> Result<Option<Category>, StoreError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r"
            SELECT id, name, slug, product_count, image_url
            FROM category_display.product_categories
            WHERE id = $1
            ",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| self.to_category(row)).transpose()
    }

    async fn get_many(
        &self,
        ids: &[CategoryId],
    ) -> Result<HashMap<CategoryId, Category>, StoreError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let keys: Vec<&str> = ids.iter().map(CategoryId::as_str).collect();
        let rows = sqlx::query_as::<_, CategoryRow>(
            r"
            SELECT id, name, slug, product_count, image_url
            FROM category_display.product_categories
            WHERE id = ANY($1)
            ",
        )
        .bind(&keys)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let category = self.to_category(row)?;
                Ok((category.id.clone(), category))
            })
            .collect()
    }
}
