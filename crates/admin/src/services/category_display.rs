//! Category display configuration and rendering pipeline.
//!
//! Reads and writes the three persisted settings through the injected
//! [`SettingsStore`], resolves the stored selection against the
//! [`CategorySource`] and renders the embeddable markup fragment.

use askama::Template;
use serde_json::{Value, json};
use thiserror::Error;

use category_display_core::{
    Category, CategoryId, DisplaySettings, safe_url, select_for_display,
};

use crate::config::RenderConfig;
use crate::models::CurrentAdmin;
use crate::services::auth::tokens_match;
use crate::store::{CategorySource, SettingsStore, StoreError};

/// Keys of the persisted settings.
pub mod settings_keys {
    /// Ordered list of selected category IDs (JSON array of strings).
    pub const SORTED_CATEGORIES: &str = "category_display.sorted_categories";
    /// Hide categories without products (JSON boolean).
    pub const HIDE_EMPTY: &str = "category_display.hide_empty";
    /// Show the product count next to each name (JSON boolean).
    pub const SHOW_PRODUCT_COUNT: &str = "category_display.show_product_count";
}

/// Errors from saving the configuration.
#[derive(Debug, Error)]
pub enum SaveError {
    /// The caller lacks the `manage_options` capability.
    #[error("insufficient privileges to change the category display")]
    Forbidden,

    /// The anti-forgery token is missing or does not match the session.
    #[error("invalid or missing security token")]
    InvalidToken,

    /// The settings store rejected the write.
    #[error("settings store error: {0}")]
    Store(#[from] StoreError),
}

/// Errors from rendering the fragment.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("settings store error: {0}")]
    Store(#[from] StoreError),
    #[error("template error: {0}")]
    Template(#[from] askama::Error),
}

/// A submitted configuration, exactly as the client sent it.
///
/// Every field is loosely typed; malformed values are coerced to safe
/// defaults instead of being rejected.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct SaveSubmission {
    /// Anti-forgery token.
    #[serde(default)]
    pub security: Option<Value>,
    /// Ordered category IDs.
    #[serde(default)]
    pub sorted_categories: Option<Value>,
    /// Hide-empty flag (`"1"` / `"0"`).
    #[serde(default)]
    pub hide_empty: Option<Value>,
    /// Show-count flag (`"1"` / `"0"`).
    #[serde(default)]
    pub show_product_count: Option<Value>,
}

/// One category block of the rendered fragment.
#[derive(Debug, Clone)]
pub struct CategoryBlock {
    pub name: String,
    pub link: String,
    pub image_url: String,
    pub product_count: u32,
}

/// The embeddable category display fragment.
#[derive(Template)]
#[template(path = "shortcodes/category_display.html")]
pub struct CategoryDisplayTemplate {
    pub nothing_selected: bool,
    pub blocks: Vec<CategoryBlock>,
    pub show_count: bool,
    pub count_label: String,
}

/// Category display service.
pub struct CategoryDisplayService<'a> {
    settings: &'a dyn SettingsStore,
    catalog: &'a dyn CategorySource,
}

impl<'a> CategoryDisplayService<'a> {
    /// Create a new category display service.
    #[must_use]
    pub const fn new(settings: &'a dyn SettingsStore, catalog: &'a dyn CategorySource) -> Self {
        Self { settings, catalog }
    }

    /// Load the stored configuration, using defaults for missing keys.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the settings store cannot be read.
    pub async fn load_settings(&self) -> Result<DisplaySettings, StoreError> {
        let order = self.settings.get(settings_keys::SORTED_CATEGORIES).await?;
        let hide_empty = self.settings.get(settings_keys::HIDE_EMPTY).await?;
        let show_count = self.settings.get(settings_keys::SHOW_PRODUCT_COUNT).await?;

        Ok(DisplaySettings::coerce(
            order.as_ref(),
            hide_empty.as_ref(),
            show_count.as_ref(),
        ))
    }

    /// Overwrite all three stored fields in a single write.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the settings store rejects the write.
    pub async fn store_settings(&self, settings: &DisplaySettings) -> Result<(), StoreError> {
        let order: Vec<&str> = settings
            .ordered_category_ids
            .iter()
            .map(CategoryId::as_str)
            .collect();

        self.settings
            .set_many(vec![
                (settings_keys::SORTED_CATEGORIES.to_owned(), json!(order)),
                (settings_keys::HIDE_EMPTY.to_owned(), json!(settings.hide_empty)),
                (
                    settings_keys::SHOW_PRODUCT_COUNT.to_owned(),
                    json!(settings.show_count),
                ),
            ])
            .await
    }

    /// Authorize, sanitize and persist a submitted configuration.
    ///
    /// The capability is checked before anything in the submission is read,
    /// then the anti-forgery token; on either failure nothing is written.
    ///
    /// # Errors
    ///
    /// Returns `SaveError::Forbidden`, `SaveError::InvalidToken`, or
    /// `SaveError::Store` if the write fails.
    pub async fn save(
        &self,
        actor: &CurrentAdmin,
        session_token: Option<&str>,
        submission: &SaveSubmission,
    ) -> Result<DisplaySettings, SaveError> {
        if !actor.role.can_manage_options() {
            return Err(SaveError::Forbidden);
        }

        let submitted_token = submission.security.as_ref().and_then(Value::as_str);
        if !tokens_match(session_token, submitted_token) {
            return Err(SaveError::InvalidToken);
        }

        let settings = DisplaySettings::coerce(
            submission.sorted_categories.as_ref(),
            submission.hide_empty.as_ref(),
            submission.show_product_count.as_ref(),
        );
        self.store_settings(&settings).await?;

        tracing::info!(
            admin = %actor.login,
            selected = settings.ordered_category_ids.len(),
            hide_empty = settings.hide_empty,
            show_count = settings.show_count,
            "Category display configuration saved"
        );

        Ok(settings)
    }

    /// Every catalog category (including empty ones) plus the stored configuration.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the catalog or settings store cannot be read.
    pub async fn editor_snapshot(&self) -> Result<(Vec<Category>, DisplaySettings), StoreError> {
        let settings = self.load_settings().await?;
        let categories = self.catalog.list_all().await?;
        Ok((categories, settings))
    }

    /// Build the fragment template for the current configuration.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the catalog or settings store cannot be read.
    pub async fn build(&self, options: &RenderConfig) -> Result<CategoryDisplayTemplate, StoreError> {
        let settings = self.load_settings().await?;

        if settings.is_selection_empty() {
            return Ok(CategoryDisplayTemplate {
                nothing_selected: true,
                blocks: Vec::new(),
                show_count: settings.show_count,
                count_label: options.count_label.clone(),
            });
        }

        let resolved = self.catalog.get_many(&settings.ordered_category_ids).await?;
        let blocks: Vec<CategoryBlock> = select_for_display(&settings, &resolved)
            .into_iter()
            .map(|category| CategoryBlock {
                name: category.name.clone(),
                link: safe_url(&category.link).unwrap_or("#").to_owned(),
                image_url: category.image_or(&options.placeholder_image_url).to_owned(),
                product_count: category.product_count,
            })
            .collect();

        tracing::debug!(
            stored = settings.ordered_category_ids.len(),
            rendered = blocks.len(),
            "Category display resolved"
        );

        Ok(CategoryDisplayTemplate {
            nothing_selected: false,
            blocks,
            show_count: settings.show_count,
            count_label: options.count_label.clone(),
        })
    }

    /// Render the embeddable markup fragment.
    ///
    /// # Errors
    ///
    /// Returns `RenderError` if a collaborator fails or the template cannot render.
    pub async fn render(&self, options: &RenderConfig) -> Result<String, RenderError> {
        Ok(self.build(options).await?.render()?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use category_display_core::AdminRole;
    use serde_json::json;

    use super::*;
    use crate::store::{MemoryCategorySource, MemorySettingsStore};

    fn category(id: &str, name: &str, product_count: u32, image: Option<&str>) -> Category {
        Category {
            id: CategoryId::new(id),
            name: name.to_owned(),
            slug: name.to_lowercase(),
            product_count,
            image_url: image.map(str::to_owned),
            link: format!("https://shop.test/product-category/{}/", name.to_lowercase()),
        }
    }

    fn catalog() -> MemoryCategorySource {
        MemoryCategorySource::new(vec![
            category("1", "A", 5, Some("https://cdn.shop.test/a.jpg")),
            category("2", "B", 0, None),
            category("3", "C", 2, None),
        ])
    }

    fn admin(role: AdminRole) -> CurrentAdmin {
        CurrentAdmin {
            id: category_display_core::AdminUserId::new(1),
            login: "ops".to_owned(),
            name: "Ops".to_owned(),
            role,
        }
    }

    fn options() -> RenderConfig {
        RenderConfig {
            storefront_url: "https://shop.test".to_owned(),
            placeholder_image_url: "/static/img/placeholder.svg".to_owned(),
            count_label: "products".to_owned(),
        }
    }

    fn submission(order: Value, hide: Value, show: Value) -> SaveSubmission {
        SaveSubmission {
            security: Some(json!("tok")),
            sorted_categories: Some(order),
            hide_empty: Some(hide),
            show_product_count: Some(show),
        }
    }

    fn names(template: &CategoryDisplayTemplate) -> Vec<&str> {
        template.blocks.iter().map(|b| b.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_load_defaults_on_first_read() {
        let store = MemorySettingsStore::new();
        let catalog = catalog();
        let service = CategoryDisplayService::new(&store, &catalog);

        assert_eq!(service.load_settings().await.unwrap(), DisplaySettings::default());
        assert!(store.snapshot().await.is_empty(), "reading must not write defaults");
    }

    #[tokio::test]
    async fn test_save_then_load_roundtrip() {
        let store = MemorySettingsStore::new();
        let catalog = catalog();
        let service = CategoryDisplayService::new(&store, &catalog);

        let saved = service
            .save(
                &admin(AdminRole::Admin),
                Some("tok"),
                &submission(json!(["3", "1"]), json!("1"), json!("0")),
            )
            .await
            .unwrap();

        assert_eq!(service.load_settings().await.unwrap(), saved);
        let snapshot = store.snapshot().await;
        assert_eq!(snapshot[settings_keys::SORTED_CATEGORIES], json!(["3", "1"]));
        assert_eq!(snapshot[settings_keys::HIDE_EMPTY], json!(true));
        assert_eq!(snapshot[settings_keys::SHOW_PRODUCT_COUNT], json!(false));
    }

    #[tokio::test]
    async fn test_save_overwrites_whole_record() {
        let store = MemorySettingsStore::new();
        let catalog = catalog();
        let service = CategoryDisplayService::new(&store, &catalog);
        let actor = admin(AdminRole::SuperAdmin);

        service
            .save(&actor, Some("tok"), &submission(json!(["1", "2"]), json!("1"), json!("1")))
            .await
            .unwrap();
        service
            .save(&actor, Some("tok"), &SaveSubmission {
                security: Some(json!("tok")),
                ..SaveSubmission::default()
            })
            .await
            .unwrap();

        assert_eq!(service.load_settings().await.unwrap(), DisplaySettings::default());
    }

    #[tokio::test]
    async fn test_save_coerces_malformed_payload() {
        let store = MemorySettingsStore::new();
        let catalog = catalog();
        let service = CategoryDisplayService::new(&store, &catalog);

        let saved = service
            .save(
                &admin(AdminRole::Admin),
                Some("tok"),
                &submission(json!("1,2,3"), json!({"x": 1}), json!([true])),
            )
            .await
            .unwrap();

        assert_eq!(saved, DisplaySettings::default());
    }

    #[tokio::test]
    async fn test_unauthorized_save_leaves_store_unchanged() {
        let store = MemorySettingsStore::new();
        let catalog = catalog();
        let service = CategoryDisplayService::new(&store, &catalog);
        let payload = submission(json!(["1"]), json!("1"), json!("1"));

        let result = service.save(&admin(AdminRole::Viewer), Some("tok"), &payload).await;
        assert!(matches!(result, Err(SaveError::Forbidden)));

        let result = service.save(&admin(AdminRole::Admin), Some("other"), &payload).await;
        assert!(matches!(result, Err(SaveError::InvalidToken)));

        let result = service.save(&admin(AdminRole::Admin), None, &payload).await;
        assert!(matches!(result, Err(SaveError::InvalidToken)));

        assert!(store.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_render_placeholder_when_nothing_selected() {
        let store = MemorySettingsStore::new();
        let catalog = catalog();
        let service = CategoryDisplayService::new(&store, &catalog);

        let html = service.render(&options()).await.unwrap();
        assert_eq!(html.trim(), "<p>No categories selected to display.</p>");
    }

    #[tokio::test]
    async fn test_render_hide_empty_with_counts() {
        let store = MemorySettingsStore::new();
        let catalog = catalog();
        let service = CategoryDisplayService::new(&store, &catalog);
        service
            .store_settings(&DisplaySettings {
                ordered_category_ids: vec!["2".into(), "3".into(), "1".into()],
                hide_empty: true,
                show_count: true,
            })
            .await
            .unwrap();

        let template = service.build(&options()).await.unwrap();
        assert_eq!(names(&template), vec!["C", "A"]);

        let html = template.render().unwrap();
        let c = html.find("<h3>C</h3><span> 2 products </span>").unwrap();
        let a = html.find("<h3>A</h3><span> 5 products </span>").unwrap();
        assert!(c < a);
        assert!(!html.contains("<h3>B</h3>"));
    }

    #[tokio::test]
    async fn test_render_without_counts() {
        let store = MemorySettingsStore::new();
        let catalog = catalog();
        let service = CategoryDisplayService::new(&store, &catalog);
        service
            .store_settings(&DisplaySettings {
                ordered_category_ids: vec!["1".into(), "2".into()],
                hide_empty: false,
                show_count: false,
            })
            .await
            .unwrap();

        let html = service.render(&options()).await.unwrap();
        assert!(html.contains("<h3>A</h3>"));
        assert!(html.contains("<h3>B</h3>"));
        assert!(!html.contains("<span>"));
        assert!(!html.contains("products"));
    }

    #[tokio::test]
    async fn test_render_skips_deleted_categories() {
        let store = MemorySettingsStore::new();
        let catalog = catalog();
        let service = CategoryDisplayService::new(&store, &catalog);
        service
            .store_settings(&DisplaySettings {
                ordered_category_ids: vec!["3".into(), "404".into(), "1".into()],
                hide_empty: false,
                show_count: false,
            })
            .await
            .unwrap();

        let template = service.build(&options()).await.unwrap();
        assert_eq!(names(&template), vec!["C", "A"]);

        catalog.remove(&CategoryId::new("3")).await;
        let template = service.build(&options()).await.unwrap();
        assert_eq!(names(&template), vec!["A"]);
    }

    #[tokio::test]
    async fn test_render_image_fallback_and_links() {
        let store = MemorySettingsStore::new();
        let catalog = catalog();
        catalog
            .upsert(Category {
                link: "javascript:alert(1)".to_owned(),
                ..category("9", "Evil <b>", 1, Some("data:image/png;base64,AAAA"))
            })
            .await;
        let service = CategoryDisplayService::new(&store, &catalog);
        service
            .store_settings(&DisplaySettings {
                ordered_category_ids: vec!["1".into(), "3".into(), "9".into()],
                hide_empty: false,
                show_count: false,
            })
            .await
            .unwrap();

        let template = service.build(&options()).await.unwrap();
        assert_eq!(template.blocks[0].image_url, "https://cdn.shop.test/a.jpg");
        assert_eq!(template.blocks[1].image_url, "/static/img/placeholder.svg");
        assert_eq!(template.blocks[2].image_url, "/static/img/placeholder.svg");
        assert_eq!(template.blocks[2].link, "#");

        let html = template.render().unwrap();
        assert!(html.contains("Evil &#60;b&#62;") || html.contains("Evil &lt;b&gt;"));
        assert!(!html.contains("Evil <b>"));
    }
}
