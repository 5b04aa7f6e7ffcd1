//! Render the category display fragment to stdout.
//!
//! Uses the same configuration as the admin server, so the output matches
//! what `/shortcodes/category_display` serves.

use category_display_admin::config::AdminConfig;
use category_display_admin::db::{self, PgCategorySource, PgSettingsStore};
use category_display_admin::services::CategoryDisplayService;

/// Print the current fragment.
///
/// # Errors
///
/// Returns an error if configuration is missing, the database is unreachable,
/// or rendering fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AdminConfig::from_env()?;
    let pool = db::create_pool(&config.database_url).await?;

    let settings = PgSettingsStore::new(pool.clone());
    let catalog = PgCategorySource::new(pool, config.render.storefront_url.clone());
    let html = CategoryDisplayService::new(&settings, &catalog)
        .render(&config.render)
        .await?;

    #[allow(clippy::print_stdout)]
    {
        println!("{html}");
    }

    Ok(())
}
