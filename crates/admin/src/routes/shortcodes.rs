//! Public render surface for the category display fragment.
//!
//! Host pages embed the fragment by fetching `/shortcodes/category_display`.
//! `woocommerce_category_display` is accepted as an alias.

use axum::{
    Router,
    extract::{Path, State},
    response::Html,
    routing::get,
};
use tracing::instrument;

use crate::error::AppError;
use crate::state::AppState;

/// Shortcode names that render the category display.
pub const SHORTCODE_NAMES: [&str; 2] = ["category_display", "woocommerce_category_display"];

pub fn router() -> Router<AppState> {
    Router::new().route("/shortcodes/{name}", get(render_shortcode))
}

/// Render a shortcode.
///
/// GET /shortcodes/{name}
#[instrument(skip(state))]
async fn render_shortcode(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Html<String>, AppError> {
    if !SHORTCODE_NAMES.contains(&name.as_str()) {
        return Err(AppError::NotFound(format!("shortcode {name}")));
    }

    let html = state
        .category_display()
        .render(&state.config().render)
        .await?;

    Ok(Html(html))
}
