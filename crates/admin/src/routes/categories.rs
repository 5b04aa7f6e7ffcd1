//! Category display editor and save API.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use tower_sessions::Session;
use tracing::instrument;

use category_display_core::arrange_for_editor;

use crate::error::AppError;
use crate::middleware::{RequireOptionsManager, ensure_csrf_token, session_csrf_token};
use crate::models::CurrentAdmin;
use crate::services::{SaveError, SaveSubmission};
use crate::state::AppState;

const SAVED_MESSAGE: &str = "Settings saved successfully.";
const FORBIDDEN_MESSAGE: &str = "Insufficient privileges";
const INVALID_TOKEN_MESSAGE: &str = "Invalid security token";
const FAILED_MESSAGE: &str = "Failed to save settings.";

// =============================================================================
// Templates
// =============================================================================

/// One row of the editor list.
#[derive(Debug, Clone)]
pub struct EditorRowView {
    pub id: String,
    pub name: String,
    pub image_url: String,
    pub product_count: u32,
    pub selected: bool,
}

/// Editor page template.
#[derive(Template, WebTemplate)]
#[template(path = "categories/editor.html")]
pub struct EditorTemplate {
    pub admin_name: String,
    pub rows: Vec<EditorRowView>,
    pub hide_empty: bool,
    pub show_count: bool,
    pub csrf_token: String,
}

/// Build the categories router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/categories", get(editor_page))
        .route("/api/categories/order", post(save_order))
}

// =============================================================================
// API Types
// =============================================================================

/// Response envelope for the save endpoint.
#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub success: bool,
    pub data: String,
}

impl SaveResponse {
    fn ok(message: &str) -> Self {
        Self {
            success: true,
            data: message.to_owned(),
        }
    }

    fn error(message: &str) -> Self {
        Self {
            success: false,
            data: message.to_owned(),
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Render the reorderable category list.
///
/// GET /categories
#[instrument(skip_all)]
async fn editor_page(
    State(state): State<AppState>,
    session: Session,
    RequireOptionsManager(admin): RequireOptionsManager,
) -> Result<Response, AppError> {
    let (categories, settings) = state.category_display().editor_snapshot().await?;
    let placeholder = &state.config().render.placeholder_image_url;

    let rows = arrange_for_editor(&categories, &settings.ordered_category_ids)
        .into_iter()
        .map(|row| EditorRowView {
            id: row.category.id.to_string(),
            name: row.category.name.clone(),
            image_url: row.category.image_or(placeholder).to_owned(),
            product_count: row.category.product_count,
            selected: row.selected,
        })
        .collect();

    let csrf = ensure_csrf_token(&session)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;

    Ok(EditorTemplate {
        admin_name: admin.name,
        rows,
        hide_empty: settings.hide_empty,
        show_count: settings.show_count,
        csrf_token: csrf.value().to_owned(),
    }
    .into_response())
}

/// Save the submitted order and display flags.
///
/// POST /api/categories/order
///
/// The body is JSON with `security`, `sorted_categories`, `hide_empty` and
/// `show_product_count`. It is only read once the caller holds the
/// `manage_options` capability. A body that is not a JSON object is treated
/// as an empty submission, which then fails the token check.
#[instrument(skip_all)]
async fn save_order(
    State(state): State<AppState>,
    session: Session,
    RequireOptionsManager(admin): RequireOptionsManager,
    body: Bytes,
) -> Response {
    let submission = parse_submission(&body);
    let session_token = session_csrf_token(&session).await;

    match save(&state, &admin, session_token.as_deref(), &submission).await {
        Ok(()) => (StatusCode::OK, Json(SaveResponse::ok(SAVED_MESSAGE))).into_response(),
        Err(SaveError::Forbidden) => (
            StatusCode::FORBIDDEN,
            Json(SaveResponse::error(FORBIDDEN_MESSAGE)),
        )
            .into_response(),
        Err(SaveError::InvalidToken) => {
            tracing::warn!("Rejected category display save: security token mismatch");
            (
                StatusCode::FORBIDDEN,
                Json(SaveResponse::error(INVALID_TOKEN_MESSAGE)),
            )
                .into_response()
        }
        Err(SaveError::Store(e)) => {
            let event_id = sentry::capture_error(&e);
            tracing::error!(error = %e, sentry_event_id = %event_id, "Failed to save category display");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SaveResponse::error(FAILED_MESSAGE)),
            )
                .into_response()
        }
    }
}

async fn save(
    state: &AppState,
    admin: &CurrentAdmin,
    session_token: Option<&str>,
    submission: &SaveSubmission,
) -> Result<(), SaveError> {
    state
        .category_display()
        .save(admin, session_token, submission)
        .await
        .map(|_| ())
}

fn parse_submission(body: &[u8]) -> SaveSubmission {
    serde_json::from_slice(body).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "Unparseable category display submission");
        SaveSubmission::default()
    })
}
