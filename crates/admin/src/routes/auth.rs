//! Authentication route handlers for admin.
//!
//! Admins sign in with their login and the access token printed by
//! `cd-cli admin create`.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::middleware::{OptionalAdminAuth, clear_current_admin, rotate_csrf_token, set_current_admin};
use crate::services::{AdminAuthError, AdminAuthService};
use crate::state::AppState;

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginPageTemplate {
    pub login: String,
    pub error_message: Option<String>,
}

/// Submitted login form.
#[derive(Deserialize)]
pub struct LoginForm {
    pub login: String,
    pub access_token: String,
}

impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm")
            .field("login", &self.login)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", get(login_page).post(login))
        .route("/auth/logout", post(logout))
}

/// Render the login page.
///
/// GET /auth/login
async fn login_page(OptionalAdminAuth(admin): OptionalAdminAuth) -> Response {
    if admin.is_some() {
        return Redirect::to("/categories").into_response();
    }

    LoginPageTemplate {
        login: String::new(),
        error_message: None,
    }
    .into_response()
}

/// Verify credentials and start an admin session.
///
/// POST /auth/login
#[instrument(skip(state, session))]
async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let auth = AdminAuthService::new(state.admins());

    let admin = match auth.authenticate(&form.login, &form.access_token).await {
        Ok(admin) => admin,
        Err(AdminAuthError::InvalidCredentials) => {
            let page = LoginPageTemplate {
                login: form.login.trim().to_owned(),
                error_message: Some("Invalid login or access token.".to_owned()),
            };
            return Ok((StatusCode::UNAUTHORIZED, page).into_response());
        }
        Err(AdminAuthError::Store(e)) => return Err(e.into()),
    };

    // New session ID on privilege change
    session
        .cycle_id()
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;
    set_current_admin(&session, &admin)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;
    rotate_csrf_token(&session)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;

    set_sentry_user(admin.id.as_i32(), &admin.login);
    tracing::info!(admin = %admin.login, role = %admin.role, "Admin signed in");

    Ok(Redirect::to("/categories").into_response())
}

/// Logout and clear session.
///
/// POST /auth/logout
async fn logout(session: Session) -> impl IntoResponse {
    // Clear the current admin from session
    let _ = clear_current_admin(&session).await;
    let _ = session.flush().await;
    clear_sentry_user();

    // Redirect to login page
    Redirect::to("/auth/login")
}
