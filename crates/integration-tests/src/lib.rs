//! Integration test harness for the category display service.
//!
//! # Running Tests
//!
//! ```bash
//! # In-process tests (in-memory stores, no database needed)
//! cargo test -p category-display-integration-tests
//!
//! # PostgreSQL-backed tests
//! DATABASE_URL=postgres://localhost/category_display_test \
//!     cargo test -p category-display-integration-tests -- --ignored
//! ```
//!
//! [`TestApp`] wires the full router (sessions, tracing, static files) to
//! in-memory collaborators and drives it with `tower::ServiceExt::oneshot`.

#![allow(clippy::missing_panics_doc, clippy::expect_used)]

use std::collections::HashMap;
use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, Response, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;
use tower_sessions::MemoryStore;

use category_display_admin::config::AdminConfig;
use category_display_admin::middleware::{SESSION_COOKIE_NAME, create_session_layer};
use category_display_admin::state::AppState;
use category_display_admin::store::{
    MemoryAdminDirectory, MemoryCategorySource, MemorySettingsStore,
};
use category_display_core::{AdminRole, Category, CategoryId};

pub const ADMIN_LOGIN: &str = "ops";
pub const ADMIN_TOKEN: &str = "admin-access-token";
pub const VIEWER_LOGIN: &str = "auditor";
pub const VIEWER_TOKEN: &str = "viewer-access-token";

/// A buffered response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub set_cookie: Option<String>,
    pub body: String,
}

impl TestResponse {
    async fn from_response(response: Response<Body>) -> Self {
        let status = response.status();
        let header_value = |name: header::HeaderName| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned)
        };
        let location = header_value(header::LOCATION);
        let set_cookie = header_value(header::SET_COOKIE);
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read body");

        Self {
            status,
            location,
            set_cookie,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    /// Parse the body as JSON.
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).expect("response body is not JSON")
    }
}

/// A category with a storefront-style link.
pub fn category(id: &str, name: &str, product_count: u32) -> Category {
    let slug = name.to_lowercase();
    Category {
        id: CategoryId::new(id),
        name: name.to_owned(),
        link: format!("https://shop.test/product-category/{slug}/"),
        slug,
        product_count,
        image_url: None,
    }
}

/// The application under test plus handles on its collaborators.
pub struct TestApp {
    pub router: Router,
    pub settings: Arc<MemorySettingsStore>,
    pub catalog: Arc<MemoryCategorySource>,
    pub admins: Arc<MemoryAdminDirectory>,
}

impl TestApp {
    /// Catalog `A` (5 products), `B` (empty), `C` (2 products), in that order,
    /// with one admin and one viewer account.
    pub async fn new() -> Self {
        Self::with_catalog(vec![
            category("1", "A", 5),
            category("2", "B", 0),
            category("3", "C", 2),
        ])
        .await
    }

    pub async fn with_catalog(categories: Vec<Category>) -> Self {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("CATEGORY_DISPLAY_DATABASE_URL", "postgres://unused/test"),
            ("CATEGORY_DISPLAY_BASE_URL", "http://localhost:3001"),
            ("CATEGORY_DISPLAY_STOREFRONT_URL", "https://shop.test"),
        ]);
        let config = AdminConfig::from_lookup(|key| vars.get(key).map(|v| (*v).to_owned()))
            .expect("test configuration is valid");

        let settings = Arc::new(MemorySettingsStore::new());
        let catalog = Arc::new(MemoryCategorySource::new(categories));
        let admins = Arc::new(MemoryAdminDirectory::new());
        admins
            .insert(ADMIN_LOGIN, "Ops Team", AdminRole::Admin, ADMIN_TOKEN)
            .await;
        admins
            .insert(VIEWER_LOGIN, "Auditor", AdminRole::Viewer, VIEWER_TOKEN)
            .await;

        let session_layer = create_session_layer(MemoryStore::default(), &config);
        let state = AppState::new(
            config,
            settings.clone(),
            catalog.clone(),
            admins.clone(),
        );

        Self {
            router: category_display_admin::app(state, session_layer),
            settings,
            catalog,
            admins,
        }
    }

    /// Send a request through the router.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        TestResponse::from_response(response).await
    }

    /// `GET path`, optionally with a session cookie.
    pub async fn get(&self, path: &str, cookie: Option<&str>) -> TestResponse {
        let mut builder = Request::builder().method("GET").uri(path);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).expect("valid request"))
            .await
    }

    /// `POST path` with a JSON body, optionally with a session cookie.
    pub async fn post_json(&self, path: &str, cookie: Option<&str>, body: &Value) -> TestResponse {
        let mut builder = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(
            builder
                .body(Body::from(body.to_string()))
                .expect("valid request"),
        )
        .await
    }

    /// Submit the login form; returns the raw response.
    pub async fn submit_login(&self, login: &str, access_token: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri("/auth/login")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(format!("login={login}&access_token={access_token}")))
            .expect("valid request");
        self.send(request).await
    }

    /// Sign in and return the `name=value` session cookie.
    pub async fn login(&self, login: &str, access_token: &str) -> String {
        let response = self.submit_login(login, access_token).await;
        assert_eq!(response.status, StatusCode::SEE_OTHER, "login failed: {}", response.body);
        session_cookie(&response).expect("login sets a session cookie")
    }
}

/// Extract `name=value` of the session cookie from a response.
pub fn session_cookie(response: &TestResponse) -> Option<String> {
    let raw = response.set_cookie.as_deref()?;
    let pair = raw.split(';').next()?.trim();
    pair.starts_with(&format!("{SESSION_COOKIE_NAME}="))
        .then(|| pair.to_owned())
}

/// Extract the anti-forgery token embedded in the editor page.
pub fn editor_security_token(html: &str) -> Option<String> {
    let marker = "data-security=\"";
    let start = html.find(marker)? + marker.len();
    let rest = html.get(start..)?;
    let end = rest.find('"')?;
    rest.get(..end).map(str::to_owned)
}

/// Position of `needle` in `haystack`, panicking with context when absent.
pub fn position_of(haystack: &str, needle: &str) -> usize {
    haystack
        .find(needle)
        .unwrap_or_else(|| panic!("{needle:?} not found in:\n{haystack}"))
}
