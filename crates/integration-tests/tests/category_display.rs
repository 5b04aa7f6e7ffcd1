//! End-to-end flows through the full router with in-memory collaborators.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::StatusCode;
use serde_json::json;

use category_display_admin::services::settings_keys;
use axum::body::Body;
use axum::http::{Request, header};
use category_display_core::Category;
use category_display_integration_tests::{
    ADMIN_LOGIN, ADMIN_TOKEN, TestApp, VIEWER_LOGIN, VIEWER_TOKEN, category,
    editor_security_token, position_of,
};

const PLACEHOLDER: &str = "<p>No categories selected to display.</p>";

#[tokio::test]
async fn test_health_endpoints() {
    let app = TestApp::new().await;

    let response = app.get("/health", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "ok");

    let response = app.get("/health/ready", None).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_anonymous_editor_redirects_to_login() {
    let app = TestApp::new().await;

    let response = app.get("/categories", None).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/auth/login"));

    let response = app.get("/auth/login", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("name=\"access_token\""));
}

#[tokio::test]
async fn test_anonymous_save_is_rejected() {
    let app = TestApp::new().await;

    let response = app
        .post_json(
            "/api/categories/order",
            None,
            &json!({"security": "x", "sorted_categories": ["1"]}),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.json()["success"], json!(false));
    assert!(app.settings.snapshot().await.is_empty());
}

#[tokio::test]
async fn test_wrong_access_token_is_rejected() {
    let app = TestApp::new().await;

    let response = app.submit_login(ADMIN_LOGIN, "not-the-token").await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert!(response.body.contains("Invalid login or access token."));

    let response = app.submit_login("nobody", ADMIN_TOKEN).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_editor_lists_catalog_in_source_order_before_any_save() {
    let app = TestApp::new().await;
    let cookie = app.login(ADMIN_LOGIN, ADMIN_TOKEN).await;

    let response = app.get("/categories", Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::OK);

    let html = &response.body;
    let a = position_of(html, "data-id=\"1\"");
    let b = position_of(html, "data-id=\"2\"");
    let c = position_of(html, "data-id=\"3\"");
    assert!(a < b && b < c);
    assert!(!html.contains(" checked"));
    assert!(editor_security_token(html).is_some());
}

#[tokio::test]
async fn test_save_then_render_and_reopen_editor() {
    let app = TestApp::new().await;
    let cookie = app.login(ADMIN_LOGIN, ADMIN_TOKEN).await;

    let editor = app.get("/categories", Some(&cookie)).await;
    let token = editor_security_token(&editor.body).unwrap();

    let response = app
        .post_json(
            "/api/categories/order",
            Some(&cookie),
            &json!({
                "security": token,
                "sorted_categories": ["2", "3", "1"],
                "hide_empty": "1",
                "show_product_count": "1",
            }),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    assert_eq!(
        response.json(),
        json!({"success": true, "data": "Settings saved successfully."})
    );

    let stored = app.settings.snapshot().await;
    assert_eq!(stored[settings_keys::SORTED_CATEGORIES], json!(["2", "3", "1"]));
    assert_eq!(stored[settings_keys::HIDE_EMPTY], json!(true));
    assert_eq!(stored[settings_keys::SHOW_PRODUCT_COUNT], json!(true));

    // Empty B is hidden; C keeps its place before A.
    let fragment = app.get("/shortcodes/category_display", None).await;
    assert_eq!(fragment.status, StatusCode::OK);
    let html = &fragment.body;
    assert!(html.contains("wc-categories-container"));
    let c = position_of(html, "<h3>C</h3><span> 2 products </span>");
    let a = position_of(html, "<h3>A</h3><span> 5 products </span>");
    assert!(c < a);
    assert!(!html.contains("<h3>B</h3>"));
    assert!(html.contains("href=\"https://shop.test/product-category/c/\""));
    assert!(html.contains("src=\"/static/img/placeholder.svg\""));

    // Selected rows come first in stored order, then the rest.
    let editor = app.get("/categories", Some(&cookie)).await;
    let html = &editor.body;
    let b = position_of(html, "data-id=\"2\"");
    let c = position_of(html, "data-id=\"3\"");
    let a = position_of(html, "data-id=\"1\"");
    assert!(b < c && c < a);
}

#[tokio::test]
async fn test_save_with_bad_token_leaves_store_unchanged() {
    let app = TestApp::new().await;
    let cookie = app.login(ADMIN_LOGIN, ADMIN_TOKEN).await;

    for security in [json!("forged"), json!(null), json!(42)] {
        let response = app
            .post_json(
                "/api/categories/order",
                Some(&cookie),
                &json!({"security": security, "sorted_categories": ["1"]}),
            )
            .await;
        assert_eq!(response.status, StatusCode::FORBIDDEN);
        assert_eq!(response.json()["success"], json!(false));
    }

    assert!(app.settings.snapshot().await.is_empty());
}

#[tokio::test]
async fn test_viewer_cannot_open_editor_or_save() {
    let app = TestApp::new().await;
    let cookie = app.login(VIEWER_LOGIN, VIEWER_TOKEN).await;

    let response = app.get("/categories", Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .post_json(
            "/api/categories/order",
            Some(&cookie),
            &json!({"security": "anything", "sorted_categories": ["1"]}),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.json()["data"], json!("Insufficient privileges"));
    assert!(app.settings.snapshot().await.is_empty());
}

#[tokio::test]
async fn test_malformed_submission_is_coerced_to_defaults() {
    let app = TestApp::new().await;
    let cookie = app.login(ADMIN_LOGIN, ADMIN_TOKEN).await;
    let editor = app.get("/categories", Some(&cookie)).await;
    let token = editor_security_token(&editor.body).unwrap();

    let response = app
        .post_json(
            "/api/categories/order",
            Some(&cookie),
            &json!({
                "security": token,
                "sorted_categories": "1,2,3",
                "hide_empty": {"nested": true},
            }),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let stored = app.settings.snapshot().await;
    assert_eq!(stored[settings_keys::SORTED_CATEGORIES], json!([]));
    assert_eq!(stored[settings_keys::HIDE_EMPTY], json!(false));
    assert_eq!(stored[settings_keys::SHOW_PRODUCT_COUNT], json!(false));

    let fragment = app.get("/shortcodes/category_display", None).await;
    assert_eq!(fragment.body.trim(), PLACEHOLDER);
}

#[tokio::test]
async fn test_shortcode_names() {
    let app = TestApp::new().await;

    let response = app.get("/shortcodes/category_display", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body.trim(), PLACEHOLDER);

    let response = app.get("/shortcodes/woocommerce_category_display", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body.trim(), PLACEHOLDER);

    let response = app.get("/shortcodes/unknown", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deleted_category_disappears_from_render() {
    let app = TestApp::new().await;
    let cookie = app.login(ADMIN_LOGIN, ADMIN_TOKEN).await;
    let editor = app.get("/categories", Some(&cookie)).await;
    let token = editor_security_token(&editor.body).unwrap();

    app.post_json(
        "/api/categories/order",
        Some(&cookie),
        &json!({"security": token, "sorted_categories": ["3", "1"]}),
    )
    .await;

    app.catalog
        .remove(&category_display_core::CategoryId::new("3"))
        .await;

    let html = app.get("/shortcodes/category_display", None).await.body;
    assert!(html.contains("<h3>A</h3>"));
    assert!(!html.contains("<h3>C</h3>"));
    assert!(!html.contains("<span>"));
}

#[tokio::test]
async fn test_logout_ends_session() {
    let app = TestApp::new().await;
    let cookie = app.login(ADMIN_LOGIN, ADMIN_TOKEN).await;

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/auth/logout")
        .header(axum::http::header::COOKIE, &cookie)
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.send(request).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);

    let response = app.get("/categories", Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/auth/login"));
}

#[tokio::test]
async fn test_viewer_save_rejected_before_body_is_read() {
    let app = TestApp::new().await;
    let cookie = app.login(VIEWER_LOGIN, VIEWER_TOKEN).await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/categories/order")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::COOKIE, &cookie)
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.send(request).await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(
        response.json(),
        json!({"success": false, "data": "Insufficient privileges"})
    );
    assert!(app.settings.snapshot().await.is_empty());
}

#[tokio::test]
async fn test_editor_replaces_unsafe_image_urls_with_placeholder() {
    let app = TestApp::with_catalog(vec![
        Category {
            image_url: Some("javascript:alert(1)".to_owned()),
            ..category("1", "Scripted", 3)
        },
        Category {
            image_url: Some("https://cdn.shop.test/hats.jpg".to_owned()),
            ..category("2", "Hats", 1)
        },
    ])
    .await;
    let cookie = app.login(ADMIN_LOGIN, ADMIN_TOKEN).await;

    let editor = app.get("/categories", Some(&cookie)).await;
    assert_eq!(editor.status, StatusCode::OK);
    assert!(!editor.body.contains("javascript:"));
    assert!(editor.body.contains("src=\"/static/img/placeholder.svg\""));
    assert!(editor.body.contains("src=\"https://cdn.shop.test/hats.jpg\""));

    let token = editor_security_token(&editor.body).unwrap();
    let response = app
        .post_json(
            "/api/categories/order",
            Some(&cookie),
            &json!({"security": token, "sorted_categories": ["1", "2"]}),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let fragment = app.get("/shortcodes/category_display", None).await;
    assert!(!fragment.body.contains("javascript:"));
    assert!(fragment.body.contains("<h3>Scripted</h3>"));
}
