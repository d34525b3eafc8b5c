//! Integration tests for the health check endpoint, the UI shell and
//! general HTTP behaviour.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, body_text, get};
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Test: GET /health reports ok when the UI shell is present
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_check_returns_ok_with_json() {
    let ui = tempfile::tempdir().unwrap();
    common::write_ui(ui.path());
    let app = common::build_test_app(ui.path());

    let response = get(app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["ui_available"], true);
}

// ---------------------------------------------------------------------------
// Test: GET /health is degraded without the UI shell
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_check_degraded_without_ui() {
    let ui = tempfile::tempdir().unwrap();
    let app = common::build_test_app(ui.path());

    let json = body_json(get(app, "/health").await).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["ui_available"], false);
}

// ---------------------------------------------------------------------------
// Test: GET / serves the UI shell and /static serves assets
// ---------------------------------------------------------------------------

#[tokio::test]
async fn index_and_static_assets_are_served() {
    let ui = tempfile::tempdir().unwrap();
    common::write_ui(ui.path());

    let response = get(common::build_test_app(ui.path()), "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("<title>pyrun</title>"));

    let response = get(common::build_test_app(ui.path()), "/static/app.js").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("pyrun"));
}

// ---------------------------------------------------------------------------
// Test: Unknown route returns 404
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_route_returns_404() {
    let ui = tempfile::tempdir().unwrap();
    let app = common::build_test_app(ui.path());
    let response = get(app, "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: x-request-id header is present in response
// ---------------------------------------------------------------------------

#[tokio::test]
async fn response_contains_x_request_id_header() {
    let ui = tempfile::tempdir().unwrap();
    let app = common::build_test_app(ui.path());
    let response = get(app, "/health").await;

    let request_id = response.headers().get("x-request-id");
    assert!(
        request_id.is_some(),
        "Response must contain an x-request-id header"
    );

    // The value should be a valid UUID (36 chars with hyphens).
    let id_str = request_id.unwrap().to_str().unwrap();
    assert_eq!(id_str.len(), 36, "x-request-id should be a UUID string");
}

// ---------------------------------------------------------------------------
// Test: CORS preflight OPTIONS request returns correct headers
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cors_preflight_returns_correct_headers() {
    let ui = tempfile::tempdir().unwrap();
    let app = common::build_test_app(ui.path());

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/scan")
        .header("Origin", "http://localhost:8000")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let headers = response.headers();
    let allow_origin = headers
        .get("access-control-allow-origin")
        .expect("Missing Access-Control-Allow-Origin header")
        .to_str()
        .unwrap();
    assert_eq!(allow_origin, "http://localhost:8000");

    let allow_methods = headers
        .get("access-control-allow-methods")
        .expect("Missing Access-Control-Allow-Methods header")
        .to_str()
        .unwrap();
    assert!(
        allow_methods.contains("POST"),
        "Allow-Methods should contain POST, got: {allow_methods}"
    );
}
