#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use pyrun_api::config::ServerConfig;
use pyrun_api::router::build_app_router;
use pyrun_api::state::AppState;

/// Build a test `ServerConfig` whose UI directories live under `ui_root`.
pub fn test_config(ui_root: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:8000".to_string()],
        request_timeout_secs: 30,
        static_dir: ui_root.join("static"),
        templates_dir: ui_root.join("templates"),
    }
}

/// Build the full application router with all middleware layers, exactly
/// as `main.rs` does.
pub fn build_test_app(ui_root: &Path) -> Router {
    let config = test_config(ui_root);
    let state = AppState {
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Write a minimal UI shell under `ui_root`.
pub fn write_ui(ui_root: &Path) {
    std::fs::create_dir_all(ui_root.join("templates")).expect("mkdir templates");
    std::fs::create_dir_all(ui_root.join("static")).expect("mkdir static");
    std::fs::write(
        ui_root.join("templates/index.html"),
        "<!doctype html><title>pyrun</title>",
    )
    .expect("write index");
    std::fs::write(ui_root.join("static/app.js"), "console.log('pyrun');").expect("write js");
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Collect a response body as a UTF-8 string.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Send a GET request through the router.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a urlencoded form POST through the router.
pub async fn post_form(app: Router, uri: &str, form: &str) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Serve `app` on an ephemeral local port and return its address.
pub async fn spawn_server(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}
