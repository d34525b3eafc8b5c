use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the UI shell is present on disk.
    pub ui_available: bool,
}

/// GET /health -- returns service status. The API keeps working without the
/// UI shell, so a missing `index.html` only degrades the status.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let ui_available = tokio::fs::metadata(state.config.index_path())
        .await
        .map(|m| m.is_file())
        .unwrap_or(false);

    let status = if ui_available { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        ui_available,
    })
}

/// Mount health check routes.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
