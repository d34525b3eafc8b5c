use axum::Router;
use tower_http::services::{ServeDir, ServeFile};

use crate::config::ServerConfig;
use crate::state::AppState;

/// Static UI routes.
///
/// ```text
/// GET /            -> <TEMPLATES_DIR>/index.html
/// GET /static/*    -> <STATIC_DIR>
/// ```
pub fn router(config: &ServerConfig) -> Router<AppState> {
    Router::new()
        .route_service("/", ServeFile::new(config.index_path()))
        .nest_service("/static", ServeDir::new(&config.static_dir))
}
