pub mod health;
pub mod ui;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the script runner route tree.
///
/// Route hierarchy:
///
/// ```text
/// /scan                  POST form `dir`   -> scripts in a directory
/// /args                  POST form `path`  -> options declared by a script
/// /ws/run                WebSocket         -> one streamed run per connection
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/scan", post(handlers::scripts::scan_scripts))
        .route("/args", post(handlers::scripts::extract_args))
        .route("/ws/run", get(ws::run_handler))
}
