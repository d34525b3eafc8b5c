//! Handlers for script discovery (`/scan`) and argument extraction (`/args`).
//!
//! Domain failures never become HTTP errors: a missing directory is an
//! `{"error": ...}` body and an unreadable script is an error placeholder
//! inside `args`, both with `200 OK`.

use std::path::PathBuf;

use axum::{Form, Json};
use pyrun_core::discovery::{self, ArgDescriptor, ScriptRef};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Form body for `POST /scan`.
#[derive(Debug, Deserialize)]
pub struct ScanForm {
    /// Directory to scan, absolute or relative to the server's cwd.
    pub dir: String,
}

/// Form body for `POST /args`.
#[derive(Debug, Deserialize)]
pub struct ArgsForm {
    /// Script whose options should be extracted.
    pub path: String,
}

/// Either the discovered scripts or a human-readable error.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ScanResponse {
    Found { scripts: Vec<ScriptRef> },
    Failed { error: String },
}

#[derive(Debug, Serialize)]
pub struct ArgsResponse {
    pub args: Vec<ArgDescriptor>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /scan
///
/// List the scripts directly inside `dir`.
pub async fn scan_scripts(Form(form): Form<ScanForm>) -> Json<ScanResponse> {
    let dir = PathBuf::from(&form.dir);
    let result = tokio::task::spawn_blocking(move || discovery::list_scripts(&dir)).await;

    let response = match result {
        Ok(Ok(scripts)) => {
            tracing::debug!(dir = %form.dir, count = scripts.len(), "Scanned directory");
            ScanResponse::Found { scripts }
        }
        Ok(Err(e)) => {
            tracing::debug!(dir = %form.dir, error = %e, "Directory scan failed");
            ScanResponse::Failed {
                error: e.to_string(),
            }
        }
        Err(e) => {
            tracing::error!(dir = %form.dir, error = %e, "Directory scan task failed");
            ScanResponse::Failed {
                error: format!("Directory scan aborted: {e}"),
            }
        }
    };
    Json(response)
}

/// POST /args
///
/// Extract declared options from the script at `path`.
pub async fn extract_args(Form(form): Form<ArgsForm>) -> Json<ArgsResponse> {
    let path = PathBuf::from(&form.path);
    let args = tokio::task::spawn_blocking(move || discovery::extract_args(&path))
        .await
        .unwrap_or_else(|e| {
            tracing::error!(path = %form.path, error = %e, "Argument extraction task failed");
            vec![ArgDescriptor::Unreadable {
                error: format!("Argument extraction aborted: {e}"),
            }]
        });
    Json(ArgsResponse { args })
}
