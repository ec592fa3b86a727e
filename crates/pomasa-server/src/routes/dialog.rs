use axum::body::Bytes;
use axum::Json;
use serde::Deserialize;

use crate::error::{join_error, AppError};

#[derive(Debug, Default, Deserialize)]
pub struct DialogRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

/// Bodies are optional; anything unparseable means "use the default prompt".
fn parse_request(body: &Bytes) -> DialogRequest {
    serde_json::from_slice(body).unwrap_or_default()
}

/// POST /api/dialog/select-folder
///
/// `{path}`, `null` on cancel.
pub async fn select_folder(body: Bytes) -> Result<Json<serde_json::Value>, AppError> {
    let req = parse_request(&body);
    let path = tokio::task::spawn_blocking(move || {
        pomasa_core::dialog::select_folder(req.prompt.as_deref())
    })
    .await
    .map_err(join_error)?;

    Ok(Json(serde_json::json!({ "path": path })))
}

/// POST /api/dialog/select-files
///
/// `{paths}`, empty on cancel.
pub async fn select_files(body: Bytes) -> Result<Json<serde_json::Value>, AppError> {
    let req = parse_request(&body);
    let paths = tokio::task::spawn_blocking(move || {
        pomasa_core::dialog::select_files(req.prompt.as_deref())
    })
    .await
    .map_err(join_error)?;

    Ok(Json(serde_json::json!({ "paths": paths })))
}
