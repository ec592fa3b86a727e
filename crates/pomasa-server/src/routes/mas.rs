use axum::extract::{Query, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::IntoResponse;
use axum::Json;
use pomasa_core::creation::CreationRequest;
use pomasa_core::PomasaError;
use serde::Deserialize;
use std::path::PathBuf;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::StreamExt as _;

use crate::creation::spawn_creation;
use crate::error::{join_error, AppError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PathQuery {
    #[serde(default)]
    pub path: Option<String>,
}

impl PathQuery {
    fn require(self) -> Result<PathBuf, AppError> {
        match self.path {
            Some(p) if !p.trim().is_empty() => Ok(pomasa_core::paths::expand_home(p.trim())),
            _ => Err(AppError::bad_request("Missing path parameter")),
        }
    }
}

/// GET /api/mas/info?path=
///
/// Name, path and file tree of a MAS directory.
pub async fn get_info(Query(q): Query<PathQuery>) -> Result<Json<serde_json::Value>, AppError> {
    let path = q.require()?;
    let info = tokio::task::spawn_blocking(move || pomasa_core::tree::describe_dir(&path))
        .await
        .map_err(join_error)?
        .map_err(|e| match e {
            PomasaError::NotADirectory(_) => AppError::bad_request("Path is not a directory"),
            other => AppError::internal("Failed to read directory", other),
        })?;

    Ok(Json(serde_json::json!(info)))
}

/// GET /api/mas/file?path=
///
/// Raw text of one file.
pub async fn get_file(Query(q): Query<PathQuery>) -> Result<Json<serde_json::Value>, AppError> {
    let path = q.require()?;
    let content = tokio::task::spawn_blocking(move || std::fs::read_to_string(&path))
        .await
        .map_err(join_error)?
        .map_err(|e| AppError::internal("Failed to read file", e))?;

    Ok(Json(serde_json::json!({ "content": content })))
}

/// POST /api/mas/create
///
/// Write `user_input.md`, then stream the agent run
/// as server-sent events.
///
/// Validation, collision and setup failures are plain JSON errors; once the
/// stream starts, failures arrive in-band as `error` + `done` events.
pub async fn create_mas(
    State(app): State<AppState>,
    Json(req): Json<CreationRequest>,
) -> Result<impl IntoResponse, AppError> {
    let setup = app.clone();
    let prepared = tokio::task::spawn_blocking(move || {
        let catalog = match setup.patterns() {
            Ok(c) => Some(c),
            Err(e) => {
                tracing::warn!(error = %e, "catalog unavailable, Required patterns not enforced");
                None
            }
        };
        req.prepare(&setup.data_dir, catalog.as_ref().map(|c| c.as_slice()))
    })
    .await
    .map_err(join_error)?
    .map_err(|e| AppError::internal("Failed to create MAS", e))?;

    tracing::info!(mas_path = %prepared.mas_path.display(), "user_input.md written");

    let rx = spawn_creation(prepared, &app.config.agent);
    let stream = ReceiverStream::new(rx).map(|event| Event::default().json_data(event));

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
