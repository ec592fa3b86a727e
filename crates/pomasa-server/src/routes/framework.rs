use axum::extract::{Path, State};
use axum::Json;
use pomasa_core::{catalog, paths, PomasaError};

use crate::error::{join_error, AppError};
use crate::state::AppState;

/// GET /api/framework/patterns
///
/// The parsed pattern catalog.
pub async fn list_patterns(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let patterns = tokio::task::spawn_blocking(move || app.patterns())
        .await
        .map_err(join_error)?
        .map_err(|e| AppError::internal("Failed to load patterns", e))?;

    Ok(Json(serde_json::json!({ "patterns": patterns.as_slice() })))
}

/// GET /api/framework/patterns/{id}
///
/// One catalog entry plus its document.
pub async fn get_pattern(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let id = id.trim().to_ascii_uppercase();
    let result = tokio::task::spawn_blocking(move || {
        let patterns = app.patterns()?;
        let pattern = catalog::find(&patterns, &id)
            .ok_or_else(|| PomasaError::PatternNotFound(id.clone()))?;
        let content = catalog::load_pattern_document(pattern)?;
        Ok::<_, PomasaError>(serde_json::json!({
            "pattern": pattern,
            "content": content,
        }))
    })
    .await
    .map_err(join_error)?
    .map_err(|e| AppError::internal("Failed to load pattern", e))?;

    Ok(Json(result))
}

/// GET /api/framework/template
///
/// Raw `user_input_template.md`.
pub async fn get_template(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let path = paths::template_path(&app.data_dir);
    let content = tokio::task::spawn_blocking(move || std::fs::read_to_string(path))
        .await
        .map_err(join_error)?
        .map_err(|e| AppError::internal("Failed to load template", e))?;

    Ok(Json(serde_json::json!({ "content": content })))
}

/// GET /api/framework/generator
///
/// Raw `generator.md`.
pub async fn get_generator(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let path = paths::generator_path(&app.data_dir);
    let content = tokio::task::spawn_blocking(move || std::fs::read_to_string(path))
        .await
        .map_err(join_error)?
        .map_err(|e| AppError::internal("Failed to load generator", e))?;

    Ok(Json(serde_json::json!({ "content": content })))
}
