use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use rust_embed::Embed;

use crate::error::AppError;

#[derive(Embed)]
#[folder = "../../frontend/dist/"]
struct FrontendAssets;

fn asset(path: &str) -> Option<Response> {
    let content = <FrontendAssets as Embed>::get(path)?;
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    Some(
        (
            StatusCode::OK,
            [(header::CONTENT_TYPE, mime.as_ref())],
            content.data.into_owned(),
        )
            .into_response(),
    )
}

/// Serve the embedded UI. Unknown `/api/` paths get a JSON 404; every other
/// unknown path gets `index.html`.
pub async fn static_handler(uri: Uri) -> Response {
    if uri.path().starts_with("/api/") {
        return AppError::not_found(format!("No API route for {}", uri.path())).into_response();
    }

    let path = uri.path().trim_start_matches('/');
    if !path.is_empty() {
        if let Some(response) = asset(path) {
            return response;
        }
    }

    asset("index.html")
        .unwrap_or_else(|| (StatusCode::NOT_FOUND, "frontend not embedded").into_response())
}
