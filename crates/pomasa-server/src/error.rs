use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pomasa_core::PomasaError;

// ---------------------------------------------------------------------------
// Internal sentinels
// ---------------------------------------------------------------------------

/// Carries an explicit HTTP 400 through the `anyhow::Error` chain.
#[derive(Debug)]
struct BadRequestError(String);

impl std::fmt::Display for BadRequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for BadRequestError {}

/// Carries an explicit HTTP 404 through the `anyhow::Error` chain.
#[derive(Debug)]
struct NotFoundError(String);

impl std::fmt::Display for NotFoundError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for NotFoundError {}

/// Message shown to the client in place of the underlying error on a 500.
#[derive(Debug)]
struct PublicMessage(&'static str);

impl std::fmt::Display for PublicMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

const GENERIC_MESSAGE: &str = "Internal server error";

// ---------------------------------------------------------------------------
// AppError: unified error type for HTTP responses
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses.
///
/// Client errors carry their own message. Server errors never leak OS
/// detail: the body holds the public message attached with
/// [`AppError::internal`], and the full chain goes to the log.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    /// Construct a 400 Bad Request error with the given message.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(BadRequestError(msg.into()).into())
    }

    /// Construct a 404 Not Found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self(NotFoundError(msg.into()).into())
    }

    /// Wrap `err`, replying with `public` if it turns out to be a 500.
    pub fn internal(public: &'static str, err: impl Into<anyhow::Error>) -> Self {
        Self(err.into().context(PublicMessage(public)))
    }

    fn status_and_message(&self) -> (StatusCode, Option<String>) {
        if let Some(b) = self.0.downcast_ref::<BadRequestError>() {
            return (StatusCode::BAD_REQUEST, Some(b.0.clone()));
        }
        if let Some(n) = self.0.downcast_ref::<NotFoundError>() {
            return (StatusCode::NOT_FOUND, Some(n.0.clone()));
        }
        match self.0.downcast_ref::<PomasaError>() {
            Some(
                e @ (PomasaError::MissingField(_)
                | PomasaError::InvalidName(_)
                | PomasaError::NotADirectory(_)),
            ) => (StatusCode::BAD_REQUEST, Some(e.to_string())),
            Some(e @ PomasaError::PatternNotFound(_)) => {
                (StatusCode::NOT_FOUND, Some(e.to_string()))
            }
            Some(e @ PomasaError::AlreadyExists(_)) => (StatusCode::CONFLICT, Some(e.to_string())),
            Some(
                PomasaError::Unreadable(_)
                | PomasaError::CatalogUnavailable(_)
                | PomasaError::InstructionsUnavailable(_)
                | PomasaError::Io(_)
                | PomasaError::Yaml(_)
                | PomasaError::Json(_),
            )
            | None => (StatusCode::INTERNAL_SERVER_ERROR, None),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        let message = message.unwrap_or_else(|| {
            tracing::error!("request failed: {:#}", self.0);
            self.0
                .downcast_ref::<PublicMessage>()
                .map(|m| m.0)
                .unwrap_or(GENERIC_MESSAGE)
                .to_string()
        });

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// Map a failed `spawn_blocking` join into a 500.
pub(crate) fn join_error(e: tokio::task::JoinError) -> AppError {
    AppError(anyhow::anyhow!("task join error: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn missing_field_maps_to_400() {
        let err = AppError(PomasaError::MissingField("targetDir").into());
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn invalid_name_maps_to_400() {
        let err = AppError(PomasaError::InvalidName("../x".into()).into());
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn already_exists_maps_to_409() {
        let err = AppError(PomasaError::AlreadyExists("/tmp/x".into()).into());
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn pattern_not_found_maps_to_404() {
        let err = AppError(PomasaError::PatternNotFound("COR-99".into()).into());
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn classification_survives_public_context() {
        let err = AppError::internal(
            "Failed to create MAS",
            PomasaError::AlreadyExists("/x".into()),
        );
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn internal_error_hides_os_detail() {
        let io = std::io::Error::other("/secret/path: permission denied");
        let err = AppError::internal("Failed to read file", PomasaError::Io(io));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Failed to read file");
    }

    #[tokio::test]
    async fn bare_internal_error_uses_generic_message() {
        let response = AppError(anyhow::anyhow!("something unexpected")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"], GENERIC_MESSAGE);
    }

    #[tokio::test]
    async fn bad_request_constructor_keeps_message() {
        let response = AppError::bad_request("Missing path parameter").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "Missing path parameter");
    }

    #[test]
    fn not_found_constructor_maps_to_404() {
        let err = AppError::not_found("no such pattern");
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }
}
