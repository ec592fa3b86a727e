pub mod creation;
pub mod embed;
pub mod error;
pub mod routes;
pub mod state;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use pomasa_core::config::Config;
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Creation requests embed the whole questionnaire, which can be long.
pub const CREATE_BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Build the axum Router with all API routes and middleware.
/// Used by `serve_on()` and available for integration testing.
pub fn build_router(data_dir: PathBuf, config: Config) -> Router {
    let app_state = state::AppState::new(data_dir, config);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Native dialogs
        .route(
            "/api/dialog/select-folder",
            post(routes::dialog::select_folder),
        )
        .route(
            "/api/dialog/select-files",
            post(routes::dialog::select_files),
        )
        // MAS browsing and creation
        .route("/api/mas/info", get(routes::mas::get_info))
        .route("/api/mas/file", get(routes::mas::get_file))
        .route(
            "/api/mas/create",
            post(routes::mas::create_mas).layer(DefaultBodyLimit::max(CREATE_BODY_LIMIT)),
        )
        // Framework documents
        .route(
            "/api/framework/patterns",
            get(routes::framework::list_patterns),
        )
        .route(
            "/api/framework/patterns/{id}",
            get(routes::framework::get_pattern),
        )
        .route(
            "/api/framework/template",
            get(routes::framework::get_template),
        )
        .route(
            "/api/framework/generator",
            get(routes::framework::get_generator),
        )
        .fallback(embed::static_handler)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Start the POMASA web UI on a pre-bound listener.
///
/// Taking a bound `TcpListener` lets the caller read the actual port first
/// (useful when `port = 0` and the OS picks a free one).
pub async fn serve_on(
    data_dir: PathBuf,
    config: Config,
    listener: tokio::net::TcpListener,
    open_browser: bool,
) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let app = build_router(data_dir.clone(), config);

    tracing::info!(
        data_dir = %data_dir.display(),
        "POMASA UI listening on http://localhost:{actual_port}"
    );

    if open_browser {
        let url = format!("http://localhost:{actual_port}");
        if let Err(e) = open::that(&url) {
            tracing::warn!(error = %e, "could not open a browser; visit {url}");
        }
    }

    axum::serve(listener, app).await?;
    Ok(())
}
