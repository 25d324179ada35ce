//! Route definitions

use std::{any::Any, path::Path};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    handler::HandlerWithoutStateExt,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::{catch_panic::CatchPanicLayer, services::ServeDir, trace::TraceLayer};
use tracing::error;

use crate::{error::ApiError, handlers, middleware::RequestIdLayer, state::AppState};

/// Room for multipart framing on top of the upload limit
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Fallback for unknown routes
pub async fn not_found() -> ApiError {
    ApiError::NotFound("Endpoint not found".to_string())
}

/// Fallback for known routes called with the wrong method
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Convert a handler panic into a generic 500
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(panic = %detail, "Handler panicked");

    ApiError::Internal(detail.to_string()).into_response()
}

/// Create the main router with all routes
///
/// `assets_dir` is served under `/assets`.
pub fn create_router(state: AppState, assets_dir: impl AsRef<Path>) -> Router {
    let upload_limit = state.max_upload_bytes.saturating_add(MULTIPART_OVERHEAD);
    let assets = ServeDir::new(assets_dir.as_ref()).not_found_service(not_found.into_service());

    Router::new()
        // Client UI
        .route("/", get(handlers::pages::index))
        .nest_service("/assets", assets)
        // Diagnostics
        .route("/health", get(handlers::health::health_check))
        .route("/test", post(handlers::pages::echo))
        // Chat API
        .route("/chat", post(handlers::chat::chat))
        // Audio
        .route(
            "/upload-audio",
            post(handlers::audio::upload_audio).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/audios/{filename}", get(handlers::audio::serve_audio))
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        // Attach state
        .with_state(state)
        // Outermost last: request id wraps tracing, tracing wraps panic recovery
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(RequestIdLayer::new())
}
