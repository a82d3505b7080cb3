//! Route definitions
//!
//! Chat routes and the lobby socket are mounted under /api; stored uploads
//! are served from /upload.

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use campus_common::StorageConfig;
use campus_gateway::lobby_routes;
use tower_http::services::ServeDir;

use crate::handlers::{chat, health};
use crate::state::AppState;

/// Room left for multipart framing on top of the largest accepted upload
const MULTIPART_OVERHEAD_BYTES: u64 = 64 * 1024;

/// Create the main API router (excluding health for separate middleware handling)
pub fn create_router(storage: &StorageConfig) -> Router<AppState> {
    Router::new()
        .nest("/api", api_routes(storage))
        .nest_service("/upload", ServeDir::new(&storage.upload_dir))
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

fn api_routes(storage: &StorageConfig) -> Router<AppState> {
    Router::new()
        .merge(chat_routes(storage))
        .merge(lobby_routes())
}

/// Chat routes
fn chat_routes(storage: &StorageConfig) -> Router<AppState> {
    let body_limit = storage.max_image_bytes.max(storage.max_file_bytes) + MULTIPART_OVERHEAD_BYTES;
    let body_limit = usize::try_from(body_limit).unwrap_or(usize::MAX);

    let uploads = Router::new()
        .route("/chat/upload", post(chat::upload_image))
        .route("/chat/upload/file", post(chat::upload_file))
        .layer(DefaultBodyLimit::max(body_limit));

    Router::new()
        .route("/chat/history/:post_id", get(chat::get_history))
        .route("/chat/message/:message_id", delete(chat::delete_message))
        .merge(uploads)
}
