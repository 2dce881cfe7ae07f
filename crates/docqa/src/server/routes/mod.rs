//! API routes, mounted under `/api/v1`

pub mod query;
pub mod sessions;
pub mod tts;
pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};

use crate::server::state::AppState;

/// Room for multipart boundaries and part headers on top of the file itself
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Build all API routes
pub fn api_routes(max_file_size: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/upload",
            post(upload::upload_document)
                .layer(DefaultBodyLimit::max(max_file_size + MULTIPART_OVERHEAD)),
        )
        .route("/query", post(query::query_document))
        .route("/tts", post(tts::text_to_speech))
        .route("/status/:session_id", get(sessions::session_status))
        .route("/session/:session_id", delete(sessions::delete_session))
}
