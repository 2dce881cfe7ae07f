//! Session status and deletion endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::Result;
use crate::server::state::AppState;
use crate::session::SessionId;
use crate::types::{DeleteResponse, StatusResponse};

/// GET /api/v1/status/:session_id - Session details
pub async fn session_status(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<StatusResponse>> {
    let id = SessionId::parse(&session_id)?;
    let session = state.sessions().get(&id).await?;
    let ready = session.ready();

    Ok(Json(StatusResponse {
        session_id: id.to_string(),
        filename: session.filename().to_string(),
        text_length: ready.as_ref().map(|r| r.text_length).unwrap_or_default(),
        num_images: ready.as_ref().map(|r| r.image_count).unwrap_or_default(),
        num_chunks: ready.as_ref().map(|r| r.chunk_count).unwrap_or_default(),
        status: session.status().to_string(),
        created_at: session.created_at(),
    }))
}

/// DELETE /api/v1/session/:session_id - Drop a session and its files
pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let id = SessionId::parse(&session_id)?;
    state.sessions().delete(&id).await?;

    Ok(Json(DeleteResponse {
        status: "deleted".to_string(),
        session_id: id.to_string(),
    }))
}
