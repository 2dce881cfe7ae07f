//! Text-to-speech endpoint

use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::TtsRequest;

/// POST /api/v1/tts - Convert text to MP3 audio
pub async fn text_to_speech(
    State(state): State<AppState>,
    payload: std::result::Result<Json<TtsRequest>, JsonRejection>,
) -> Result<Response> {
    let Json(request) = payload?;
    request.validate()?;

    let result = state.speech().synthesize(&request.text, &request.language).await?;

    tracing::info!(
        "Synthesised {} bytes with {}{}",
        result.audio.len(),
        result.voice,
        if result.truncated { " (input truncated)" } else { "" }
    );

    Ok((
        [
            (header::CONTENT_TYPE, "audio/mpeg"),
            (header::CONTENT_DISPOSITION, "inline; filename=\"speech.mp3\""),
        ],
        result.audio,
    )
        .into_response())
}
