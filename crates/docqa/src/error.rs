//! Error types for the document Q&A service

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for docqa operations
pub type Result<T> = std::result::Result<T, Error>;

/// Service errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error (bad API key, invalid chunking, missing dependency)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Request validation error (file type/size, missing fields)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Unsupported document format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Unknown session
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// Session exists but its collection has not been built yet
    #[error("Session not ready: {0}")]
    SessionNotReady(String),

    /// Collection has no chunks to search
    #[error("Document index is empty: no text could be indexed")]
    EmptyIndex,

    /// Embedding error
    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    /// Query embedded with a different model than the collection
    #[error("Embedding model mismatch: collection built with '{collection}', query uses '{query}'")]
    EmbeddingModelMismatch { collection: String, query: String },

    /// Hosted chat/vision model error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Speech synthesis produced no audio
    #[error("Speech synthesis failed: {0}")]
    SynthesisFailed(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an embedding error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }

    /// Create an LLM error
    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) | Error::UnsupportedFormat(_) | Error::Json(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::SessionNotFound(_) => StatusCode::NOT_FOUND,
            Error::SessionNotReady(_) => StatusCode::CONFLICT,
            Error::EmptyIndex => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Config(_)
            | Error::Embedding(_)
            | Error::EmbeddingModelMismatch { .. }
            | Error::Llm(_)
            | Error::SynthesisFailed(_)
            | Error::Io(_)
            | Error::Http(_)
            | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &'static str {
        match self {
            Error::Config(_) => "config_error",
            Error::Validation(_) => "validation_error",
            Error::UnsupportedFormat(_) => "unsupported_format",
            Error::SessionNotFound(_) => "not_found",
            Error::SessionNotReady(_) => "session_not_ready",
            Error::EmptyIndex => "empty_index",
            Error::Embedding(_) => "embedding_error",
            Error::EmbeddingModelMismatch { .. } => "embedding_model_mismatch",
            Error::Llm(_) => "llm_error",
            Error::SynthesisFailed(_) => "synthesis_failed",
            Error::Io(_) => "io_error",
            Error::Json(_) => "json_error",
            Error::Http(_) => "http_error",
            Error::Internal(_) => "internal_error",
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }

        let body = Json(json!({
            "error": {
                "type": self.error_type(),
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(Error::validation("too big").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            Error::UnsupportedFormat(".exe".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::SessionNotFound("abc".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::SessionNotReady("abc".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(Error::EmptyIndex.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            Error::llm("quota exceeded").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
