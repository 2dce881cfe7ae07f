//! Response types for the HTTP API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Document upload response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub session_id: String,
    pub filename: String,
    pub status: String,
    /// Length of the combined indexed text, in characters
    pub text_length: usize,
    pub num_chunks: usize,
    pub num_images_processed: usize,
    pub message: String,
    /// Non-fatal extraction problems (unreadable page, missing rasteriser, ...)
    #[serde(default)]
    pub warnings: Vec<String>,
}

/// Query response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    pub answer: String,
    pub session_id: String,
    pub question: String,
    /// Number of chunks used as context
    pub chunks_retrieved: usize,
}

/// Session status response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub session_id: String,
    pub filename: String,
    pub text_length: usize,
    pub num_images: usize,
    pub num_chunks: usize,
    /// "processing" while the document is being indexed, "active" once queryable
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Session deletion response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub status: String,
    pub session_id: String,
}

/// Liveness/version info
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub status: String,
    pub service: String,
    pub version: String,
    /// Sessions currently held in memory
    pub sessions: usize,
}
