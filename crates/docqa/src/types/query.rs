//! Request types

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Query request against an uploaded document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    /// Session ID returned by the upload
    pub session_id: String,

    /// Question to ask
    pub question: String,

    /// Response language (en/ta)
    #[serde(default = "default_language")]
    pub language: String,

    /// Number of chunks to retrieve (default: 5)
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_top_k() -> usize {
    5
}

impl QueryRequest {
    /// Reject empty questions and a zero `top_k`
    pub fn validate(&self) -> Result<()> {
        if self.question.trim().is_empty() {
            return Err(Error::validation("question must not be empty"));
        }
        if self.top_k == 0 {
            return Err(Error::validation("top_k must be at least 1"));
        }
        Ok(())
    }
}

/// Text-to-speech request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtsRequest {
    /// Text to convert
    pub text: String,

    /// Voice language (en/ta)
    #[serde(default = "default_language")]
    pub language: String,
}

impl TtsRequest {
    /// Reject empty text
    pub fn validate(&self) -> Result<()> {
        if self.text.trim().is_empty() {
            return Err(Error::validation("text must not be empty"));
        }
        Ok(())
    }
}
