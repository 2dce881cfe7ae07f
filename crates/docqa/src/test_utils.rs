//! Deterministic fakes for unit tests

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::{Error, Result};
use crate::providers::{ChatProvider, ChatRequest, EmbeddingProvider};

const KEYWORD_DIMENSIONS: usize = 64;

/// Bag-of-words embedder: each normalised word bumps one hashed bucket.
/// `tests/common` mirrors this scheme so unit and integration tests see the
/// same vectors.
pub struct KeywordEmbedder {
    model: String,
}

impl KeywordEmbedder {
    pub fn new() -> Self {
        Self {
            model: "keyword-test".to_string(),
        }
    }
}

impl Default for KeywordEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn keyword_vector(text: &str) -> Vec<f32> {
    let mut vector = vec![0.0; KEYWORD_DIMENSIONS];
    for word in text.split_whitespace() {
        let word: String = word
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(|c| c.to_lowercase())
            .collect();
        if word.is_empty() {
            continue;
        }
        // FNV-1a
        let mut hash: u64 = 0xcbf29ce484222325;
        for byte in word.bytes() {
            hash ^= byte as u64;
            hash = hash.wrapping_mul(0x100000001b3);
        }
        vector[(hash % KEYWORD_DIMENSIONS as u64) as usize] += 1.0;
    }
    vector
}

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(keyword_vector(text))
    }

    fn dimensions(&self) -> usize {
        KEYWORD_DIMENSIONS
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "keyword"
    }
}

/// Chat provider returning a fixed reply and recording every request
pub struct ScriptedChat {
    reply: Option<String>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedChat {
    pub fn answering(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn last_request(&self) -> Option<ChatRequest> {
        self.requests.lock().last().cloned()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl ChatProvider for ScriptedChat {
    async fn complete(&self, request: ChatRequest) -> Result<String> {
        self.requests.lock().push(request);
        self.reply
            .clone()
            .ok_or_else(|| Error::llm("HTTP 429 - rate limited"))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
