//! Shared fakes and request helpers for integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use axum::{body::Body, http::Request, response::Response};
use bytes::Bytes;
use futures_util::{stream, StreamExt};
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;

use docqa::analysis::OcrEngine;
use docqa::providers::{AudioStream, ChatProvider, ChatRequest, EmbeddingProvider, SpeechEngine};
use docqa::server::state::Collaborators;
use docqa::session::{InMemorySessionStore, SessionStore};
use docqa::{AppState, Error, RagConfig, Result};

pub const BOUNDARY: &str = "docqa-test-boundary";
const DIMENSIONS: usize = 64;

/// Same bucketing as the crate's unit-test embedder: alphanumeric lowercase
/// words, FNV-1a, one bucket per word
pub fn keyword_vector(text: &str) -> Vec<f32> {
    let mut vector = vec![0.0; DIMENSIONS];
    for word in text.split_whitespace() {
        let word: String = word
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(|c| c.to_lowercase())
            .collect();
        if word.is_empty() {
            continue;
        }
        let mut hash: u64 = 0xcbf29ce484222325;
        for byte in word.bytes() {
            hash ^= byte as u64;
            hash = hash.wrapping_mul(0x100000001b3);
        }
        vector[(hash % DIMENSIONS as u64) as usize] += 1.0;
    }
    vector
}

/// Bag-of-words embedder over hashed buckets
pub struct KeywordEmbedder {
    pub fail: bool,
}

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if self.fail {
            return Err(Error::embedding("connection refused"));
        }
        Ok(keyword_vector(text))
    }

    fn dimensions(&self) -> usize {
        DIMENSIONS
    }

    fn model(&self) -> &str {
        "keyword-test"
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(!self.fail)
    }

    fn name(&self) -> &str {
        "keyword"
    }
}

/// Chat provider that answers every request with the same text
pub struct CannedChat {
    pub reply: String,
    pub requests: Mutex<Vec<ChatRequest>>,
}

impl CannedChat {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ChatProvider for CannedChat {
    async fn complete(&self, request: ChatRequest) -> Result<String> {
        self.requests.lock().push(request);
        Ok(self.reply.clone())
    }

    fn name(&self) -> &str {
        "canned"
    }
}

/// Speech engine that streams fixed MP3-looking chunks
pub struct CannedSpeech;

#[async_trait]
impl SpeechEngine for CannedSpeech {
    async fn stream(&self, _text: &str, _voice: &str) -> Result<AudioStream> {
        let chunks: Vec<Result<Bytes>> = vec![
            Ok(Bytes::from_static(b"ID3")),
            Ok(Bytes::from_static(b"\xff\xfbframe")),
        ];
        Ok(stream::iter(chunks).boxed())
    }

    fn name(&self) -> &str {
        "canned-speech"
    }
}

/// OCR engine that "reads" a fixed string from every image
pub struct CannedOcr(pub &'static str);

#[async_trait]
impl OcrEngine for CannedOcr {
    async fn recognize(&self, _image: &Path) -> Result<String> {
        Ok(self.0.to_string())
    }

    fn name(&self) -> &str {
        "canned-ocr"
    }
}

/// Test harness: state plus handles on the fakes
pub struct TestApp {
    pub state: AppState,
    pub sessions: Arc<dyn SessionStore>,
    pub chat: Arc<CannedChat>,
    pub temp_root: tempfile::TempDir,
}

pub fn test_config(temp_root: &Path) -> RagConfig {
    let mut config = RagConfig::default();
    config.llm.api_key = "gsk_test".to_string();
    config.storage.temp_root = temp_root.to_path_buf();
    config.chunking.chunk_size = 200;
    config.chunking.chunk_overlap = 40;
    config
}

pub fn test_app() -> TestApp {
    test_app_with(|_| {}, false)
}

pub fn test_app_with(adjust: impl FnOnce(&mut RagConfig), failing_embedder: bool) -> TestApp {
    let temp_root = tempfile::tempdir().unwrap();
    let mut config = test_config(temp_root.path());
    adjust(&mut config);

    let sessions: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new(temp_root.path()));
    let chat = Arc::new(CannedChat::new("The answer is in the document."));

    let state = AppState::from_parts(
        config,
        Collaborators {
            sessions: Arc::clone(&sessions),
            embedder: Arc::new(KeywordEmbedder {
                fail: failing_embedder,
            }),
            chat: chat.clone(),
            speech: Arc::new(CannedSpeech),
            ocr: Some(Arc::new(CannedOcr("SCANNED TOTAL 42"))),
        },
    )
    .unwrap();

    TestApp {
        state,
        sessions,
        chat,
        temp_root,
    }
}

pub fn multipart_upload(filename: &str, content: &[u8]) -> Request<Body> {
    let mut body = format!(
        "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
        BOUNDARY, filename
    )
    .into_bytes();
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/v1/upload")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_bytes(response: Response) -> Bytes {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
