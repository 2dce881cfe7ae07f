//! Speech engine trait and the OpenAI-compatible `/audio/speech` engine

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::{BoxStream, StreamExt};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use crate::config::TtsConfig;
use crate::error::{Error, Result};

/// Stream of encoded audio chunks
pub type AudioStream = BoxStream<'static, Result<Bytes>>;

/// Trait for streaming speech synthesis
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    /// Start synthesis of `text` with `voice`, returning the audio as a chunk stream
    async fn stream(&self, text: &str, voice: &str) -> Result<AudioStream>;

    /// Get engine name for logging
    fn name(&self) -> &str;
}

#[derive(Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    response_format: &'a str,
}

/// Speech engine for OpenAI-compatible servers (e.g. an edge-tts bridge)
pub struct OpenAiSpeechEngine {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl OpenAiSpeechEngine {
    /// Create a new speech engine from config
    pub fn new(config: &TtsConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create TTS HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: format!("{}/audio/speech", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl SpeechEngine for OpenAiSpeechEngine {
    async fn stream(&self, text: &str, voice: &str) -> Result<AudioStream> {
        let request = SpeechRequest {
            model: &self.model,
            input: text,
            voice,
            response_format: "mp3",
        };

        let mut builder = self.client.post(&self.endpoint).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Error::SynthesisFailed(format!("TTS request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::SynthesisFailed(format!(
                "TTS engine returned HTTP {}: {}",
                status, body
            )));
        }

        Ok(response
            .bytes_stream()
            .map(|chunk| chunk.map_err(Error::from))
            .boxed())
    }

    fn name(&self) -> &str {
        "openai-speech"
    }
}
