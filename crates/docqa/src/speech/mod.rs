//! Text-to-speech with language-based voice selection

use bytes::{Bytes, BytesMut};
use futures_util::StreamExt;
use std::sync::Arc;

use crate::config::TtsConfig;
use crate::error::{Error, Result};
use crate::providers::SpeechEngine;

/// Synthesised audio
#[derive(Debug, Clone)]
pub struct SynthesizedAudio {
    pub audio: Bytes,
    pub voice: String,
    /// Input was cut to the configured maximum length
    pub truncated: bool,
}

/// Turns text into MP3 audio through a streaming speech engine
pub struct SpeechSynthesizer {
    engine: Arc<dyn SpeechEngine>,
    config: TtsConfig,
}

impl SpeechSynthesizer {
    pub fn new(engine: Arc<dyn SpeechEngine>, config: TtsConfig) -> Self {
        Self { engine, config }
    }

    /// Voice for a language tag, falling back to the default language
    pub fn voice_for(&self, language: &str) -> Result<&str> {
        self.config
            .voices
            .get(&language.trim().to_lowercase())
            .or_else(|| self.config.voices.get(&self.config.default_language))
            .map(String::as_str)
            .ok_or_else(|| {
                Error::Config(format!(
                    "No voice configured for '{}' or default language '{}'",
                    language, self.config.default_language
                ))
            })
    }

    /// Synthesise `text`, buffering the streamed audio in memory
    pub async fn synthesize(&self, text: &str, language: &str) -> Result<SynthesizedAudio> {
        let (input, truncated) = truncate_chars(text, self.config.max_chars);
        if input.trim().is_empty() {
            return Err(Error::validation("text must not be empty"));
        }
        if truncated {
            tracing::debug!("TTS input truncated to {} characters", self.config.max_chars);
        }

        let voice = self.voice_for(language)?.to_string();
        let mut stream = self.engine.stream(input, &voice).await?;

        let mut audio = BytesMut::new();
        while let Some(chunk) = stream.next().await {
            match chunk {
                Ok(chunk) => audio.extend_from_slice(&chunk),
                Err(e) if audio.is_empty() => {
                    return Err(Error::SynthesisFailed(format!("audio stream failed: {}", e)))
                }
                Err(e) => {
                    tracing::warn!(
                        "Audio stream from {} broke after {} bytes: {}",
                        self.engine.name(),
                        audio.len(),
                        e
                    );
                    break;
                }
            }
        }

        if audio.is_empty() {
            return Err(Error::SynthesisFailed(format!(
                "{} returned no audio",
                self.engine.name()
            )));
        }

        Ok(SynthesizedAudio {
            audio: audio.freeze(),
            voice,
            truncated,
        })
    }
}

/// First `max_chars` characters of `text`, and whether anything was cut
fn truncate_chars(text: &str, max_chars: usize) -> (&str, bool) {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => (&text[..byte_index], true),
        None => (text, false),
    }
}
