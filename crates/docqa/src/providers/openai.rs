//! OpenAI-compatible chat completions client (Groq by default)

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

use crate::config::LlmConfig;
use crate::error::{Error, Result};

use super::llm::{ChatMessage, ChatProvider, ChatRequest, ContentPart};

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct WireMessage {
    role: &'static str,
    content: Value,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Client for `/chat/completions` on an OpenAI-compatible API
pub struct OpenAiChatClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl OpenAiChatClient {
    /// Create a new chat client
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create chat HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key: config.api_key.clone(),
        })
    }

    /// Text-only messages go out as plain strings, mixed ones as content arrays
    fn to_wire(message: &ChatMessage) -> WireMessage {
        let content = match message.content.as_slice() {
            [ContentPart::Text(text)] => Value::String(text.clone()),
            parts => Value::Array(
                parts
                    .iter()
                    .map(|part| match part {
                        ContentPart::Text(text) => json!({"type": "text", "text": text}),
                        ContentPart::ImageUrl(url) => {
                            json!({"type": "image_url", "image_url": {"url": url}})
                        }
                    })
                    .collect(),
            ),
        };

        WireMessage {
            role: message.role.as_str(),
            content,
        }
    }
}

#[async_trait]
impl ChatProvider for OpenAiChatClient {
    async fn complete(&self, request: ChatRequest) -> Result<String> {
        let body = CompletionRequest {
            model: &request.model,
            messages: request.messages.iter().map(Self::to_wire).collect(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        tracing::debug!("Chat completion with model: {}", request.model);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::llm(format!("Completion request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::llm(format!(
                "Completion failed: HTTP {} - {}",
                status, body
            )));
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::llm(format!("Failed to parse completion response: {}", e)))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| Error::llm("No text in completion response"))
    }

    fn name(&self) -> &str {
        "openai-compatible"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_message_is_plain_string() {
        let wire = OpenAiChatClient::to_wire(&ChatMessage::system("be brief"));
        assert_eq!(wire.role, "system");
        assert_eq!(wire.content, json!("be brief"));
    }

    #[test]
    fn test_image_message_is_content_array() {
        let wire = OpenAiChatClient::to_wire(&ChatMessage::user_with_image(
            "Describe this image.",
            "data:image/png;base64,AAAA",
        ));
        assert_eq!(
            wire.content,
            json!([
                {"type": "text", "text": "Describe this image."},
                {"type": "image_url", "image_url": {"url": "data:image/png;base64,AAAA"}}
            ])
        );
    }
}
