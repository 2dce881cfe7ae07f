//! Chat provider trait for text and vision completions

use async_trait::async_trait;
use crate::error::Result;

/// Role of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    System,
    User,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
        }
    }
}

/// One piece of message content
#[derive(Debug, Clone, PartialEq)]
pub enum ContentPart {
    /// Plain text
    Text(String),
    /// Image by URL; inline images use a `data:<mime>;base64,...` URL
    ImageUrl(String),
}

/// A chat message
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: Vec<ContentPart>,
}

impl ChatMessage {
    /// System message with plain text
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: vec![ContentPart::Text(text.into())],
        }
    }

    /// User message with plain text
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: vec![ContentPart::Text(text.into())],
        }
    }

    /// User message with a text prompt followed by an image
    pub fn user_with_image(text: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: vec![
                ContentPart::Text(text.into()),
                ContentPart::ImageUrl(image_url.into()),
            ],
        }
    }

    /// Concatenated text parts
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|part| match part {
                ContentPart::Text(text) => Some(text.as_str()),
                ContentPart::ImageUrl(_) => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A single completion request
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Trait for hosted chat completion
///
/// Implementations:
/// - `OpenAiChatClient`: any OpenAI-compatible `/chat/completions` endpoint (Groq by default)
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Submit one completion request and return the generated text
    async fn complete(&self, request: ChatRequest) -> Result<String>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
