//! Provider abstractions for embeddings, chat completion, and speech
//!
//! Handlers and services only see the traits; `AppState::new` picks the
//! concrete HTTP clients from configuration.

pub mod embedding;
pub mod llm;
pub mod ollama;
pub mod openai;
pub mod speech;

pub use embedding::EmbeddingProvider;
pub use llm::{ChatMessage, ChatProvider, ChatRequest, ChatRole, ContentPart};
pub use ollama::OllamaEmbedder;
pub use openai::OpenAiChatClient;
pub use speech::{AudioStream, OpenAiSpeechEngine, SpeechEngine};
