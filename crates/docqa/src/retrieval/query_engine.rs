//! Retrieval-augmented answering over a session's collection

use std::sync::Arc;

use crate::config::LlmConfig;
use crate::error::{Error, Result};
use crate::generation::PromptBuilder;
use crate::providers::{ChatProvider, ChatRequest, EmbeddingProvider};

use super::collection::{Collection, ScoredChunk};

/// Answer plus the chunks it was grounded on
#[derive(Debug, Clone)]
pub struct QueryOutcome {
    pub answer: String,
    pub retrieved: Vec<ScoredChunk>,
}

/// Embeds questions, retrieves context and asks the chat model
pub struct QueryEngine {
    embedder: Arc<dyn EmbeddingProvider>,
    llm: Arc<dyn ChatProvider>,
    config: LlmConfig,
}

impl QueryEngine {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, llm: Arc<dyn ChatProvider>, config: LlmConfig) -> Self {
        Self {
            embedder,
            llm,
            config,
        }
    }

    /// Answer `question` from the `k` closest chunks of `collection`
    pub async fn query(
        &self,
        collection: &Collection,
        question: &str,
        language: &str,
        k: usize,
    ) -> Result<QueryOutcome> {
        if question.trim().is_empty() {
            return Err(Error::validation("question must not be empty"));
        }
        if k == 0 {
            return Err(Error::validation("top_k must be at least 1"));
        }

        if collection.model() != self.embedder.model() {
            return Err(Error::EmbeddingModelMismatch {
                collection: collection.model().to_string(),
                query: self.embedder.model().to_string(),
            });
        }
        if collection.is_empty() {
            return Err(Error::EmptyIndex);
        }

        let query_embedding = self.embedder.embed(question).await?;
        let retrieved = collection.search(&query_embedding, k.min(collection.len()))?;

        tracing::debug!(
            "Retrieved {} chunks from {} (best score {:.3})",
            retrieved.len(),
            collection.name(),
            retrieved.first().map(|c| c.score).unwrap_or_default()
        );

        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: PromptBuilder::build_messages(question, &retrieved, language),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let answer = self.llm.complete(request).await?;

        Ok(QueryOutcome { answer, retrieved })
    }
}
