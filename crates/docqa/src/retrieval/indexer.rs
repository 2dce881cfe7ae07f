//! Chunking and embedding a document into a fresh collection

use std::sync::Arc;

use crate::config::ChunkingConfig;
use crate::error::{Error, Result};
use crate::ingestion::TextChunker;
use crate::providers::EmbeddingProvider;

use super::collection::Collection;

/// Builds one collection per document
pub struct Indexer {
    chunker: TextChunker,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl Indexer {
    /// Create an indexer; fails if the overlap is not smaller than the chunk size
    pub fn new(config: &ChunkingConfig, embedder: Arc<dyn EmbeddingProvider>) -> Result<Self> {
        Ok(Self {
            chunker: TextChunker::new(config.chunk_size, config.chunk_overlap)?,
            embedder,
        })
    }

    /// Split `text`, embed every chunk and store the pairs in a new collection.
    /// Blank text gives an empty collection.
    pub async fn create_vector_store(&self, name: &str, text: &str) -> Result<Collection> {
        let mut collection = Collection::new(name, self.embedder.model(), self.embedder.dimensions());

        let chunks = self.chunker.split(text);
        if chunks.is_empty() {
            tracing::warn!("No text to index for {}", name);
            return Ok(collection);
        }

        tracing::debug!(
            "Embedding {} chunks for {} with {}",
            chunks.len(),
            name,
            self.embedder.name()
        );

        let embeddings = self.embedder.embed_batch(&chunks).await?;
        if embeddings.len() != chunks.len() {
            return Err(Error::embedding(format!(
                "Got {} embeddings for {} chunks",
                embeddings.len(),
                chunks.len()
            )));
        }

        for (chunk, embedding) in chunks.into_iter().zip(embeddings) {
            collection.insert(chunk, embedding)?;
        }

        tracing::info!("Indexed {} chunks into {}", collection.len(), name);
        Ok(collection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::KeywordEmbedder;

    fn indexer(chunk_size: usize, chunk_overlap: usize) -> Indexer {
        Indexer::new(
            &ChunkingConfig {
                chunk_size,
                chunk_overlap,
            },
            Arc::new(KeywordEmbedder::new()),
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_overlap_not_smaller_than_size() {
        let result = Indexer::new(
            &ChunkingConfig {
                chunk_size: 100,
                chunk_overlap: 150,
            },
            Arc::new(KeywordEmbedder::new()),
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_same_text_same_chunk_count() {
        let indexer = indexer(80, 20);
        let text = "Revenue grew in the north region. ".repeat(20);

        let first = indexer.create_vector_store("session-a", &text).await.unwrap();
        let second = indexer.create_vector_store("session-b", &text).await.unwrap();

        assert!(first.len() > 1);
        assert_eq!(first.len(), second.len());
        assert_eq!(first.model(), "keyword-test");
    }

    #[tokio::test]
    async fn test_blank_text_gives_empty_collection() {
        let collection = indexer(100, 10)
            .create_vector_store("session-empty", "  \n\n  ")
            .await
            .unwrap();
        assert!(collection.is_empty());
        assert_eq!(collection.name(), "session-empty");
    }
}
