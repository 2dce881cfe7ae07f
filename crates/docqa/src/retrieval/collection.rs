//! Session-scoped in-memory vector collection
//!
//! Each upload gets a fresh collection; nothing is shared between sessions.
//! Search is exhaustive cosine similarity, which is plenty for one document.

use serde::Serialize;

use crate::error::{Error, Result};

/// One indexed chunk with its embedding
#[derive(Debug, Clone)]
struct Entry {
    text: String,
    embedding: Vec<f32>,
}

/// A retrieved chunk with its similarity to the query
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScoredChunk {
    /// Position of the chunk within its collection
    pub index: usize,
    /// Chunk text
    pub text: String,
    /// Cosine similarity, higher is closer
    pub score: f32,
}

/// Chunks and embeddings of one document
#[derive(Debug, Clone)]
pub struct Collection {
    name: String,
    model: String,
    dimensions: usize,
    entries: Vec<Entry>,
}

impl Collection {
    /// Create an empty collection for vectors produced by `model`
    pub fn new(name: impl Into<String>, model: impl Into<String>, dimensions: usize) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            dimensions,
            entries: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Embedding model the collection was built with
    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append a chunk, returning its index
    pub fn insert(&mut self, text: impl Into<String>, embedding: Vec<f32>) -> Result<usize> {
        if embedding.len() != self.dimensions {
            return Err(Error::embedding(format!(
                "Vector has {} dimensions, collection {} expects {}",
                embedding.len(),
                self.name,
                self.dimensions
            )));
        }

        self.entries.push(Entry {
            text: text.into(),
            embedding,
        });
        Ok(self.entries.len() - 1)
    }

    /// The `k` chunks closest to `query`, best first; ties go to the earlier chunk
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<ScoredChunk>> {
        if query.len() != self.dimensions {
            return Err(Error::embedding(format!(
                "Query vector has {} dimensions, collection {} expects {}",
                query.len(),
                self.name,
                self.dimensions
            )));
        }

        let mut scored: Vec<ScoredChunk> = self
            .entries
            .iter()
            .enumerate()
            .map(|(index, entry)| ScoredChunk {
                index,
                text: entry.text.clone(),
                score: cosine_similarity(query, &entry.embedding),
            })
            .collect();

        scored.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.index.cmp(&b.index)));
        scored.truncate(k);
        Ok(scored)
    }
}

/// Cosine similarity; zero vectors score 0
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collection() -> Collection {
        let mut c = Collection::new("session-test", "all-minilm", 3);
        c.insert("revenue", vec![1.0, 0.0, 0.0]).unwrap();
        c.insert("costs", vec![0.0, 1.0, 0.0]).unwrap();
        c.insert("revenue again", vec![2.0, 0.0, 0.0]).unwrap();
        c.insert("mixed", vec![1.0, 1.0, 0.0]).unwrap();
        c
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_search_orders_by_score_then_index() {
        let results = collection().search(&[1.0, 0.0, 0.0], 3).unwrap();
        let indices: Vec<usize> = results.iter().map(|r| r.index).collect();
        // chunks 0 and 2 are both exact matches
        assert_eq!(indices, vec![0, 2, 3]);
        assert_eq!(results[0].text, "revenue");
    }

    #[test]
    fn test_search_never_exceeds_len() {
        let c = collection();
        assert_eq!(c.search(&[0.0, 1.0, 0.0], 50).unwrap().len(), c.len());
        assert!(Collection::new("empty", "m", 3)
            .search(&[1.0, 0.0, 0.0], 5)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_dimension_mismatch() {
        let mut c = collection();
        assert!(matches!(c.insert("bad", vec![1.0]), Err(Error::Embedding(_))));
        assert!(matches!(c.search(&[1.0, 0.0], 1), Err(Error::Embedding(_))));
    }
}
