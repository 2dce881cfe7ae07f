//! Indexing and retrieval over per-session collections

mod collection;
mod indexer;
mod query_engine;

pub use collection::{cosine_similarity, Collection, ScoredChunk};
pub use indexer::Indexer;
pub use query_engine::{QueryEngine, QueryOutcome};
