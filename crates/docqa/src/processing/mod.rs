//! Upload processing pipeline

mod pipeline;

pub use pipeline::{compose_text, DocumentPipeline, ProcessedDocument};
