//! Document ingestion: format-specific extraction and text chunking

mod chunker;
mod extractor;
mod office;
mod rasterizer;

pub use chunker::TextChunker;
pub use extractor::{DocumentExtractor, ExtractedDocument};
pub use rasterizer::PdfRasterizer;
