//! Upload processing: extraction, image analysis, text composition, indexing

use std::path::Path;

use crate::analysis::{ImageAnalysis, ImageAnalyzer};
use crate::error::{Error, Result};
use crate::ingestion::DocumentExtractor;
use crate::retrieval::{Collection, Indexer};
use crate::types::FileType;

/// Everything built from one uploaded file
#[derive(Debug)]
pub struct ProcessedDocument {
    /// Extracted text plus OCR and vision sections
    pub combined_text: String,
    /// Length of `combined_text` in characters
    pub text_length: usize,
    pub image_count: usize,
    pub chunk_count: usize,
    pub collection: Collection,
    pub warnings: Vec<String>,
}

/// Runs one upload from file on disk to a queryable collection
pub struct DocumentPipeline {
    extractor: DocumentExtractor,
    analyzer: ImageAnalyzer,
    indexer: Indexer,
}

impl DocumentPipeline {
    pub fn new(extractor: DocumentExtractor, analyzer: ImageAnalyzer, indexer: Indexer) -> Self {
        Self {
            extractor,
            analyzer,
            indexer,
        }
    }

    /// Process the file at `path` into a collection named `collection_name`
    pub async fn process(
        &self,
        path: &Path,
        file_type: FileType,
        collection_name: &str,
    ) -> Result<ProcessedDocument> {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        tracing::info!("[{}] Extracting {} content...", filename, file_type.display_name());
        let extractor = self.extractor.clone();
        let owned_path = path.to_path_buf();
        let extracted = tokio::task::spawn_blocking(move || extractor.extract(&owned_path, file_type))
            .await
            .map_err(|e| Error::internal(format!("Extraction task failed: {}", e)))??;

        let image_count = extracted.images.len();
        let analyses = if image_count > 0 {
            tracing::info!("[{}] Analysing {} images...", filename, image_count);
            self.analyzer.analyze_all(&extracted.images).await
        } else {
            Vec::new()
        };

        let combined_text = compose_text(&extracted.text, &analyses);
        let text_length = combined_text.chars().count();

        tracing::info!("[{}] Indexing {} characters...", filename, text_length);
        let collection = self
            .indexer
            .create_vector_store(collection_name, &combined_text)
            .await?;
        let chunk_count = collection.len();

        tracing::info!(
            "[{}] Processed: {} chars, {} images, {} chunks, {} warnings",
            filename,
            text_length,
            image_count,
            chunk_count,
            extracted.warnings.len()
        );

        Ok(ProcessedDocument {
            combined_text,
            text_length,
            image_count,
            chunk_count,
            collection,
            warnings: extracted.warnings,
        })
    }
}

/// Append OCR text and vision descriptions to the extracted text.
/// Images are numbered from 1 in extraction order; empty results are left out.
pub fn compose_text(extracted: &str, analyses: &[ImageAnalysis]) -> String {
    let mut combined = extracted.to_string();

    let mut ocr_text = String::new();
    let mut descriptions = Vec::new();
    for (i, analysis) in analyses.iter().enumerate() {
        if !analysis.ocr_text.is_empty() {
            ocr_text.push_str(&format!("\n\n--- Image {} OCR ---\n{}", i + 1, analysis.ocr_text));
        }
        if !analysis.description.is_empty() {
            descriptions.push(format!("Image {}: {}", i + 1, analysis.description));
        }
    }

    if !ocr_text.is_empty() {
        combined.push_str("\n\n=== OCR TEXT ===\n");
        combined.push_str(&ocr_text);
    }
    if !descriptions.is_empty() {
        combined.push_str("\n\n=== VISION AI ===\n");
        combined.push_str(&descriptions.join("\n"));
    }

    combined
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ChunkingConfig, StorageConfig, VisionConfig};
    use crate::analysis::VisionDescriber;
    use crate::test_utils::{KeywordEmbedder, ScriptedChat};
    use std::sync::Arc;

    fn analysis(ocr: &str, description: &str) -> ImageAnalysis {
        ImageAnalysis {
            ocr_text: ocr.to_string(),
            description: description.to_string(),
        }
    }

    #[test]
    fn test_compose_text_layout() {
        let combined = compose_text(
            "Body text",
            &[analysis("Total 42", ""), analysis("", ""), analysis("INVOICE", "An invoice.")],
        );
        assert_eq!(
            combined,
            "Body text\n\n=== OCR TEXT ===\n\n\n--- Image 1 OCR ---\nTotal 42\n\n--- Image 3 OCR ---\nINVOICE\n\n=== VISION AI ===\nImage 3: An invoice."
        );
    }

    #[test]
    fn test_compose_text_without_images() {
        assert_eq!(compose_text("Only text", &[]), "Only text");
        assert_eq!(compose_text("Only text", &[analysis("", "")]), "Only text");
    }

    fn pipeline(chat: Arc<ScriptedChat>) -> DocumentPipeline {
        DocumentPipeline::new(
            DocumentExtractor::new(&StorageConfig::default()),
            ImageAnalyzer::new(None, Some(VisionDescriber::new(chat, VisionConfig::default()))),
            Indexer::new(
                &ChunkingConfig {
                    chunk_size: 100,
                    chunk_overlap: 20,
                },
                Arc::new(KeywordEmbedder::new()),
            )
            .unwrap(),
        )
    }

    #[tokio::test]
    async fn test_process_text_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "The warehouse is in Madurai. ".repeat(10)).unwrap();

        let chat = Arc::new(ScriptedChat::answering("unused"));
        let processed = pipeline(chat.clone())
            .process(&path, FileType::Txt, "session-t")
            .await
            .unwrap();

        assert_eq!(processed.image_count, 0);
        assert_eq!(processed.text_length, processed.combined_text.chars().count());
        assert!(processed.chunk_count > 1);
        assert_eq!(processed.collection.name(), "session-t");
        assert_eq!(chat.request_count(), 0);
    }

    #[tokio::test]
    async fn test_process_image_uses_vision_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("receipt.png");
        std::fs::write(&path, b"png").unwrap();

        let chat = Arc::new(ScriptedChat::answering("A receipt for 12 rupees."));
        let processed = pipeline(chat)
            .process(&path, FileType::Image, "session-i")
            .await
            .unwrap();

        assert_eq!(processed.image_count, 1);
        assert_eq!(
            processed.combined_text,
            "\n\n=== VISION AI ===\nImage 1: A receipt for 12 rupees."
        );
        assert_eq!(processed.chunk_count, 1);
    }
}
