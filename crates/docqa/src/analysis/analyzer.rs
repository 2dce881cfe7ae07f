//! Per-image OCR and description

use futures_util::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::ocr::OcrEngine;
use super::vision::VisionDescriber;

/// Images analysed at the same time during one upload
const CONCURRENT_IMAGES: usize = 4;

/// What was learned about one image; empty strings mean nothing usable
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageAnalysis {
    pub ocr_text: String,
    pub description: String,
}

/// Runs OCR and vision description for each image
///
/// Either side may be disabled; failures are logged and contribute nothing.
pub struct ImageAnalyzer {
    ocr: Option<Arc<dyn OcrEngine>>,
    vision: Option<VisionDescriber>,
}

impl ImageAnalyzer {
    pub fn new(ocr: Option<Arc<dyn OcrEngine>>, vision: Option<VisionDescriber>) -> Self {
        Self { ocr, vision }
    }

    /// OCR and describe one image concurrently
    pub async fn analyze(&self, image: &Path) -> ImageAnalysis {
        let ocr = async {
            let Some(engine) = &self.ocr else {
                return String::new();
            };
            match engine.recognize(image).await {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!("OCR ({}) failed for {}: {}", engine.name(), image.display(), e);
                    String::new()
                }
            }
        };

        let description = async {
            let Some(vision) = &self.vision else {
                return String::new();
            };
            match vision.describe(image).await {
                Ok(description) => description,
                Err(e) => {
                    tracing::warn!("Vision description failed for {}: {}", image.display(), e);
                    String::new()
                }
            }
        };

        let (ocr_text, description) = tokio::join!(ocr, description);
        ImageAnalysis {
            ocr_text,
            description,
        }
    }

    /// Analyse images a few at a time, keeping input order
    pub async fn analyze_all(&self, images: &[PathBuf]) -> Vec<ImageAnalysis> {
        stream::iter(images.iter().cloned())
            .map(|image| async move { self.analyze(&image).await })
            .buffered(CONCURRENT_IMAGES)
            .collect()
            .await
    }
}
