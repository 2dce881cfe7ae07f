//! Image analysis: local OCR and hosted vision descriptions

mod analyzer;
mod ocr;
mod vision;

pub use analyzer::{ImageAnalysis, ImageAnalyzer};
pub use ocr::{OcrEngine, TesseractOcr};
pub use vision::{data_url, VisionDescriber, VISION_PROMPT};
