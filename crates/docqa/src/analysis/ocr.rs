//! Local OCR through the tesseract CLI

use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;

use crate::config::OcrConfig;
use crate::error::{Error, Result};

/// Trait for recognising text in an image file
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Text found in the image, trimmed
    async fn recognize(&self, image: &Path) -> Result<String>;

    /// Get engine name for logging
    fn name(&self) -> &str;
}

/// Runs `tesseract <image> stdout -l <lang>`
pub struct TesseractOcr {
    command: String,
    language: String,
}

impl TesseractOcr {
    pub fn new(config: &OcrConfig) -> Self {
        Self {
            command: config.command.clone(),
            language: config.language.clone(),
        }
    }
}

#[async_trait]
impl OcrEngine for TesseractOcr {
    async fn recognize(&self, image: &Path) -> Result<String> {
        let output = Command::new(&self.command)
            .arg(image)
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| Error::Internal(format!("{} could not be run: {}", self.command, e)))?;

        if !output.status.success() {
            return Err(Error::Internal(format!(
                "{} exited with {}: {}",
                self.command,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn name(&self) -> &str {
        "tesseract"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_binary_is_an_error() {
        let ocr = TesseractOcr::new(&OcrConfig {
            command: "docqa-missing-tesseract".to_string(),
            ..OcrConfig::default()
        });
        let err = ocr.recognize(Path::new("/nonexistent.png")).await.unwrap_err();
        assert!(matches!(err, Error::Internal(_)));
    }
}
