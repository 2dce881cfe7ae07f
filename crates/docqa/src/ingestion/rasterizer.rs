//! PDF page rasterisation via pdftoppm (poppler-utils)

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{Error, Result};

/// Prefix pdftoppm writes pages under before they are renamed
const RAW_PREFIX: &str = "pdftoppm-page";

/// Renders every page of a PDF to `page_<n>.png`
#[derive(Debug, Clone)]
pub struct PdfRasterizer {
    command: String,
    dpi: u32,
}

impl PdfRasterizer {
    pub fn new(command: impl Into<String>, dpi: u32) -> Self {
        Self {
            command: command.into(),
            dpi,
        }
    }

    /// Rasterise `pdf` into `out_dir`, returning page images in page order
    pub fn rasterize(&self, pdf: &Path, out_dir: &Path) -> Result<Vec<PathBuf>> {
        let output = Command::new(&self.command)
            .arg("-png")
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg(pdf)
            .arg(out_dir.join(RAW_PREFIX))
            .output()
            .map_err(|e| Error::Internal(format!("{} could not be run: {}", self.command, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Internal(format!(
                "{} exited with {}: {}",
                self.command,
                output.status,
                stderr.trim()
            )));
        }

        // pdftoppm zero-pads page numbers to the width of the page count
        let mut pages: Vec<(u32, PathBuf)> = std::fs::read_dir(out_dir)?
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let path = entry.path();
                let number = raw_page_number(&path)?;
                Some((number, path))
            })
            .collect();
        pages.sort_by_key(|(number, _)| *number);

        let mut images = Vec::with_capacity(pages.len());
        for (number, raw) in pages {
            let target = out_dir.join(format!("page_{}.png", number));
            std::fs::rename(&raw, &target)?;
            images.push(target);
        }

        tracing::debug!("Rasterised {} pages of {}", images.len(), pdf.display());
        Ok(images)
    }
}

fn raw_page_number(path: &Path) -> Option<u32> {
    if path.extension()?.to_str()? != "png" {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    stem.strip_prefix(RAW_PREFIX)?
        .strip_prefix('-')?
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_page_number() {
        assert_eq!(raw_page_number(Path::new("/t/pdftoppm-page-1.png")), Some(1));
        assert_eq!(raw_page_number(Path::new("/t/pdftoppm-page-007.png")), Some(7));
        assert_eq!(raw_page_number(Path::new("/t/page_1.png")), None);
        assert_eq!(raw_page_number(Path::new("/t/pdftoppm-page-1.ppm")), None);
    }

    #[test]
    fn test_missing_binary_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let rasterizer = PdfRasterizer::new("docqa-missing-pdftoppm", 200);
        let err = rasterizer
            .rasterize(&dir.path().join("doc.pdf"), dir.path())
            .unwrap_err();
        assert!(matches!(err, Error::Internal(_)));
    }
}
