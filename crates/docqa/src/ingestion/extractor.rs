//! Multi-format document extraction
//!
//! Extraction is synchronous and runs on the blocking pool. Problems with a
//! single page, slide, sheet or embedded image are recorded as warnings and
//! extraction carries on; only an unreadable upload fails the whole call.

use calamine::Reader;
use std::path::{Path, PathBuf};

use crate::config::StorageConfig;
use crate::error::{Error, Result};
use crate::types::FileType;

use super::office;
use super::rasterizer::PdfRasterizer;

/// Text and images pulled out of one uploaded file
#[derive(Debug, Clone, Default)]
pub struct ExtractedDocument {
    /// Plain text, trimmed
    pub text: String,
    /// Embedded or rasterised images written next to the upload
    pub images: Vec<PathBuf>,
    /// Non-fatal problems met during extraction
    pub warnings: Vec<String>,
}

impl ExtractedDocument {
    pub(crate) fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{}", message);
        self.warnings.push(message);
    }
}

/// Extracts text and images from supported document formats
#[derive(Debug, Clone)]
pub struct DocumentExtractor {
    rasterizer: PdfRasterizer,
}

impl DocumentExtractor {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            rasterizer: PdfRasterizer::new(&config.rasterizer_command, config.pdf_dpi),
        }
    }

    /// Extract a file; images are written to the file's directory
    pub fn extract(&self, path: &Path, file_type: FileType) -> Result<ExtractedDocument> {
        let out_dir = path
            .parent()
            .ok_or_else(|| Error::internal(format!("{} has no parent directory", path.display())))?;

        let mut doc = ExtractedDocument::default();

        match file_type {
            FileType::Image => {
                if !path.is_file() {
                    return Err(Error::Io(std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        format!("{} not found", path.display()),
                    )));
                }
                doc.images.push(path.to_path_buf());
            }
            FileType::Txt => {
                let data = std::fs::read(path)?;
                let text = decode_text(&data, &mut doc);
                doc.text = text;
            }
            FileType::Pdf => {
                let data = std::fs::read(path)?;
                self.extract_pdf(path, &data, out_dir, &mut doc);
            }
            FileType::Docx => {
                let data = std::fs::read(path)?;
                office::extract_docx(&data, out_dir, &mut doc);
            }
            FileType::Pptx => {
                let data = std::fs::read(path)?;
                office::extract_pptx(&data, out_dir, &mut doc);
            }
            FileType::Xlsx => {
                let data = std::fs::read(path)?;
                extract_xlsx(&data, &mut doc);
            }
        }

        doc.text = doc.text.trim().to_string();
        doc.images.retain(|image| image.is_file());

        tracing::debug!(
            "Extracted {} chars and {} images from {} ({} warnings)",
            doc.text.chars().count(),
            doc.images.len(),
            path.display(),
            doc.warnings.len()
        );

        Ok(doc)
    }

    /// Extract from a file, detecting its type from the extension
    pub fn extract_path(&self, path: &Path) -> Result<ExtractedDocument> {
        let file_type = FileType::from_path(path).ok_or_else(|| {
            Error::UnsupportedFormat(
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| format!(".{}", ext))
                    .unwrap_or_else(|| "(no extension)".to_string()),
            )
        })?;
        self.extract(path, file_type)
    }

    fn extract_pdf(&self, path: &Path, data: &[u8], out_dir: &Path, doc: &mut ExtractedDocument) {
        match lopdf::Document::load_mem(data) {
            Ok(pdf) => {
                let mut pages = Vec::new();
                for page_number in pdf.get_pages().keys() {
                    match pdf.extract_text(&[*page_number]) {
                        Ok(text) => {
                            let text = normalize_pdf_text(&text);
                            if !text.is_empty() {
                                pages.push(text);
                            }
                        }
                        Err(e) => {
                            doc.warn(format!("PDF page {}: text extraction failed: {}", page_number, e))
                        }
                    }
                }
                doc.text = pages.join("\n\n");
            }
            Err(e) => doc.warn(format!("PDF could not be parsed page by page: {}", e)),
        }

        if doc.text.trim().is_empty() {
            match extract_pdf_whole(data) {
                Ok(text) => doc.text = normalize_pdf_text(&text),
                Err(message) => doc.warn(message),
            }
        }

        match self.rasterizer.rasterize(path, out_dir) {
            Ok(pages) => doc.images.extend(pages),
            Err(e) => doc.warn(format!("PDF pages not rasterised: {}", e)),
        }
    }
}

/// Whole-file pdf-extract pass; the crate can panic on odd fonts, so it runs
/// on its own thread
fn extract_pdf_whole(data: &[u8]) -> std::result::Result<String, String> {
    let data = data.to_vec();
    let handle = std::thread::spawn(move || pdf_extract::extract_text_from_mem(&data));

    match handle.join() {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(format!("pdf-extract failed: {}", e)),
        Err(_) => Err("pdf-extract panicked while reading the document".to_string()),
    }
}

/// Drop NULs and expand ligatures that PDF fonts commonly emit
fn normalize_pdf_text(text: &str) -> String {
    text.replace('\0', "")
        .replace('\u{00A0}', " ")
        .replace('\u{FB00}', "ff")
        .replace('\u{FB01}', "fi")
        .replace('\u{FB02}', "fl")
        .replace('\u{FB03}', "ffi")
        .replace('\u{FB04}', "ffl")
        .lines()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

fn decode_text(data: &[u8], doc: &mut ExtractedDocument) -> String {
    match std::str::from_utf8(data) {
        Ok(text) => text.to_string(),
        Err(_) => {
            doc.warn("Text file is not valid UTF-8; invalid sequences were replaced");
            String::from_utf8_lossy(data).into_owned()
        }
    }
}

fn extract_xlsx(data: &[u8], doc: &mut ExtractedDocument) {
    let cursor = std::io::Cursor::new(data);
    let mut workbook = match calamine::open_workbook_auto_from_rs(cursor) {
        Ok(workbook) => workbook,
        Err(e) => {
            doc.warn(format!("Spreadsheet could not be opened: {}", e));
            return;
        }
    };

    let mut content = String::new();
    for sheet_name in workbook.sheet_names().to_vec() {
        let range = match workbook.worksheet_range(&sheet_name) {
            Ok(range) => range,
            Err(e) => {
                doc.warn(format!("Sheet '{}' could not be read: {}", sheet_name, e));
                continue;
            }
        };

        content.push_str(&format!("\n\n=== {} ===\n", sheet_name));
        for row in range.rows() {
            let cells: Vec<String> = row.iter().map(cell_text).collect();
            if cells.iter().all(|cell| cell.trim().is_empty()) {
                continue;
            }
            content.push_str(&cells.join("\t"));
            content.push('\n');
        }
    }

    doc.text = content;
}

fn cell_text(cell: &calamine::Data) -> String {
    match cell {
        calamine::Data::Empty => String::new(),
        calamine::Data::String(s) => s.clone(),
        calamine::Data::Float(f) => f.to_string(),
        calamine::Data::Int(i) => i.to_string(),
        calamine::Data::Bool(b) => b.to_string(),
        calamine::Data::DateTime(dt) => dt.to_string(),
        calamine::Data::DateTimeIso(s) | calamine::Data::DurationIso(s) => s.clone(),
        calamine::Data::Error(e) => format!("{:?}", e),
    }
}
