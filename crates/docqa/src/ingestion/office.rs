//! Office Open XML (DOCX, PPTX) text and image extraction

use quick_xml::events::Event;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use zip::ZipArchive;

use crate::types::document::is_raster_image;

use super::extractor::ExtractedDocument;

type Archive<'a> = ZipArchive<Cursor<&'a [u8]>>;

const DOCX_RELS: &str = "word/_rels/document.xml.rels";
const SLIDE_PREFIX: &str = "ppt/slides/slide";

/// Paragraph text plus every image the main document part references
pub(crate) fn extract_docx(data: &[u8], out_dir: &Path, doc: &mut ExtractedDocument) {
    match docx_rs::read_docx(data) {
        Ok(docx) => {
            let mut lines = Vec::new();
            for child in docx.document.children {
                if let docx_rs::DocumentChild::Paragraph(paragraph) = child {
                    let mut line = String::new();
                    for child in paragraph.children {
                        if let docx_rs::ParagraphChild::Run(run) = child {
                            for child in run.children {
                                if let docx_rs::RunChild::Text(text) = child {
                                    line.push_str(&text.text);
                                }
                            }
                        }
                    }
                    lines.push(line);
                }
            }
            doc.text = lines.join("\n");
        }
        Err(e) => doc.warn(format!("DOCX text could not be read: {}", e)),
    }

    let mut archive = match ZipArchive::new(Cursor::new(data)) {
        Ok(archive) => archive,
        Err(e) => {
            doc.warn(format!("DOCX images could not be read: {}", e));
            return;
        }
    };

    let rels = match read_entry_string(&mut archive, DOCX_RELS) {
        Ok(rels) => rels,
        Err(e) => {
            doc.warn(format!("DOCX relationships missing: {}", e));
            return;
        }
    };

    let mut index = 0;
    for target in image_targets(&rels, "word") {
        let Some(ext) = raster_extension(&target, doc) else {
            continue;
        };
        index += 1;
        let path = out_dir.join(format!("img_{}.{}", index, ext));
        if let Some(path) = copy_entry(&mut archive, &target, path, doc) {
            doc.images.push(path);
        }
    }
}

/// Per-slide text with `=== Slide <n> ===` markers plus slide pictures
pub(crate) fn extract_pptx(data: &[u8], out_dir: &Path, doc: &mut ExtractedDocument) {
    let mut archive = match ZipArchive::new(Cursor::new(data)) {
        Ok(archive) => archive,
        Err(e) => {
            doc.warn(format!("PPTX could not be opened: {}", e));
            return;
        }
    };

    let mut slides: Vec<(u32, String)> = archive
        .file_names()
        .filter_map(|name| {
            let number = name
                .strip_prefix(SLIDE_PREFIX)?
                .strip_suffix(".xml")?
                .parse::<u32>()
                .ok()?;
            Some((number, name.to_string()))
        })
        .collect();
    slides.sort_by_key(|(number, _)| *number);

    let mut content = String::new();
    for (position, (number, name)) in slides.iter().enumerate() {
        let slide = position + 1;
        content.push_str(&format!("\n\n=== Slide {} ===\n", slide));

        match read_entry_string(&mut archive, name) {
            Ok(xml) => content.push_str(&slide_text(&xml)),
            Err(e) => doc.warn(format!("Slide {} text could not be read: {}", slide, e)),
        }

        let rels_name = format!("ppt/slides/_rels/slide{}.xml.rels", number);
        let rels = match read_entry_string(&mut archive, &rels_name) {
            Ok(rels) => rels,
            // slides without relationships have no pictures
            Err(_) => continue,
        };

        let mut index = 0;
        for target in image_targets(&rels, "ppt/slides") {
            let Some(ext) = raster_extension(&target, doc) else {
                continue;
            };
            index += 1;
            let path = out_dir.join(format!("slide_{}_{}.{}", slide, index, ext));
            if let Some(path) = copy_entry(&mut archive, &target, path, doc) {
                doc.images.push(path);
            }
        }
    }

    doc.text = content;
}

/// Text runs of one slide, one paragraph per line
fn slide_text(xml: &str) -> String {
    let mut reader = quick_xml::Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut lines = Vec::new();
    let mut line = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"t" => in_text = true,
            Ok(Event::Text(e)) if in_text => {
                if let Ok(text) = e.unescape() {
                    if !line.is_empty() {
                        line.push(' ');
                    }
                    line.push_str(text.trim());
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => {
                    if !line.trim().is_empty() {
                        lines.push(std::mem::take(&mut line));
                    }
                    line.clear();
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                tracing::debug!("Stopped reading slide XML: {}", e);
                break;
            }
            _ => {}
        }
    }

    if !line.trim().is_empty() {
        lines.push(line);
    }
    lines.join("\n")
}

/// Zip paths of internal image relationships, in document order
fn image_targets(rels_xml: &str, base_dir: &str) -> Vec<String> {
    let mut reader = quick_xml::Reader::from_str(rels_xml);
    let mut targets: Vec<String> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Empty(e)) | Ok(Event::Start(e))
                if e.local_name().as_ref() == b"Relationship" =>
            {
                let mut kind = String::new();
                let mut target = String::new();
                let mut external = false;

                for attr in e.attributes().flatten() {
                    let Ok(value) = attr.unescape_value() else {
                        continue;
                    };
                    match attr.key.local_name().as_ref() {
                        b"Type" => kind = value.into_owned(),
                        b"Target" => target = value.into_owned(),
                        b"TargetMode" => external = value.eq_ignore_ascii_case("external"),
                        _ => {}
                    }
                }

                if kind.ends_with("/image") && !external && !target.is_empty() {
                    let resolved = resolve_target(base_dir, &target);
                    if !targets.contains(&resolved) {
                        targets.push(resolved);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                tracing::debug!("Stopped reading relationships: {}", e);
                break;
            }
            _ => {}
        }
    }

    targets
}

/// Resolve a relationship target against the directory of its source part
fn resolve_target(base_dir: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut parts: Vec<&str> = base_dir.split('/').filter(|p| !p.is_empty()).collect();
    for component in target.split('/') {
        match component {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }
    parts.join("/")
}

/// Lowercased extension of a raster image entry; other formats are skipped
fn raster_extension(entry: &str, doc: &mut ExtractedDocument) -> Option<String> {
    let ext = Path::new(entry)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .unwrap_or_default();

    if is_raster_image(&ext) {
        Some(ext)
    } else {
        doc.warn(format!("Skipping non-raster image {}", entry));
        None
    }
}

fn read_entry(archive: &mut Archive<'_>, name: &str) -> Result<Vec<u8>, String> {
    let mut file = archive.by_name(name).map_err(|e| format!("{}: {}", name, e))?;
    let mut buf = Vec::new();
    file.read_to_end(&mut buf).map_err(|e| format!("{}: {}", name, e))?;
    Ok(buf)
}

fn read_entry_string(archive: &mut Archive<'_>, name: &str) -> Result<String, String> {
    let data = read_entry(archive, name)?;
    String::from_utf8(data).map_err(|e| format!("{}: {}", name, e))
}

fn copy_entry(
    archive: &mut Archive<'_>,
    entry: &str,
    path: PathBuf,
    doc: &mut ExtractedDocument,
) -> Option<PathBuf> {
    let data = match read_entry(archive, entry) {
        Ok(data) => data,
        Err(e) => {
            doc.warn(format!("Embedded image could not be read: {}", e));
            return None;
        }
    };

    match std::fs::write(&path, data) {
        Ok(()) => Some(path),
        Err(e) => {
            doc.warn(format!("Could not write {}: {}", path.display(), e));
            None
        }
    }
}
