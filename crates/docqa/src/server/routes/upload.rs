//! Document upload endpoint

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use std::sync::Arc;
use std::time::Instant;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::session::{ReadySession, Session};
use crate::types::{document::dotted_extension, FileType, UploadResponse};

/// POST /api/v1/upload - Upload a document and build its session
pub async fn upload_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let (filename, data) = read_file_field(&mut multipart).await?;
    let upload = &state.config().upload;

    if data.len() > upload.max_file_size {
        return Err(Error::validation(format!(
            "File too large. Max {}MB",
            upload.max_file_size / (1024 * 1024)
        )));
    }

    let extension = dotted_extension(&filename);
    if !upload.is_allowed(&extension) {
        return Err(Error::UnsupportedFormat(format!(
            "Unsupported file type: {}",
            display_extension(&extension)
        )));
    }
    let file_type = FileType::from_extension(&extension).ok_or_else(|| {
        Error::UnsupportedFormat(format!("No extractor for {}", display_extension(&extension)))
    })?;

    let session = state.sessions().create(&filename).await?;
    match build_session(&state, &session, &filename, &data, file_type).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            tracing::error!("[{}] Processing failed: {}", filename, e);
            if let Err(cleanup) = state.sessions().delete(&session.id()).await {
                tracing::warn!("Could not remove failed session {}: {}", session.id(), cleanup);
            }
            Err(e)
        }
    }
}

async fn build_session(
    state: &AppState,
    session: &Arc<Session>,
    filename: &str,
    data: &[u8],
    file_type: FileType,
) -> Result<UploadResponse> {
    let start = Instant::now();
    let path = session.temp_dir().join(filename);
    tokio::fs::write(&path, data).await?;

    tracing::info!("[{}] Processing upload ({} bytes)", filename, data.len());

    let processed = state
        .pipeline()
        .process(&path, file_type, &format!("session-{}", session.id()))
        .await?;

    let response = UploadResponse {
        session_id: session.id().to_string(),
        filename: filename.to_string(),
        status: "ready".to_string(),
        text_length: processed.text_length,
        num_chunks: processed.chunk_count,
        num_images_processed: processed.image_count,
        message: "Document processed successfully!".to_string(),
        warnings: processed.warnings.clone(),
    };

    session.mark_ready(ReadySession {
        collection: Arc::new(processed.collection),
        text_length: processed.text_length,
        image_count: processed.image_count,
        chunk_count: processed.chunk_count,
        warnings: processed.warnings,
    });

    tracing::info!(
        "[{}] Session {} ready in {}ms",
        filename,
        session.id(),
        start.elapsed().as_millis()
    );
    Ok(response)
}

/// The `file` part of the form, with a sanitised filename
async fn read_file_field(multipart: &mut Multipart) -> Result<(String, Bytes)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::validation(format!("Invalid upload: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .and_then(sanitize_filename)
            .ok_or_else(|| Error::validation("Upload has no usable filename"))?;

        let data = field
            .bytes()
            .await
            .map_err(|e| Error::validation(format!("Failed to read upload: {}", e)))?;

        return Ok((filename, data));
    }

    Err(Error::validation("Missing multipart field 'file'"))
}

/// Last path component with control characters removed
pub(crate) fn sanitize_filename(raw: &str) -> Option<String> {
    let name: String = raw
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .chars()
        .filter(|c| !c.is_control())
        .collect();
    let name = name.trim().to_string();

    if name.is_empty() || name == "." || name == ".." {
        None
    } else {
        Some(name)
    }
}

fn display_extension(extension: &str) -> &str {
    if extension.is_empty() {
        "(none)"
    } else {
        extension
    }
}
