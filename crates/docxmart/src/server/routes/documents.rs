//! Document upload endpoint

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use std::time::Instant;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::UploadResponse;

/// POST /api/sessions/:id/document - Upload and decode a document
///
/// The first file field is used. A new upload always replaces the previous
/// document; if decoding fails the session is left without one.
pub async fn upload_document(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let start = Instant::now();

    // 404 before reading the body
    state.sessions().summary(session_id)?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::invalid_request(format!("Failed to read multipart field: {}", e)))?
    {
        let Some(filename) = field.file_name().map(|s| s.to_string()) else {
            continue;
        };
        let content_type = field.content_type().map(|s| s.to_string());
        let data = field
            .bytes()
            .await
            .map_err(|e| Error::invalid_request(format!("Failed to read file: {}", e)))?;

        upload = Some((filename, content_type, data));
        break;
    }

    let (filename, content_type, data) =
        upload.ok_or_else(|| Error::invalid_request("No file field in upload"))?;

    tracing::info!(
        "Session {}: processing upload {} ({} bytes)",
        session_id,
        filename,
        data.len()
    );

    // Decoding is CPU-bound (PDF in particular)
    let pipeline_state = state.clone();
    let decoded = tokio::task::spawn_blocking(move || {
        pipeline_state
            .pipeline()
            .ingest(&filename, content_type.as_deref(), &data)
    })
    .await
    .map_err(|e| Error::internal(format!("Decode task failed: {}", e)))?;

    let document = match decoded {
        Ok(doc) => doc,
        Err(e) => {
            if e.is_decode_error() {
                state.sessions().clear_document(session_id)?;
            }
            tracing::warn!("Session {}: upload rejected: {}", session_id, e);
            return Err(e);
        }
    };

    let chunk_count = state.pipeline().create_chunks(&document).len();
    let response = UploadResponse::new(
        session_id,
        &document,
        chunk_count,
        start.elapsed().as_millis() as u64,
    );

    tracing::info!(
        "Session {}: {} decoded ({} chars, {} chunks, language {})",
        session_id,
        document.filename,
        response.char_count,
        chunk_count,
        document.language.name
    );

    state.sessions().set_document(session_id, document)?;
    Ok(Json(response))
}
