//! API response types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::document::{Document, FileType, Language};
use crate::generation::{Assembly, ChunkFailure};

/// Result of a successful upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub session_id: Uuid,
    pub document_id: Uuid,
    pub filename: String,
    pub file_type: FileType,
    pub char_count: usize,
    pub total_pages: Option<u32>,
    pub content_hash: String,
    pub language: Language,
    /// Number of chunks a submission will send with the current settings
    pub chunk_count: usize,
    pub processing_time_ms: u64,
}

impl UploadResponse {
    pub fn new(session_id: Uuid, doc: &Document, chunk_count: usize, processing_time_ms: u64) -> Self {
        Self {
            session_id,
            document_id: doc.id,
            filename: doc.filename.clone(),
            file_type: doc.file_type,
            char_count: doc.char_count(),
            total_pages: doc.total_pages,
            content_hash: doc.content_hash.clone(),
            language: doc.language.clone(),
            chunk_count,
            processing_time_ms,
        }
    }
}

/// Result of a completed submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub session_id: Uuid,
    pub transcript: String,
    pub chunks: usize,
    pub failures: Vec<ChunkFailure>,
    pub processing_time_ms: u64,
}

impl SubmitResponse {
    pub fn new(session_id: Uuid, assembly: Assembly, processing_time_ms: u64) -> Self {
        Self {
            session_id,
            transcript: assembly.transcript,
            chunks: assembly.chunks,
            failures: assembly.failures,
            processing_time_ms,
        }
    }
}
