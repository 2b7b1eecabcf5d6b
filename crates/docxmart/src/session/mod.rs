//! Per-user session context
//!
//! A session owns the current document, the chunk list of the submission in
//! flight and the conversation history. It is created explicitly, reset by
//! every upload and destroyed on request or after sitting idle.

mod store;

pub use store::{SessionStore, SubmissionSnapshot};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::types::{ChatMessage, Chunk, Document, FileType, Language};

/// Session state
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    document: Option<Document>,
    pending_chunks: Vec<Chunk>,
    messages: Vec<ChatMessage>,
    submitting: bool,
    created_at: DateTime<Utc>,
    last_active: DateTime<Utc>,
}

impl Session {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            document: None,
            pending_chunks: Vec::new(),
            messages: Vec::new(),
            submitting: false,
            created_at: now,
            last_active: now,
        }
    }

    fn touch(&mut self) {
        self.last_active = Utc::now();
    }

    /// Replace the document; pending chunks belong to the old one
    fn replace_document(&mut self, document: Option<Document>) {
        self.document = document;
        self.pending_chunks.clear();
        self.touch();
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            id: self.id,
            document: self.document.as_ref().map(DocumentInfo::from),
            pending_chunks: self.pending_chunks.len(),
            submitting: self.submitting,
            messages: self.messages.clone(),
            created_at: self.created_at,
            last_active: self.last_active,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Document metadata without its text
#[derive(Debug, Clone, Serialize)]
pub struct DocumentInfo {
    pub id: Uuid,
    pub filename: String,
    pub file_type: FileType,
    pub char_count: usize,
    pub total_pages: Option<u32>,
    pub file_size: u64,
    pub content_hash: String,
    pub language: Language,
    pub uploaded_at: DateTime<Utc>,
}

impl From<&Document> for DocumentInfo {
    fn from(doc: &Document) -> Self {
        Self {
            id: doc.id,
            filename: doc.filename.clone(),
            file_type: doc.file_type,
            char_count: doc.char_count(),
            total_pages: doc.total_pages,
            file_size: doc.file_size,
            content_hash: doc.content_hash.clone(),
            language: doc.language.clone(),
            uploaded_at: doc.uploaded_at,
        }
    }
}

/// Public view of a session
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub id: Uuid,
    pub document: Option<DocumentInfo>,
    pub pending_chunks: usize,
    pub submitting: bool,
    pub messages: Vec<ChatMessage>,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}
