//! In-memory session registry

use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use crate::config::SessionConfig;
use crate::error::{Error, Result};
use crate::ingestion::TextChunker;
use crate::types::{ChatMessage, Chunk, Document, Language};

use super::{Session, SessionSummary};

/// What a submission works on, copied out of the session when it starts
#[derive(Debug, Clone)]
pub struct SubmissionSnapshot {
    pub session_id: Uuid,
    pub document_id: Uuid,
    pub language: Language,
    pub chunks: Vec<Chunk>,
}

/// Live sessions keyed by ID
pub struct SessionStore {
    sessions: DashMap<Uuid, Session>,
    config: SessionConfig,
}

impl SessionStore {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            sessions: DashMap::new(),
            config,
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Create a session, purging idle ones first if the store is full
    pub fn create(&self) -> Result<SessionSummary> {
        if self.sessions.len() >= self.config.max_sessions {
            self.purge_expired();
            if self.sessions.len() >= self.config.max_sessions {
                return Err(Error::TooManySessions(self.config.max_sessions));
            }
        }

        let session = Session::new();
        let summary = session.summary();
        self.sessions.insert(session.id, session);

        tracing::info!("Created session {}", summary.id);
        Ok(summary)
    }

    pub fn summary(&self, id: Uuid) -> Result<SessionSummary> {
        self.with_session(id, |s| s.summary())
    }

    /// Destroy a session
    pub fn remove(&self, id: Uuid) -> Result<()> {
        self.sessions
            .remove(&id)
            .map(|_| tracing::info!("Destroyed session {}", id))
            .ok_or(Error::SessionNotFound(id))
    }

    /// Install a freshly decoded document, discarding pending chunks
    pub fn set_document(&self, id: Uuid, document: Document) -> Result<()> {
        self.with_session(id, |s| s.replace_document(Some(document)))
    }

    /// Leave the session without a document (after a failed decode)
    pub fn clear_document(&self, id: Uuid) -> Result<()> {
        self.with_session(id, |s| s.replace_document(None))
    }

    /// Mark the session busy and snapshot its chunked document.
    ///
    /// Fails if there is no document or another submission is running.
    pub fn begin_submission(&self, id: Uuid, chunker: &TextChunker) -> Result<SubmissionSnapshot> {
        let mut session = self
            .sessions
            .get_mut(&id)
            .ok_or(Error::SessionNotFound(id))?;

        if session.submitting {
            return Err(Error::SessionBusy(id));
        }

        let document = session.document.as_ref().ok_or(Error::NoDocument)?;
        let chunks = chunker.chunk(&document.content);
        let snapshot = SubmissionSnapshot {
            session_id: id,
            document_id: document.id,
            language: document.language.clone(),
            chunks: chunks.clone(),
        };

        session.pending_chunks = chunks;
        session.submitting = true;
        session.touch();

        Ok(snapshot)
    }

    /// Record the finished transcript as one assistant turn and release the session
    pub fn finish_submission(&self, id: Uuid, transcript: String) {
        match self.sessions.get_mut(&id) {
            Some(mut session) => {
                session.messages.push(ChatMessage::assistant(transcript));
                session.pending_chunks.clear();
                session.submitting = false;
                session.touch();
            }
            None => tracing::warn!("Session {} ended before its submission finished", id),
        }
    }

    /// Release the session without recording anything
    pub fn abort_submission(&self, id: Uuid) {
        if let Some(mut session) = self.sessions.get_mut(&id) {
            session.pending_chunks.clear();
            session.submitting = false;
        }
    }

    /// Drop sessions idle longer than the configured timeout; returns how many
    pub fn purge_expired(&self) -> usize {
        let idle = chrono::Duration::seconds(self.config.idle_timeout_secs as i64);
        let cutoff = Utc::now() - idle;
        let before = self.sessions.len();

        self.sessions
            .retain(|_, session| session.submitting || session.last_active >= cutoff);

        let purged = before.saturating_sub(self.sessions.len());
        if purged > 0 {
            tracing::info!("Expired {} idle sessions", purged);
        }
        purged
    }

    fn with_session<T>(&self, id: Uuid, f: impl FnOnce(&mut Session) -> T) -> Result<T> {
        let mut session = self
            .sessions
            .get_mut(&id)
            .ok_or(Error::SessionNotFound(id))?;
        Ok(f(&mut session))
    }
}
