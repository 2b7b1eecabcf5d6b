//! Submission runner
//!
//! A submission is validated and snapshotted synchronously, then assembled on
//! its own task. The task always records the result in the session history,
//! whether or not anyone is still listening for events.

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::generation::{Assembly, AssemblyEvent, PromptBuilder, ResponseAssembler, TaskCatalog};
use crate::ingestion::TextChunker;
use crate::providers::TextGenerator;
use crate::session::SessionStore;
use crate::types::SubmitRequest;

/// A prepared submission: one instruction per chunk, session marked busy
#[derive(Debug)]
pub struct Submission {
    pub session_id: Uuid,
    pub instructions: Vec<String>,
}

impl Submission {
    pub fn chunk_count(&self) -> usize {
        self.instructions.len()
    }
}

/// Runs submissions against the configured generator
#[derive(Clone)]
pub struct SubmissionRunner {
    sessions: Arc<SessionStore>,
    generator: Arc<dyn TextGenerator>,
    assembler: Arc<ResponseAssembler>,
    catalog: Arc<TaskCatalog>,
    chunker: TextChunker,
}

impl SubmissionRunner {
    pub fn new(
        sessions: Arc<SessionStore>,
        generator: Arc<dyn TextGenerator>,
        assembler: Arc<ResponseAssembler>,
        catalog: Arc<TaskCatalog>,
        chunker: TextChunker,
    ) -> Self {
        Self {
            sessions,
            generator,
            assembler,
            catalog,
            chunker,
        }
    }

    /// Validate the request, chunk the session's document and build instructions.
    ///
    /// On success the session is busy until the submission is run.
    pub fn prepare(&self, session_id: Uuid, request: &SubmitRequest) -> Result<Submission> {
        let selection = self
            .catalog
            .select(&request.task, request.target_language.as_deref())?;

        let snapshot = self.sessions.begin_submission(session_id, &self.chunker)?;
        let instructions =
            PromptBuilder::build_instructions(&selection, &snapshot.language, &snapshot.chunks);

        tracing::info!(
            "Session {}: submitting {} chunks of document {} ({:?})",
            session_id,
            instructions.len(),
            snapshot.document_id,
            selection
        );

        Ok(Submission {
            session_id,
            instructions,
        })
    }

    /// Assemble on a background task, forwarding events to `events` if given.
    ///
    /// A closed receiver does not stop the run. The session is released even
    /// if the assembly task panics, whether or not the handle is awaited.
    pub fn spawn(
        &self,
        submission: Submission,
        events: Option<mpsc::UnboundedSender<AssemblyEvent>>,
    ) -> JoinHandle<Result<Assembly>> {
        let runner = self.clone();
        let session_id = submission.session_id;

        let work = tokio::spawn(async move {
            let assembly = runner
                .assembler
                .assemble(&submission.instructions, runner.generator.as_ref(), |event| {
                    if let Some(tx) = &events {
                        // Receiver gone means the client disconnected
                        let _ = tx.send(event);
                    }
                })
                .await;

            runner
                .sessions
                .finish_submission(submission.session_id, assembly.transcript.clone());
            assembly
        });

        let sessions = Arc::clone(&self.sessions);
        tokio::spawn(async move {
            work.await.map_err(|e| {
                tracing::error!("Session {}: submission task failed: {}", session_id, e);
                sessions.abort_submission(session_id);
                Error::internal(format!("Submission task failed: {}", e))
            })
        })
    }

    /// Run to completion and return the assembled transcript
    pub async fn run(&self, submission: Submission) -> Result<Assembly> {
        self.spawn(submission, None)
            .await
            .map_err(|e| Error::internal(format!("Submission task failed: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::generation::AssemblerOptions;
    use crate::ingestion::IngestPipeline;
    use crate::providers::{MockGenerator, MockReply};

    fn runner(generator: MockGenerator, max_chunk_chars: usize) -> (SubmissionRunner, Uuid) {
        let sessions = Arc::new(SessionStore::new(SessionConfig::default()));
        let id = sessions.create().unwrap().id;
        let runner = SubmissionRunner::new(
            sessions,
            Arc::new(generator),
            Arc::new(ResponseAssembler::new(AssemblerOptions::default())),
            Arc::new(TaskCatalog::default()),
            TextChunker::new(max_chunk_chars),
        );
        (runner, id)
    }

    fn upload(runner: &SubmissionRunner, id: Uuid, text: &str) {
        let doc = IngestPipeline::default()
            .ingest("notes.txt", None, text.as_bytes())
            .unwrap();
        runner.sessions.set_document(id, doc).unwrap();
    }

    #[tokio::test]
    async fn test_run_appends_one_assistant_message() {
        let generator = MockGenerator::with_script([
            MockReply::Text("Part one.".to_string()),
            MockReply::Text("Part two.".to_string()),
        ]);
        let (runner, id) = runner(generator, 6);
        upload(&runner, id, "alpha\nbravo");

        let submission = runner
            .prepare(id, &SubmitRequest::new("Summarize a CV"))
            .unwrap();
        assert_eq!(submission.chunk_count(), 2);

        let assembly = runner.run(submission).await.unwrap();
        assert_eq!(assembly.transcript, "Part one. Part two. ");

        let summary = runner.sessions.summary(id).unwrap();
        assert!(!summary.submitting);
        assert_eq!(summary.messages.len(), 1);
        assert_eq!(summary.messages[0].content, assembly.transcript);
    }

    #[tokio::test]
    async fn test_invalid_task_leaves_session_idle() {
        let (runner, id) = runner(MockGenerator::new(), 100);
        upload(&runner, id, "text");

        let err = runner
            .prepare(id, &SubmitRequest::new("Translate the document to another language"))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
        assert!(!runner.sessions.summary(id).unwrap().submitting);
    }

    #[tokio::test]
    async fn test_dropped_receiver_still_records_history() {
        let (runner, id) = runner(MockGenerator::new(), 4);
        upload(&runner, id, "one\ntwo");

        let submission = runner
            .prepare(id, &SubmitRequest::new("Summarize a CV"))
            .unwrap();
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);

        let assembly = runner.spawn(submission, Some(tx)).await.unwrap().unwrap();
        assert_eq!(assembly.chunks, 2);
        assert_eq!(runner.sessions.summary(id).unwrap().messages.len(), 1);
    }

    #[tokio::test]
    async fn test_events_are_forwarded() {
        let (runner, id) = runner(MockGenerator::new(), 100);
        upload(&runner, id, "short");

        let submission = runner
            .prepare(id, &SubmitRequest::new("Summarize a CV"))
            .unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        runner.spawn(submission, Some(tx)).await.unwrap().unwrap();

        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        assert!(matches!(events[0], AssemblyEvent::Progress { chunk: 1, total: 1, .. }));
        assert!(matches!(events.last(), Some(AssemblyEvent::Done { .. })));
    }

    #[tokio::test]
    async fn test_translation_uses_detected_language() {
        let generator = Arc::new(MockGenerator::new());
        let sessions = Arc::new(SessionStore::new(SessionConfig::default()));
        let id = sessions.create().unwrap().id;
        let runner = SubmissionRunner::new(
            Arc::clone(&sessions),
            generator.clone(),
            Arc::new(ResponseAssembler::default()),
            Arc::new(TaskCatalog::default()),
            TextChunker::default(),
        );
        upload(
            &runner,
            id,
            "The committee will meet again next week to review the annual budget and staffing plans.",
        );

        let request = SubmitRequest::new("Translate the document to another language")
            .with_target_language("German");
        let submission = runner.prepare(id, &request).unwrap();
        runner.run(submission).await.unwrap();

        let calls = generator.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].starts_with("Please translate the following document from English to German:\n\n"));
    }

    #[tokio::test]
    async fn test_panicking_generator_releases_session() {
        let (runner, id) = runner(MockGenerator::with_script([MockReply::Panic]), 100);
        upload(&runner, id, "text");

        let submission = runner
            .prepare(id, &SubmitRequest::new("Summarize a CV"))
            .unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let result = runner.spawn(submission, Some(tx)).await.unwrap();

        assert!(matches!(result, Err(Error::Internal(_))));
        // The event stream ends instead of hanging
        assert!(rx.recv().await.is_none());

        let summary = runner.sessions.summary(id).unwrap();
        assert!(!summary.submitting);
        assert!(summary.messages.is_empty());
        assert!(runner
            .prepare(id, &SubmitRequest::new("Summarize a CV"))
            .is_ok());
    }
}
