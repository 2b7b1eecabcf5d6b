//! Sequential multi-chunk response assembly
//!
//! Instructions are sent to the generator one at a time, in order. Each
//! successful answer is cleaned and appended to a running transcript, and the
//! caller is told about every step so it can render partial output. A failed
//! chunk is reported and skipped; it never stops the remaining chunks.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use std::time::Duration;
use tokio::time::{sleep, timeout};

use crate::config::{AssemblyConfig, LlmConfig};
use crate::error::{Error, Result};
use crate::providers::TextGenerator;

/// Assembly tuning
#[derive(Debug, Clone)]
pub struct AssemblerOptions {
    /// Pause after each successful chunk (cosmetic)
    pub pacing: Duration,
    /// Upper bound for a single generation call, retries included
    pub call_timeout: Duration,
    /// Placeholder for failed chunks; `{chunk}` is replaced by the chunk number
    pub gap_marker: Option<String>,
}

impl AssemblerOptions {
    pub fn from_config(assembly: &AssemblyConfig, llm: &LlmConfig) -> Self {
        Self {
            pacing: assembly.pacing(),
            call_timeout: llm.call_budget(),
            gap_marker: assembly.gap_marker.clone(),
        }
    }
}

impl Default for AssemblerOptions {
    fn default() -> Self {
        Self {
            pacing: Duration::ZERO,
            call_timeout: Duration::from_secs(120),
            gap_marker: None,
        }
    }
}

/// A chunk whose generation failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkFailure {
    /// One-based chunk number
    pub chunk: usize,
    /// Failure detail
    pub message: String,
}

/// Notifications emitted while assembling
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AssemblyEvent {
    /// A chunk succeeded; `transcript` is everything accumulated so far
    Progress {
        chunk: usize,
        total: usize,
        transcript: String,
    },
    /// A chunk failed and was skipped
    ChunkError(ChunkFailure),
    /// All chunks processed
    Done {
        transcript: String,
        chunks: usize,
        failures: Vec<ChunkFailure>,
    },
}

impl AssemblyEvent {
    /// Name used for the SSE `event:` field
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::Progress { .. } => "progress",
            Self::ChunkError(_) => "chunk_error",
            Self::Done { .. } => "done",
        }
    }
}

/// Outcome of one assembly run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assembly {
    pub transcript: String,
    pub chunks: usize,
    pub failures: Vec<ChunkFailure>,
}

/// Drives instructions through a generator strictly in order
pub struct ResponseAssembler {
    options: AssemblerOptions,
}

impl ResponseAssembler {
    pub fn new(options: AssemblerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &AssemblerOptions {
        &self.options
    }

    /// Run every instruction and build the transcript.
    ///
    /// `on_event` sees one `Progress` per successful chunk, one `ChunkError`
    /// per failed chunk and a final `Done`.
    pub async fn assemble<F>(
        &self,
        instructions: &[String],
        generator: &dyn TextGenerator,
        mut on_event: F,
    ) -> Assembly
    where
        F: FnMut(AssemblyEvent) + Send,
    {
        let total = instructions.len();
        let mut transcript = String::new();
        let mut failures = Vec::new();

        for (i, instruction) in instructions.iter().enumerate() {
            let chunk = i + 1;

            match self.generate_one(generator, instruction).await {
                Ok(answer) if answer.is_empty() => {
                    tracing::warn!("Chunk {}/{} produced an empty response", chunk, total);
                }
                Ok(answer) => {
                    transcript.push_str(strip_turn_artifact(&answer));
                    transcript.push(' ');

                    tracing::debug!("Chunk {}/{} done ({} chars)", chunk, total, answer.len());
                    on_event(AssemblyEvent::Progress {
                        chunk,
                        total,
                        transcript: transcript.clone(),
                    });

                    if chunk < total && !self.options.pacing.is_zero() {
                        sleep(self.options.pacing).await;
                    }
                }
                Err(e) => {
                    tracing::warn!("Chunk {}/{} failed: {}", chunk, total, e);

                    if let Some(marker) = &self.options.gap_marker {
                        transcript.push_str(&marker.replace("{chunk}", &chunk.to_string()));
                        transcript.push(' ');
                    }

                    let failure = ChunkFailure {
                        chunk,
                        message: format!(
                            "An error occurred while generating the response for chunk {}: {}",
                            chunk, e
                        ),
                    };
                    on_event(AssemblyEvent::ChunkError(failure.clone()));
                    failures.push(failure);
                }
            }
        }

        tracing::info!(
            "Assembled {} chunks ({} failed, {} chars)",
            total,
            failures.len(),
            transcript.len()
        );

        on_event(AssemblyEvent::Done {
            transcript: transcript.clone(),
            chunks: total,
            failures: failures.clone(),
        });

        Assembly {
            transcript,
            chunks: total,
            failures,
        }
    }

    async fn generate_one(&self, generator: &dyn TextGenerator, instruction: &str) -> Result<String> {
        match timeout(self.options.call_timeout, generator.generate(instruction)).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout(self.options.call_timeout.as_secs())),
        }
    }
}

impl Default for ResponseAssembler {
    fn default() -> Self {
        Self::new(AssemblerOptions::default())
    }
}

/// Remove a trailing "user:" turn marker that chat models sometimes emit
pub fn strip_turn_artifact(answer: &str) -> &str {
    static ARTIFACT: OnceLock<Regex> = OnceLock::new();
    let artifact = ARTIFACT.get_or_init(|| Regex::new(r"(?i)\s*user:\s*$").expect("valid artifact regex"));

    match artifact.find(answer) {
        Some(m) => &answer[..m.start()],
        None => answer,
    }
}
