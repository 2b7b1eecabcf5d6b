//! Application state for the docXmart server

use parking_lot::RwLock;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::Result;
use crate::generation::{AssemblerOptions, ResponseAssembler, TaskCatalog};
use crate::ingestion::IngestPipeline;
use crate::processing::SubmissionRunner;
use crate::providers::{build_generator, TextGenerator};
use crate::session::SessionStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    sessions: Arc<SessionStore>,
    pipeline: IngestPipeline,
    generator: Arc<dyn TextGenerator>,
    catalog: Arc<TaskCatalog>,
    runner: SubmissionRunner,
    ready: RwLock<bool>,
}

impl AppState {
    /// Create state with the generator named in the configuration
    pub fn new(config: AppConfig) -> Result<Self> {
        tracing::info!("Initializing docXmart state (backend: {:?})...", config.llm.backend);

        let generator = build_generator(&config.llm)?;
        tracing::info!("Text generator ready: {} ({})", generator.name(), generator.model());

        Ok(Self::with_generator(config, generator))
    }

    /// Create state around an existing generator
    pub fn with_generator(config: AppConfig, generator: Arc<dyn TextGenerator>) -> Self {
        let sessions = Arc::new(SessionStore::new(config.sessions.clone()));
        let pipeline = IngestPipeline::new(config.chunking.max_chunk_chars);
        let catalog = Arc::new(TaskCatalog::default());
        let assembler = Arc::new(ResponseAssembler::new(AssemblerOptions::from_config(
            &config.assembly,
            &config.llm,
        )));

        let runner = SubmissionRunner::new(
            Arc::clone(&sessions),
            Arc::clone(&generator),
            assembler,
            Arc::clone(&catalog),
            *pipeline.chunker(),
        );

        Self {
            inner: Arc::new(AppStateInner {
                config,
                sessions,
                pipeline,
                generator,
                catalog,
                runner,
                ready: RwLock::new(true),
            }),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.inner.sessions
    }

    pub fn pipeline(&self) -> &IngestPipeline {
        &self.inner.pipeline
    }

    pub fn generator(&self) -> &Arc<dyn TextGenerator> {
        &self.inner.generator
    }

    pub fn catalog(&self) -> &TaskCatalog {
        &self.inner.catalog
    }

    pub fn runner(&self) -> &SubmissionRunner {
        &self.inner.runner
    }

    pub fn is_ready(&self) -> bool {
        *self.inner.ready.read()
    }

    pub fn set_ready(&self, ready: bool) {
        *self.inner.ready.write() = ready;
    }
}
