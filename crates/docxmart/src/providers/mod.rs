//! Text generator backends
//!
//! A single trait, [`TextGenerator`], hides whether instructions go to an
//! OpenAI-compatible API, a local Ollama server, or a scripted mock.

pub mod llm;
pub mod mock;
pub mod ollama;
pub mod openai;

use std::sync::Arc;

use crate::config::{LlmBackend, LlmConfig};
use crate::error::Result;

pub use llm::TextGenerator;
pub use mock::{MockGenerator, MockReply};
pub use ollama::OllamaGenerator;
pub use openai::OpenAiGenerator;

/// Build the configured generator
pub fn build_generator(config: &LlmConfig) -> Result<Arc<dyn TextGenerator>> {
    let generator: Arc<dyn TextGenerator> = match config.backend {
        LlmBackend::OpenAi => Arc::new(OpenAiGenerator::new(config)?),
        LlmBackend::Ollama => Arc::new(OllamaGenerator::new(config)?),
    };

    tracing::info!(
        "Text generator: {} (model: {}, timeout: {}s)",
        generator.name(),
        generator.model(),
        config.timeout_secs
    );

    Ok(generator)
}
