//! Instruction building and response assembly

pub mod assembler;
pub mod prompt;

pub use assembler::{
    strip_turn_artifact, Assembly, AssemblerOptions, AssemblyEvent, ChunkFailure,
    ResponseAssembler,
};
pub use prompt::{PromptBuilder, TaskCatalog, TaskCategory, TaskSelection, TARGET_LANGUAGES};
