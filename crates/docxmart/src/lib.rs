//! docxmart: multilingual document assistant
//!
//! Upload a document (TXT, Markdown, PDF or DOCX), pick a task from a curated
//! menu and receive one combined response. Documents are split into
//! bounded chunks, each chunk is sent to a text generator in order, and the
//! answers are stitched into a single transcript, with partial progress
//! reported as it accumulates.

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod processing;
pub mod providers;
pub mod server;
pub mod session;
pub mod types;

pub use config::AppConfig;
pub use error::{Error, Result};
pub use generation::{Assembly, AssemblyEvent, ResponseAssembler, TaskCatalog};
pub use providers::TextGenerator;
pub use types::{
    document::{Chunk, Document, FileType, Language},
    query::SubmitRequest,
    response::{SubmitResponse, UploadResponse},
};
