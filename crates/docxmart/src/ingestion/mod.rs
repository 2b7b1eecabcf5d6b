//! Document ingestion: decoding, language identification and chunking

mod chunker;
mod language;
mod parser;
mod processor;

pub use chunker::TextChunker;
pub use language::LanguageDetector;
pub use parser::{FileParser, ParsedDocument};
pub use processor::IngestPipeline;
