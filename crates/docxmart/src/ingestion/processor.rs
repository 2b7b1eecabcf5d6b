//! Ingestion pipeline orchestration

use uuid::Uuid;

use crate::error::Result;
use crate::types::{Chunk, Document};

use super::chunker::TextChunker;
use super::language::LanguageDetector;
use super::parser::FileParser;

/// Decode → detect language → (later) chunk
pub struct IngestPipeline {
    /// Text chunker
    chunker: TextChunker,
    /// Language identifier
    detector: LanguageDetector,
}

impl IngestPipeline {
    /// Create a new ingestion pipeline
    pub fn new(max_chunk_chars: usize) -> Self {
        Self {
            chunker: TextChunker::new(max_chunk_chars),
            detector: LanguageDetector::new(),
        }
    }

    /// Decode an upload into a document with its detected language
    pub fn ingest(&self, filename: &str, content_type: Option<&str>, data: &[u8]) -> Result<Document> {
        let parsed = FileParser::parse(filename, content_type, data)?;
        let language = self.detector.detect(&parsed.content);

        tracing::info!(
            "Decoded {} ({}, {} bytes, language: {})",
            filename,
            parsed.file_type.display_name(),
            data.len(),
            language.name
        );

        Ok(Document {
            id: Uuid::new_v4(),
            filename: filename.to_string(),
            file_type: parsed.file_type,
            content: parsed.content,
            content_hash: parsed.content_hash,
            total_pages: parsed.total_pages,
            file_size: data.len() as u64,
            language,
            uploaded_at: chrono::Utc::now(),
        })
    }

    /// Split a document into chunks
    pub fn create_chunks(&self, doc: &Document) -> Vec<Chunk> {
        self.chunker.chunk(&doc.content)
    }

    pub fn chunker(&self) -> &TextChunker {
        &self.chunker
    }
}

impl Default for IngestPipeline {
    fn default() -> Self {
        Self::new(3000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FileType;

    #[test]
    fn test_ingest_and_chunk() {
        let pipeline = IngestPipeline::new(20);
        let text = "This is the first line of the file\nand this is the second one";
        let doc = pipeline.ingest("doc.txt", None, text.as_bytes()).unwrap();

        assert_eq!(doc.file_type, FileType::Txt);
        assert_eq!(doc.file_size, text.len() as u64);
        assert_eq!(doc.char_count(), text.chars().count());

        let chunks = pipeline.create_chunks(&doc);
        assert!(chunks.len() > 1);
        let rebuilt: String = chunks.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn test_decode_failure_propagates() {
        let pipeline = IngestPipeline::default();
        assert!(pipeline.ingest("data.bin", None, b"\x00\x01").is_err());
    }
}
