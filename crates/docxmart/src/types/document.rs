//! Document and chunk types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Supported upload formats
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// Plain text file
    Txt,
    /// Markdown file
    Markdown,
    /// PDF document
    Pdf,
    /// Microsoft Word document (.docx)
    Docx,
    /// Unknown file type
    Unknown,
}

impl FileType {
    /// Detect file type from extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "txt" | "text" => Self::Txt,
            "md" | "markdown" => Self::Markdown,
            "pdf" => Self::Pdf,
            "docx" => Self::Docx,
            _ => Self::Unknown,
        }
    }

    /// Detect file type from a declared MIME type
    pub fn from_mime(mime: &str) -> Self {
        let essence = mime.split(';').next().unwrap_or("").trim().to_lowercase();
        match essence.as_str() {
            "text/plain" => Self::Txt,
            "text/markdown" | "text/x-markdown" => Self::Markdown,
            "application/pdf" => Self::Pdf,
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                Self::Docx
            }
            _ => Self::Unknown,
        }
    }

    /// Detect file type from filename, falling back to the declared MIME type
    pub fn detect(filename: &str, content_type: Option<&str>) -> Self {
        let from_name = filename
            .rsplit_once('.')
            .map(|(_, ext)| Self::from_extension(ext))
            .unwrap_or(Self::Unknown);

        match (from_name, content_type) {
            (Self::Unknown, Some(mime)) => Self::from_mime(mime),
            (file_type, _) => file_type,
        }
    }

    /// Check if this is a supported file type
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Txt => "Text File",
            Self::Markdown => "Markdown",
            Self::Pdf => "PDF",
            Self::Docx => "Word Document (.docx)",
            Self::Unknown => "Unknown",
        }
    }
}

/// Best-guess language of a document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Language {
    /// ISO 639-3 code, or "unknown"
    pub code: String,
    /// English name, or the code when no name is known
    pub name: String,
}

impl Language {
    pub fn unknown() -> Self {
        Self {
            code: "unknown".to_string(),
            name: "unknown".to_string(),
        }
    }

    pub fn is_known(&self) -> bool {
        self.code != "unknown"
    }
}

/// A decoded document, owned by a session until the next upload replaces it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique document ID
    pub id: Uuid,
    /// Original filename as uploaded by user
    pub filename: String,
    /// Detected file type
    pub file_type: FileType,
    /// Decoded plain text
    pub content: String,
    /// SHA-256 of the decoded text
    pub content_hash: String,
    /// Total number of pages (PDF only)
    pub total_pages: Option<u32>,
    /// Size of the uploaded bytes
    pub file_size: u64,
    /// Detected language
    pub language: Language,
    /// Upload timestamp
    pub uploaded_at: chrono::DateTime<chrono::Utc>,
}

impl Document {
    /// Length of the decoded text in characters
    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }
}

/// A contiguous slice of a document's text, processed as one generation unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Zero-based position in the chunk sequence
    pub index: usize,
    /// Text content
    pub content: String,
    /// Character offsets in the original document
    pub char_start: usize,
    pub char_end: usize,
}

impl Chunk {
    /// One-based number used in diagnostics
    pub fn number(&self) -> usize {
        self.index + 1
    }
}
