//! Multi-format document decoder

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use regex::Regex;
use sha2::{Digest, Sha256};
use std::sync::OnceLock;

use crate::error::{Error, Result};
use crate::types::FileType;

/// Decoded document text and format metadata
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    /// File type
    pub file_type: FileType,
    /// Extracted text content
    pub content: String,
    /// Content hash
    pub content_hash: String,
    /// Total pages (PDF only)
    pub total_pages: Option<u32>,
    /// Name of the character encoding used for plain text
    pub encoding: Option<&'static str>,
}

/// Multi-format file parser
pub struct FileParser;

impl FileParser {
    /// Parse a file based on its extension, or the declared MIME type when
    /// the extension is not recognised
    pub fn parse(filename: &str, content_type: Option<&str>, data: &[u8]) -> Result<ParsedDocument> {
        let file_type = FileType::detect(filename, content_type);

        tracing::debug!(
            "Decoding {} as {} ({} bytes)",
            filename,
            file_type.display_name(),
            data.len()
        );

        match file_type {
            FileType::Pdf => Self::parse_pdf(filename, data),
            FileType::Docx => Self::parse_docx(filename, data),
            FileType::Markdown => Self::parse_markdown(data),
            FileType::Txt => Self::parse_text(data),
            FileType::Unknown => {
                let extension = filename.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
                Err(Error::UnsupportedFileType(format!(
                    "'{}' - expected .txt, .md, .pdf or .docx",
                    extension
                )))
            }
        }
    }

    /// Parse PDF document
    fn parse_pdf(filename: &str, data: &[u8]) -> Result<ParsedDocument> {
        let content = pdf_extract::extract_text_from_mem(data)
            .map_err(|e| Error::file_parse(filename, e.to_string()))?;

        let total_pages = match lopdf::Document::load_mem(data) {
            Ok(doc) => Some(doc.get_pages().len() as u32),
            Err(_) => None,
        };

        Ok(ParsedDocument {
            file_type: FileType::Pdf,
            content_hash: hash_content(&content),
            content,
            total_pages,
            encoding: None,
        })
    }

    /// Parse DOCX document: one line per paragraph
    fn parse_docx(filename: &str, data: &[u8]) -> Result<ParsedDocument> {
        let doc = docx_rs::read_docx(data)
            .map_err(|e| Error::file_parse(filename, e.to_string()))?;

        let mut paragraphs = Vec::new();

        for child in doc.document.children {
            if let docx_rs::DocumentChild::Paragraph(p) = child {
                let mut text = String::new();
                for child in p.children {
                    if let docx_rs::ParagraphChild::Run(run) = child {
                        for child in run.children {
                            match child {
                                docx_rs::RunChild::Text(t) => text.push_str(&t.text),
                                docx_rs::RunChild::Tab(_) => text.push('\t'),
                                _ => {}
                            }
                        }
                    }
                }
                paragraphs.push(text);
            }
        }

        let content = paragraphs.join("\n");

        Ok(ParsedDocument {
            file_type: FileType::Docx,
            content_hash: hash_content(&content),
            content,
            total_pages: None,
            encoding: None,
        })
    }

    /// Parse markdown: render to HTML, then keep only the text
    fn parse_markdown(data: &[u8]) -> Result<ParsedDocument> {
        let (source, encoding) = decode_text(data);

        let parser = pulldown_cmark::Parser::new(&source);
        let mut html = String::new();
        pulldown_cmark::html::push_html(&mut html, parser);

        let content = strip_html(&html);

        Ok(ParsedDocument {
            file_type: FileType::Markdown,
            content_hash: hash_content(&content),
            content,
            total_pages: None,
            encoding: Some(encoding.name()),
        })
    }

    /// Parse plain text in whatever encoding it arrived in
    fn parse_text(data: &[u8]) -> Result<ParsedDocument> {
        let (content, encoding) = decode_text(data);

        Ok(ParsedDocument {
            file_type: FileType::Txt,
            content_hash: hash_content(&content),
            content,
            total_pages: None,
            encoding: Some(encoding.name()),
        })
    }
}

/// Decode unlabeled bytes: BOM first, then strict UTF-8, then Windows-1252
fn decode_text(data: &[u8]) -> (String, &'static Encoding) {
    if let Some((encoding, bom_len)) = Encoding::for_bom(data) {
        let (text, _) = encoding.decode_without_bom_handling(&data[bom_len..]);
        return (text.into_owned(), encoding);
    }

    if let Ok(text) = std::str::from_utf8(data) {
        return (text.to_string(), UTF_8);
    }

    let (text, _) = WINDOWS_1252.decode_without_bom_handling(data);
    (text.into_owned(), WINDOWS_1252)
}

/// Drop tags from rendered HTML and unescape the entities the renderer emits
fn strip_html(html: &str) -> String {
    static TAG: OnceLock<Regex> = OnceLock::new();
    let tag = TAG.get_or_init(|| Regex::new(r"<[^>]+>").expect("valid tag regex"));

    tag.replace_all(html, "")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Hash content for change detection
fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}
