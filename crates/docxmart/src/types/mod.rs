//! Core types shared across docXmart

pub mod conversation;
pub mod document;
pub mod query;
pub mod response;

pub use conversation::{ChatMessage, MessageRole};
pub use document::{Chunk, Document, FileType, Language};
pub use query::SubmitRequest;
pub use response::{SubmitResponse, UploadResponse};
