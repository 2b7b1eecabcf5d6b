//! API routes for the docXmart server

pub mod documents;
pub mod sessions;
pub mod submit;
pub mod tasks;

use axum::{
    extract::{DefaultBodyLimit, State},
    routing::{get, post},
    Json, Router,
};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        // Sessions
        .route("/sessions", post(sessions::create_session))
        .route(
            "/sessions/:id",
            get(sessions::get_session).delete(sessions::delete_session),
        )
        // Upload - with larger body limit for file uploads
        .route(
            "/sessions/:id/document",
            post(documents::upload_document).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        // Submission
        .route("/sessions/:id/submit", post(submit::submit))
        .route("/sessions/:id/submit/stream", post(submit::submit_stream))
        // Task menu
        .route("/tasks", get(tasks::list_tasks))
        .route("/info", get(info))
}

/// API info endpoint
async fn info(State(state): State<AppState>) -> Json<serde_json::Value> {
    let config = state.config();

    Json(serde_json::json!({
        "name": "docxmart",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Run curated LLM tasks over uploaded documents, chunk by chunk",
        "generator": {
            "backend": state.generator().name(),
            "model": state.generator().model(),
        },
        "limits": {
            "max_chunk_chars": config.chunking.max_chunk_chars,
            "max_upload_size": config.server.max_upload_size,
            "max_sessions": config.sessions.max_sessions,
        },
        "supported_formats": ["txt", "md", "pdf", "docx"],
        "endpoints": {
            "POST /api/sessions": "Create a session",
            "GET /api/sessions/:id": "Session state and history",
            "DELETE /api/sessions/:id": "Destroy a session",
            "POST /api/sessions/:id/document": "Upload a document (multipart)",
            "POST /api/sessions/:id/submit": "Run a task over the document",
            "POST /api/sessions/:id/submit/stream": "Run a task with SSE progress",
            "GET /api/tasks": "Task menu and target languages"
        }
    }))
}
