//! Submission endpoints

use axum::{
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::Stream;
use std::convert::Infallible;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio_stream::{wrappers::UnboundedReceiverStream, StreamExt};
use uuid::Uuid;

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::{SubmitRequest, SubmitResponse};

/// POST /api/sessions/:id/submit - Run a task and return the whole transcript
pub async fn submit(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<SubmitRequest>,
) -> Result<Json<SubmitResponse>> {
    let start = Instant::now();

    let submission = state.runner().prepare(session_id, &request)?;
    let assembly = state.runner().run(submission).await?;

    Ok(Json(SubmitResponse::new(
        session_id,
        assembly,
        start.elapsed().as_millis() as u64,
    )))
}

/// POST /api/sessions/:id/submit/stream - Run a task, streaming progress as SSE
///
/// Events: `progress` (transcript so far), `chunk_error`, then one `done`.
/// Validation errors are returned as plain HTTP errors before the stream opens.
pub async fn submit_stream(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<SubmitRequest>,
) -> Result<Sse<impl Stream<Item = std::result::Result<Event, Infallible>>>> {
    let submission = state.runner().prepare(session_id, &request)?;

    let (tx, rx) = mpsc::unbounded_channel();
    state.runner().spawn(submission, Some(tx));

    let stream = UnboundedReceiverStream::new(rx).filter_map(move |event| {
        match Event::default().event(event.event_name()).json_data(&event) {
            Ok(sse) => Some(Ok(sse)),
            Err(e) => {
                tracing::warn!("Session {}: SSE serialization error: {}", session_id, e);
                None
            }
        }
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default().interval(Duration::from_secs(15))))
}
