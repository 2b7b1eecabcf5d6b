//! Session lifecycle endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::Result;
use crate::server::state::AppState;
use crate::session::SessionSummary;

/// POST /api/sessions - Create a session
pub async fn create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SessionSummary>)> {
    let summary = state.sessions().create()?;
    Ok((StatusCode::CREATED, Json(summary)))
}

/// GET /api/sessions/:id - Session state and conversation history
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSummary>> {
    Ok(Json(state.sessions().summary(id)?))
}

/// DELETE /api/sessions/:id - Destroy a session
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.sessions().remove(id)?;
    Ok(StatusCode::NO_CONTENT)
}
