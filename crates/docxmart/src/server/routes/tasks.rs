//! Task menu endpoint

use axum::{extract::State, Json};

use crate::generation::TaskCatalog;
use crate::server::state::AppState;

/// GET /api/tasks - Task categories and translation targets
pub async fn list_tasks(State(state): State<AppState>) -> Json<TaskCatalog> {
    Json(state.catalog().clone())
}
