use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use site_content_core::history::HistoryEntry;
use site_content_core::ContentDocument;

use crate::error::{ApiError, ApiResult};
use crate::middleware::admin::AdminSession;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/history", get(list_history))
        .route("/v1/history/{index}/restore", post(restore))
}

/// Snapshots, newest first.
async fn list_history(_admin: AdminSession, State(state): State<AppState>) -> Json<Vec<HistoryEntry>> {
    Json(state.engine().get_history())
}

/// Return a snapshot for the editor to load. The client decides whether to save it.
async fn restore(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> ApiResult<Json<ContentDocument>> {
    state
        .engine()
        .restore_from_history(index)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("no history entry at index {index}")))
}
