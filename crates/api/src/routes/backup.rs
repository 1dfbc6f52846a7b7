use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use site_content_core::events::SaveOutcome;

use crate::error::ApiResult;
use crate::middleware::admin::AdminSession;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/backup", get(download).post(upload))
        // The outer RequestBodyLimitLayer bounds uploads instead.
        .layer(DefaultBodyLimit::disable())
}

/// Download the current document as a backup file.
async fn download(_admin: AdminSession, State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let file = state.engine().export_backup().await?;
    let disposition = format!("attachment; filename=\"{}\"", file.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.contents,
    ))
}

/// Restore from an uploaded backup (enveloped or bare document).
async fn upload(
    _admin: AdminSession,
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<SaveOutcome>> {
    let outcome = state.engine().import_backup(&body).await?;
    Ok(Json(outcome))
}
