use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde_json::{json, Value};
use site_content_core::document::seo::{meta_tags, structured_data};
use site_content_core::document::validate::{seo_warnings, validate_document};
use site_content_core::events::SaveOutcome;
use site_content_core::ContentDocument;

use crate::middleware::admin::AdminSession;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/content", get(get_content).put(save_content))
        .route("/v1/content/draft", put(save_draft))
        .route("/v1/content/seo", get(seo_head))
        .route("/v1/content/diagnostics", get(diagnostics))
}

/// The authoritative document, for the public site.
async fn get_content(State(state): State<AppState>) -> Json<ContentDocument> {
    Json(state.engine().load().await)
}

/// Save immediately and report how far the write got.
async fn save_content(
    admin: AdminSession,
    State(state): State<AppState>,
    Json(document): Json<ContentDocument>,
) -> Json<SaveOutcome> {
    tracing::info!(session = %admin.session_id, "Saving content");
    Json(state.engine().save(&document).await)
}

/// Editor keystroke saves. Coalesced; the outcome arrives on the event bus.
async fn save_draft(
    _admin: AdminSession,
    State(state): State<AppState>,
    Json(document): Json<ContentDocument>,
) -> (StatusCode, Json<Value>) {
    let engine = state.engine();
    drop(engine.save_debounced(document));
    (
        StatusCode::ACCEPTED,
        Json(json!({
            "status": "scheduled",
            "delayMs": engine.config().debounce.as_millis() as u64,
        })),
    )
}

/// Head tags and JSON-LD for the public page, from the current SEO settings.
async fn seo_head(State(state): State<AppState>) -> Json<Value> {
    let seo = state.engine().load_local().seo;
    Json(json!({
        "head": meta_tags(&seo),
        "structuredData": structured_data(&seo),
    }))
}

/// Advisory checks on the current document. Never blocks a save.
async fn diagnostics(_admin: AdminSession, State(state): State<AppState>) -> Json<Value> {
    let document = state.engine().load_local();
    let issues: Vec<String> = validate_document(&document)
        .iter()
        .map(ToString::to_string)
        .collect();
    let seo: Vec<String> = seo_warnings(&document.seo)
        .iter()
        .map(ToString::to_string)
        .collect();
    Json(json!({ "issues": issues, "seo": seo }))
}
