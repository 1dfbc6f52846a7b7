use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::state::AppState;

/// Health check routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/v1/ping", get(ping))
}

/// Store status without touching the remote.
async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let engine = state.engine();
    Json(json!({
        "status": "ok",
        "remote": if engine.remote_enabled() { "configured" } else { "disabled" },
        "dataSource": engine.data_source(),
        "hasUserData": engine.has_user_data(),
        "subscribers": engine.events().subscriber_count(),
    }))
}

/// Lightweight ping.
async fn ping() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::json;

    use crate::routes::build_router;
    use crate::routes::test_support::{json_body, send, test_state};

    #[tokio::test]
    async fn health_reports_local_only_defaults() {
        let router = build_router(test_state());
        let response = send(&router, Request::get("/health").body(Body::empty()).unwrap()).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["remote"], json!("disabled"));
        assert_eq!(body["dataSource"], json!("default"));
        assert_eq!(body["hasUserData"], json!(false));
    }
}
