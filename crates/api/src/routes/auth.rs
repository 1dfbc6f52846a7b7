use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;
use site_content_core::auth::SessionToken;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/auth/login", post(login))
}

#[derive(Deserialize)]
struct LoginRequest {
    password: String,
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<SessionToken>> {
    let auth = state.auth().clone();
    // Argon2 verification is CPU-bound; keep it off the async workers.
    let token = tokio::task::spawn_blocking(move || auth.login(&request.password))
        .await
        .map_err(|e| ApiError::Internal(format!("login task failed: {e}")))??;
    Ok(Json(token))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::json;

    use crate::routes::build_router;
    use crate::routes::test_support::{json_body, send, test_state, PASSWORD};

    fn login_request(password: &str) -> Request<Body> {
        Request::post("/v1/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({ "password": password }).to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn correct_password_returns_token() {
        let router = build_router(test_state());
        let response = send(&router, login_request(PASSWORD)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
        assert!(body["expiresAt"].is_string());
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let router = build_router(test_state());
        let response = send(&router, login_request("nope")).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = json_body(response).await;
        assert_eq!(body["error"]["type"], json!("unauthorized"));
    }
}
