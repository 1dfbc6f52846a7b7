//! Bearer-token extractor for admin-only handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::error::ApiError;
use crate::state::AppState;

/// Proof that the request carries a valid admin session.
///
/// Add it as a handler argument to require login:
///
/// ```ignore
/// async fn handler(_admin: AdminSession, State(state): State<AppState>) { .. }
/// ```
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub session_id: String,
}

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".into()))?;

        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            ApiError::Unauthorized("Invalid Authorization format. Expected: Bearer <token>".into())
        })?;

        let claims = state.auth().check_session(token)?;
        Ok(AdminSession {
            session_id: claims.jti,
        })
    }
}
