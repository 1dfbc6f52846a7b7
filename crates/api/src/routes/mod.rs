pub mod auth;
pub mod backup;
pub mod content;
pub mod health;
pub mod history;

use axum::Router;

use crate::state::AppState;

/// Assemble the full router with all route groups.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(content::routes())
        .merge(history::routes())
        .merge(backup::routes())
        .with_state(state)
}
