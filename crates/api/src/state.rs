use std::sync::Arc;

use site_content_core::auth::AdminAuth;
use site_content_core::ContentEngine;

/// Shared application state, passed to all handlers via Axum's `State` extractor.
/// Wrapped in `Arc` so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    engine: Arc<ContentEngine>,
    auth: AdminAuth,
}

impl AppState {
    pub fn new(engine: Arc<ContentEngine>, auth: AdminAuth) -> Self {
        Self {
            inner: Arc::new(InnerState { engine, auth }),
        }
    }

    pub fn engine(&self) -> &Arc<ContentEngine> {
        &self.inner.engine
    }

    pub fn auth(&self) -> &AdminAuth {
        &self.inner.auth
    }
}
