use tower_http::cors::{Any, CorsLayer};

/// The admin UI is served from another origin, so allow any origin.
/// Admin routes are still gated by the bearer session token.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}
