use tower_http::limit::RequestBodyLimitLayer;

/// Cap request bodies; backup uploads are the largest legitimate payload.
pub fn body_limit_layer(max_bytes: usize) -> RequestBodyLimitLayer {
    RequestBodyLimitLayer::new(max_bytes)
}
