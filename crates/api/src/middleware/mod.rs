pub mod admin;
pub mod body_limit;
pub mod cors;
pub mod request_tracing;
