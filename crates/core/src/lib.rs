//! Site content store.
//!
//! Persists the single site [`ContentDocument`](document::model::ContentDocument)
//! to a synchronous local key-value store, mirrors it to an optional remote
//! table, keeps a short snapshot history, and reconciles the copies on load.

pub mod auth;
pub mod backup;
pub mod document;
pub mod engine;
pub mod error;
pub mod events;
pub mod history;
pub mod store;

pub use document::model::ContentDocument;
pub use engine::{ContentEngine, EngineConfig};
pub use error::ContentError;
