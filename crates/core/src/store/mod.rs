//! Storage adapters owned by the engine.
//!
//! `local` is synchronous and always present; `remote` is async and optional.

pub mod cache;
pub mod local;
pub mod postgres;
pub mod remote;

pub use cache::LocalContent;
pub use local::{FileLocalStore, LocalStore, MemoryLocalStore, StoreError};
pub use postgres::PgRemoteStore;
pub use remote::{MemoryRemoteStore, RemoteError, RemoteRow, RemoteStore};
