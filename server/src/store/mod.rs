//! Persistence for todo records.
//!
//! # Design
//! `TodoStore` is the single seam between the handlers and durable state.
//! Each operation is one round-trip and is atomic on its own; there are no
//! multi-statement transactions. Implementations must keep `updated_at`
//! strictly increasing across saves and never modify `created_at`.

mod memory;
mod postgres;

use std::future::Future;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use crate::todo::Todo;

/// Failures reported by a store backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

pub trait TodoStore: Send + Sync + 'static {
    /// Persist a new, not-done todo; the store assigns `id` and both
    /// timestamps.
    fn insert(&self, title: String) -> impl Future<Output = StoreResult<Todo>> + Send;

    fn find(&self, id: i64) -> impl Future<Output = StoreResult<Option<Todo>>> + Send;

    /// Write back `title` and `done` of an existing record and refresh
    /// `updated_at`. `None` if no record has `todo.id`.
    fn save(&self, todo: &Todo) -> impl Future<Output = StoreResult<Option<Todo>>> + Send;

    /// Hard delete. Returns whether a record was removed.
    fn delete(&self, id: i64) -> impl Future<Output = StoreResult<bool>> + Send;

    fn count(&self) -> impl Future<Output = StoreResult<u64>> + Send;

    /// Up to `limit` records after skipping `offset`, newest first.
    fn range(&self, offset: u64, limit: u64)
        -> impl Future<Output = StoreResult<Vec<Todo>>> + Send;
}
