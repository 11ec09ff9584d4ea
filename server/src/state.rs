use std::sync::Arc;

use crate::store::TodoStore;

/// Shared state handed to every handler: the store handle and the
/// environment identifier reported by the health check.
pub struct AppState<S> {
    pub store: Arc<S>,
    pub env: Arc<str>,
}

impl<S: TodoStore> AppState<S> {
    pub fn new(store: S, env: impl Into<String>) -> Self {
        Self {
            store: Arc::new(store),
            env: Arc::from(env.into()),
        }
    }
}

// Manual impl: deriving would demand `S: Clone`.
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            env: Arc::clone(&self.env),
        }
    }
}
