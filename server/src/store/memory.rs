use std::collections::BTreeMap;

use chrono::{TimeDelta, Utc};
use tokio::sync::RwLock;

use super::{StoreResult, TodoStore};
use crate::todo::Todo;

/// Process-local store. Holds everything in a map keyed by id; nothing
/// survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    todos: BTreeMap<i64, Todo>,
    last_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TodoStore for MemoryStore {
    async fn insert(&self, title: String) -> StoreResult<Todo> {
        let mut inner = self.inner.write().await;
        inner.last_id += 1;
        let now = Utc::now();
        let todo = Todo {
            id: inner.last_id,
            title,
            done: false,
            created_at: now,
            updated_at: now,
        };
        inner.todos.insert(todo.id, todo.clone());
        Ok(todo)
    }

    async fn find(&self, id: i64) -> StoreResult<Option<Todo>> {
        Ok(self.inner.read().await.todos.get(&id).cloned())
    }

    async fn save(&self, todo: &Todo) -> StoreResult<Option<Todo>> {
        let mut inner = self.inner.write().await;
        let Some(stored) = inner.todos.get_mut(&todo.id) else {
            return Ok(None);
        };
        stored.title.clone_from(&todo.title);
        stored.done = todo.done;
        stored.updated_at = Utc::now().max(stored.updated_at + TimeDelta::microseconds(1));
        Ok(Some(stored.clone()))
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        Ok(self.inner.write().await.todos.remove(&id).is_some())
    }

    async fn count(&self) -> StoreResult<u64> {
        Ok(self.inner.read().await.todos.len() as u64)
    }

    async fn range(&self, offset: u64, limit: u64) -> StoreResult<Vec<Todo>> {
        let inner = self.inner.read().await;
        let mut todos: Vec<&Todo> = inner.todos.values().collect();
        todos.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(todos
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }
}
