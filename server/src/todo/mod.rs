//! The todo entity, its request/response payloads, and the handlers that
//! map HTTP requests onto store operations.

pub mod handler;
pub mod model;
pub mod pagination;

pub use model::{CreateTodoRequest, Todo, TodoPage, UpdateTodoRequest, TITLE_MAX_CHARS};
pub use pagination::{Pagination, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
