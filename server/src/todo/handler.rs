//! Request handlers for `/api/todos`.
//!
//! Each handler validates its input, performs one or two store calls, and
//! maps the outcome onto a status code. Handlers share nothing but the
//! injected store.

use std::collections::HashMap;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};

use super::{CreateTodoRequest, Pagination, Todo, TodoPage, UpdateTodoRequest};
use crate::{error::ApiError, state::AppState, store::TodoStore};

/// `GET /api/todos?page=&page_size=`
pub async fn list<S: TodoStore>(
    State(state): State<AppState<S>>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<TodoPage>, ApiError> {
    let pagination = Pagination::from_query(&query);

    let total = state.store.count().await.map_err(ApiError::Query)?;
    let list = state
        .store
        .range(pagination.offset(), pagination.page_size)
        .await
        .map_err(ApiError::Query)?;

    Ok(Json(TodoPage {
        list,
        page: pagination.page,
        page_size: pagination.page_size,
        total,
        total_page: pagination.total_pages(total),
    }))
}

/// `POST /api/todos` with `{"title": ...}`
pub async fn create<S: TodoStore>(
    State(state): State<AppState<S>>,
    payload: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let Json(input) = payload?;
    if !input.is_valid() {
        return Err(ApiError::InvalidPayload);
    }

    let todo = state
        .store
        .insert(input.title)
        .await
        .map_err(ApiError::Create)?;
    tracing::debug!(id = todo.id, "created todo");
    Ok((StatusCode::CREATED, Json(todo)))
}

/// `PATCH /api/todos/{id}` with `{"title"?: ..., "done"?: ...}`
pub async fn update<S: TodoStore>(
    State(state): State<AppState<S>>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<UpdateTodoRequest>, JsonRejection>,
) -> Result<Json<Todo>, ApiError> {
    let id = path_id(path)?;
    let Json(changes) = payload?;
    if !changes.is_valid() {
        return Err(ApiError::InvalidPayload);
    }

    let mut todo = state
        .store
        .find(id)
        .await
        .map_err(ApiError::Query)?
        .ok_or(ApiError::NotFound)?;
    todo.apply(changes);

    // The merged record is written in one statement; a concurrent delete
    // between lookup and save surfaces as not found.
    let saved = state
        .store
        .save(&todo)
        .await
        .map_err(ApiError::Update)?
        .ok_or(ApiError::NotFound)?;
    tracing::debug!(id, done = saved.done, "updated todo");
    Ok(Json(saved))
}

/// `DELETE /api/todos/{id}`. Succeeds whether or not the record existed.
pub async fn delete<S: TodoStore>(
    State(state): State<AppState<S>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let id = path_id(path)?;
    let removed = state.store.delete(id).await.map_err(ApiError::Delete)?;
    tracing::debug!(id, removed, "deleted todo");
    Ok(StatusCode::NO_CONTENT)
}

/// A segment axum cannot decode (e.g. invalid UTF-8) is just another bad id.
fn path_id(path: Result<Path<String>, PathRejection>) -> Result<i64, ApiError> {
    let Path(raw_id) = path.map_err(|rejection| {
        tracing::debug!(%rejection, "rejected path");
        ApiError::InvalidId
    })?;
    parse_id(&raw_id)
}

/// Identifiers are unsigned decimal integers greater than zero.
fn parse_id(raw: &str) -> Result<i64, ApiError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ApiError::InvalidId);
    }
    raw.parse::<i64>()
        .ok()
        .filter(|&id| id > 0)
        .ok_or(ApiError::InvalidId)
}
