//! Record and payload shapes for the todo API.
//!
//! # Design
//! `UpdateTodoRequest` keeps one `Option` per field so an absent field is
//! distinguishable from a present one; absent fields leave the stored value
//! untouched. Title length is counted in characters, not bytes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Longest title accepted on create and update.
pub const TITLE_MAX_CHARS: usize = 200;

/// A persisted todo item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub done: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    /// Overwrite the fields present in `changes`, leaving the rest as-is.
    pub fn apply(&mut self, changes: UpdateTodoRequest) {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(done) = changes.done {
            self.done = done;
        }
    }
}

/// Body of `POST /api/todos`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateTodoRequest {
    pub title: String,
}

impl CreateTodoRequest {
    pub fn is_valid(&self) -> bool {
        is_valid_title(&self.title)
    }
}

/// Body of `PATCH /api/todos/{id}`. Only the fields present in the JSON are
/// applied; `null` counts as absent.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UpdateTodoRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub done: Option<bool>,
}

impl UpdateTodoRequest {
    pub fn is_valid(&self) -> bool {
        self.title.as_deref().map_or(true, is_valid_title)
    }
}

/// One page of the list endpoint.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TodoPage {
    pub list: Vec<Todo>,
    pub page: u64,
    pub page_size: u64,
    pub total: u64,
    pub total_page: u64,
}

fn is_valid_title(title: &str) -> bool {
    let len = title.chars().count();
    (1..=TITLE_MAX_CHARS).contains(&len)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Todo {
        let at = DateTime::parse_from_rfc3339("2024-05-01T08:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        Todo {
            id: 7,
            title: "Buy milk".to_string(),
            done: false,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn todo_serializes_to_json() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["title"], "Buy milk");
        assert_eq!(json["done"], false);
        assert_eq!(json["created_at"], "2024-05-01T08:30:00Z");
        assert_eq!(json["updated_at"], "2024-05-01T08:30:00Z");
    }

    #[test]
    fn create_request_rejects_missing_title() {
        let result: Result<CreateTodoRequest, _> = serde_json::from_str(r#"{"done":true}"#);
        assert!(result.is_err());
    }

    #[test]
    fn title_length_bounds() {
        let at = |n: usize| CreateTodoRequest { title: "x".repeat(n) };
        assert!(!at(0).is_valid());
        assert!(at(1).is_valid());
        assert!(at(TITLE_MAX_CHARS).is_valid());
        assert!(!at(TITLE_MAX_CHARS + 1).is_valid());
    }

    #[test]
    fn title_length_counts_characters() {
        let title = "é".repeat(TITLE_MAX_CHARS);
        assert!(title.len() > TITLE_MAX_CHARS);
        assert!(CreateTodoRequest { title }.is_valid());
    }

    #[test]
    fn update_request_all_fields_optional() {
        let input: UpdateTodoRequest = serde_json::from_str("{}").unwrap();
        assert!(input.title.is_none());
        assert!(input.done.is_none());
        assert!(input.is_valid());
    }

    #[test]
    fn update_request_null_is_absent() {
        let input: UpdateTodoRequest =
            serde_json::from_str(r#"{"title":null,"done":null}"#).unwrap();
        assert!(input.title.is_none());
        assert!(input.done.is_none());
    }

    #[test]
    fn update_request_rejects_empty_title() {
        let input: UpdateTodoRequest = serde_json::from_str(r#"{"title":""}"#).unwrap();
        assert!(!input.is_valid());
    }

    #[test]
    fn apply_only_touches_present_fields() {
        let mut todo = sample();
        todo.apply(UpdateTodoRequest {
            title: None,
            done: Some(true),
        });
        assert_eq!(todo.title, "Buy milk");
        assert!(todo.done);

        todo.apply(UpdateTodoRequest {
            title: Some("Buy oat milk".to_string()),
            done: None,
        });
        assert_eq!(todo.title, "Buy oat milk");
        assert!(todo.done);
    }
}
