//! Domain types shared by the engine, the store and the remote adapter.
//!
//! # Design
//! Wire DTOs mirror the mock-server's schema but are defined independently;
//! the integration tests catch schema drift between the two crates.
//! `Title` can only be built through validation, which is how empty titles
//! are kept out of the engine without the engine having an error path.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Identifier of a todo item. Stable for the item's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(pub u64);

impl TodoId {
    pub fn get(self) -> u64 {
        self.0
    }

    /// The following id, or `None` at the top of the id space.
    pub(crate) fn next(self) -> Option<TodoId> {
        self.0.checked_add(1).map(TodoId)
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TodoId {
    fn from(value: u64) -> Self {
        TodoId(value)
    }
}

/// Title text that is non-empty after trimming. The text itself is kept
/// exactly as given.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Title(String);

impl Title {
    /// Reject `raw` if nothing is left once whitespace is trimmed.
    pub fn new(raw: &str) -> Result<Self, ValidationError> {
        if raw.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        Ok(Title(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single todo item, locally or as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoItem {
    pub id: TodoId,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

/// Request payload for creating a new todo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTodo {
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

/// Request payload for updating an existing todo. Only the fields present in
/// the JSON are applied; omitted fields remain unchanged on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTodo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl UpdateTodo {
    pub fn completed(completed: bool) -> Self {
        Self {
            title: None,
            completed: Some(completed),
        }
    }
}

/// A character record from the `/character` listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Character {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub species: String,
    #[serde(default)]
    pub image: String,
}

/// Paging metadata attached to paginated listings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageInfo {
    pub count: u64,
    pub pages: u64,
    pub next: Option<String>,
    pub prev: Option<String>,
}

/// Envelope of paginated listings. Either part may be missing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResponseData<T> {
    #[serde(default)]
    pub info: Option<PageInfo>,
    #[serde(default)]
    pub results: Option<T>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_keeps_surrounding_whitespace() {
        let title = Title::new("  Buy milk \n").unwrap();
        assert_eq!(title.as_str(), "  Buy milk \n");
    }

    #[test]
    fn blank_title_is_rejected() {
        assert_eq!(Title::new("").unwrap_err(), ValidationError::EmptyTitle);
        assert_eq!(Title::new(" \t ").unwrap_err(), ValidationError::EmptyTitle);
    }

    #[test]
    fn todo_id_next_stops_at_the_top() {
        assert_eq!(TodoId(41).next(), Some(TodoId(42)));
        assert_eq!(TodoId(u64::MAX).next(), None);
    }

    #[test]
    fn todo_id_serializes_as_number() {
        let item = TodoItem {
            id: TodoId(7),
            title: "Test".to_string(),
            completed: false,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["title"], "Test");
        assert_eq!(json["completed"], false);
    }

    #[test]
    fn todo_item_completed_defaults_to_false() {
        let item: TodoItem = serde_json::from_str(r#"{"id":1,"title":"x"}"#).unwrap();
        assert!(!item.completed);
    }

    #[test]
    fn update_todo_skips_absent_fields() {
        let json = serde_json::to_value(UpdateTodo::completed(true)).unwrap();
        assert_eq!(json["completed"], true);
        assert!(json.get("title").is_none());
    }

    #[test]
    fn response_data_tolerates_missing_results() {
        let data: ResponseData<Vec<Character>> = serde_json::from_str("{}").unwrap();
        assert!(data.info.is_none());
        assert!(data.results.is_none());
    }
}
