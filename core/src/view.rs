//! View models for rendering a todo list. No business logic lives here
//! beyond rejecting blank form input.

use crate::engine::Intent;
use crate::store::TodoSource;
use crate::types::{TodoId, TodoItem};

pub const TITLE_CLASS: &str = "todo-title";
pub const TITLE_THROUGH_CLASS: &str = "todo-title todo-title--through";

/// One rendered row: a checkbox, the title and a remove button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoRow {
    pub id: TodoId,
    pub title: String,
    pub checked: bool,
    pub title_class: &'static str,
}

impl TodoRow {
    pub fn from_item(item: &TodoItem) -> Self {
        Self {
            id: item.id,
            title: item.title.clone(),
            checked: item.completed,
            title_class: if item.completed {
                TITLE_THROUGH_CLASS
            } else {
                TITLE_CLASS
            },
        }
    }

    /// Intent for a click on the checkbox.
    pub fn on_toggle(&self) -> Intent {
        Intent::ToggleCompleted(self.id)
    }

    /// Intent for a click on the remove button.
    pub fn on_remove(&self) -> Intent {
        Intent::Remove(self.id)
    }
}

pub fn rows<S: TodoSource + ?Sized>(source: &S) -> Vec<TodoRow> {
    source.snapshot().iter().map(TodoRow::from_item).collect()
}

/// Intent for submitting the add form, or `None` for blank input.
pub fn submit_title(input: &str) -> Option<Intent> {
    Intent::add(input).ok()
}

/// Label of a packing-list entry; packed entries get a check mark.
pub fn packing_label(name: &str, packed: bool) -> String {
    if packed {
        format!("{name} ✔")
    } else {
        name.to_string()
    }
}
