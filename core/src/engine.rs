//! Pure transition engine over an ordered collection of todo items.
//!
//! # Design
//! Every transition takes `&self` and returns a new `TodoCollection`; nothing
//! is mutated in place and nothing is read from outside the collection. The
//! id counter travels inside the collection, so `Add` is referentially
//! transparent too: the same collection and intent always produce the same
//! result, including the new id.
//!
//! Remove and toggle on an id that is not present return an equal collection.
//! There is no error path; titles are validated when the `Intent` is built.
//! Ids that come from outside (`from_items`, server confirmations) are
//! checked so the counter can always advance.

use crate::error::{IdOverflow, ValidationError};
use crate::types::{Title, TodoId, TodoItem};

/// The only sanctioned mutations of a `TodoCollection`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Add(Title),
    Remove(TodoId),
    ToggleCompleted(TodoId),
}

impl Intent {
    /// Validate `title` and wrap it in an `Add` intent.
    pub fn add(title: &str) -> Result<Intent, ValidationError> {
        Title::new(title).map(Intent::Add)
    }

    /// The item this intent targets, if it targets an existing one.
    pub fn target(&self) -> Option<TodoId> {
        match self {
            Intent::Add(_) => None,
            Intent::Remove(id) | Intent::ToggleCompleted(id) => Some(*id),
        }
    }
}

/// Ordered todo items plus the next id to issue.
///
/// Ids are unique within the collection and `next_id` is strictly greater
/// than every id the collection has issued or been built from. `u64::MAX`
/// is never held, since nothing could follow it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoCollection {
    items: Vec<TodoItem>,
    next_id: TodoId,
}

impl Default for TodoCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl TodoCollection {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            next_id: TodoId(1),
        }
    }

    /// Build a collection from existing items, e.g. a server listing.
    ///
    /// Order is preserved. A repeated id keeps only its first occurrence.
    /// Fails when an id leaves no room to issue another one after it.
    pub fn from_items(items: impl IntoIterator<Item = TodoItem>) -> Result<Self, IdOverflow> {
        let mut collection = Self::new();
        for item in items {
            if collection.contains(item.id) {
                continue;
            }
            collection.bump_next_id(item.id)?;
            collection.items.push(item);
        }
        Ok(collection)
    }

    pub fn apply(&self, intent: &Intent) -> TodoCollection {
        match intent {
            Intent::Add(title) => self.add(title.clone()),
            Intent::Remove(id) => self.remove(*id),
            Intent::ToggleCompleted(id) => self.toggle_completed(*id),
        }
    }

    /// Append a new, not completed item with a fresh id.
    ///
    /// Once the id space is used up the collection comes back unchanged.
    pub fn add(&self, title: Title) -> TodoCollection {
        let mut next = self.clone();
        if let Some(id) = next.issue_id() {
            next.items.push(TodoItem {
                id,
                title: title.into_string(),
                completed: false,
            });
        }
        next
    }

    pub fn remove(&self, id: TodoId) -> TodoCollection {
        let mut next = self.clone();
        next.items.retain(|item| item.id != id);
        next
    }

    pub fn toggle_completed(&self, id: TodoId) -> TodoCollection {
        let mut next = self.clone();
        if let Some(item) = next.items.iter_mut().find(|item| item.id == id) {
            item.completed = !item.completed;
        }
        next
    }

    pub fn get(&self, id: TodoId) -> Option<&TodoItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn contains(&self, id: TodoId) -> bool {
        self.get(id).is_some()
    }

    pub fn position(&self, id: TodoId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TodoItem> {
        self.items.iter()
    }

    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The id the next `add` will assign.
    pub fn next_id(&self) -> TodoId {
        self.next_id
    }

    // In-place helpers for the remote mirror, which reconciles server
    // responses against optimistic state.

    /// Hand out `next_id` and advance the counter. `None` when the counter
    /// cannot advance.
    pub(crate) fn issue_id(&mut self) -> Option<TodoId> {
        let id = self.next_id;
        self.next_id = id.next()?;
        Some(id)
    }

    pub(crate) fn bump_next_id(&mut self, seen: TodoId) -> Result<(), IdOverflow> {
        if seen >= self.next_id {
            self.next_id = seen.next().ok_or(IdOverflow(seen))?;
        }
        Ok(())
    }

    /// Insert `item` at `index` (clamped to the end). Replaces any item that
    /// already has the same id. Leaves the collection untouched on error.
    pub(crate) fn insert_at(&mut self, index: usize, item: TodoItem) -> Result<(), IdOverflow> {
        self.bump_next_id(item.id)?;
        self.items.retain(|existing| existing.id != item.id);
        let index = index.min(self.items.len());
        self.items.insert(index, item);
        Ok(())
    }

    /// Overwrite the item with `id` by `item`, keeping its position.
    /// Returns false when `id` is not present.
    pub(crate) fn replace(&mut self, id: TodoId, item: TodoItem) -> Result<bool, IdOverflow> {
        let Some(index) = self.position(id) else {
            return Ok(false);
        };
        self.bump_next_id(item.id)?;
        self.items.remove(index);
        self.insert_at(index, item)?;
        Ok(true)
    }

    /// Give the item `old` a freshly issued id and return it. `None` when
    /// `old` is absent or no id is left to issue.
    pub(crate) fn rekey(&mut self, old: TodoId) -> Option<TodoId> {
        let index = self.position(old)?;
        let fresh = self.issue_id()?;
        self.items[index].id = fresh;
        Some(fresh)
    }
}

impl<'a> IntoIterator for &'a TodoCollection {
    type Item = &'a TodoItem;
    type IntoIter = std::slice::Iter<'a, TodoItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
