//! Explicit state container for a local todo collection.
//!
//! # Design
//! The store is an ordinary value the application owns and passes around,
//! not a process-wide singleton. It starts empty, lives as long as its owner
//! and publishes every changed snapshot on a `watch` channel so renderers
//! can subscribe without holding a borrow of the store.

use tokio::sync::watch;
use tracing::debug;

use crate::engine::{Intent, TodoCollection};
use crate::types::{TodoId, TodoItem};

/// Read side shared by the local store and the remote adapter, so
/// presentation code can treat either as the source of its rows.
pub trait TodoSource {
    fn fetch(&self, id: TodoId) -> Option<TodoItem>;

    fn snapshot(&self) -> TodoCollection;

    /// Receive every snapshot published from now on. The receiver starts
    /// out holding the current one.
    fn subscribe(&self) -> watch::Receiver<TodoCollection>;
}

/// Local reducer-style store.
#[derive(Debug)]
pub struct TodoStore {
    state: TodoCollection,
    updates: watch::Sender<TodoCollection>,
}

impl Default for TodoStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TodoStore {
    pub fn new() -> Self {
        Self::with_collection(TodoCollection::new())
    }

    pub fn with_collection(state: TodoCollection) -> Self {
        let (updates, _) = watch::channel(state.clone());
        Self { state, updates }
    }

    pub fn state(&self) -> &TodoCollection {
        &self.state
    }

    /// Apply `intent` and publish the result. Returns whether the collection
    /// changed; no-op intents publish nothing.
    pub fn dispatch(&mut self, intent: Intent) -> bool {
        let next = self.state.apply(&intent);
        if next == self.state {
            debug!(?intent, "intent left the collection unchanged");
            return false;
        }
        debug!(?intent, len = next.len(), "dispatched intent");
        self.state = next;
        self.updates.send_replace(self.state.clone());
        true
    }
}

impl TodoSource for TodoStore {
    fn fetch(&self, id: TodoId) -> Option<TodoItem> {
        self.state.get(id).cloned()
    }

    fn snapshot(&self) -> TodoCollection {
        self.state.clone()
    }

    fn subscribe(&self) -> watch::Receiver<TodoCollection> {
        self.updates.subscribe()
    }
}
