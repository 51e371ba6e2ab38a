//! Remote-backed todo collection with optimistic mutations.
//!
//! # Design
//! `RemoteTodos` keeps a mirror of the server's collection and speaks the
//! same three intents as the local store. `begin` applies an intent to the
//! mirror right away and hands back the request that realizes it on the
//! server; `settle` feeds the server's answer back in and either confirms
//! the optimistic change or undoes it.
//!
//! Each in-flight mutation records just enough to undo itself (the removed
//! item and its index, the provisional item of an add, the target value of
//! a toggle) instead of a whole snapshot, so settling one mutation never
//! erases the optimistic effect of another.
//!
//! Items added optimistically carry a provisional id until the server
//! assigns the real one. Intents that target a provisional item are refused
//! with `ApiError::Unconfirmed`, since the server cannot address it yet.

use tokio::sync::watch;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::client::TodoClient;
use crate::engine::{Intent, TodoCollection};
use crate::error::{ApiError, IdOverflow};
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::store::TodoSource;
use crate::types::{CreateTodo, TodoId, TodoItem, UpdateTodo};

/// A request the host must execute and then report back through `settle`.
#[derive(Debug, Clone)]
pub struct Mutation {
    pub id: Uuid,
    pub intent: Intent,
    pub request: HttpRequest,
}

#[derive(Debug, Clone)]
enum Pending {
    Add { item: TodoItem },
    Remove { item: TodoItem, index: usize },
    Toggle { id: TodoId, completed: bool },
}

#[derive(Debug)]
pub struct RemoteTodos {
    client: TodoClient,
    mirror: TodoCollection,
    pending: Vec<(Uuid, Pending)>,
    updates: watch::Sender<TodoCollection>,
}

impl RemoteTodos {
    pub fn new(client: TodoClient) -> Self {
        let mirror = TodoCollection::new();
        let (updates, _) = watch::channel(mirror.clone());
        Self {
            client,
            mirror,
            pending: Vec::new(),
            updates,
        }
    }

    pub fn client(&self) -> &TodoClient {
        &self.client
    }

    pub fn collection(&self) -> &TodoCollection {
        &self.mirror
    }

    /// Number of mutations begun but not yet settled or abandoned.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn is_provisional(&self, id: TodoId) -> bool {
        self.provisional_ids().any(|p| p == id)
    }

    pub fn build_load(&self) -> HttpRequest {
        self.client.build_list_todos()
    }

    /// Replace the mirror with the server listing, then re-apply every
    /// mutation still in flight on top of it.
    ///
    /// A listing holding an id with no successor is rejected and the mirror
    /// stays as it was.
    pub fn apply_load(&mut self, response: HttpResponse) -> Result<(), ApiError> {
        let items = self.client.parse_list_todos(response)?;
        let mut mirror = TodoCollection::from_items(items)?;
        let mut replayed = self.pending.clone();
        for (_, pending) in replayed.iter_mut() {
            match pending {
                Pending::Add { item } => {
                    item.id = mirror.issue_id().ok_or(IdOverflow(mirror.next_id()))?;
                    mirror.insert_at(mirror.len(), item.clone())?;
                }
                Pending::Remove { item, .. } => {
                    mirror = mirror.remove(item.id);
                }
                Pending::Toggle { id, completed } => {
                    if mirror.get(*id).is_some_and(|item| item.completed != *completed) {
                        mirror = mirror.toggle_completed(*id);
                    }
                }
            }
        }
        info!(len = mirror.len(), pending = replayed.len(), "loaded remote todos");
        self.pending = replayed;
        self.mirror = mirror;
        self.publish();
        Ok(())
    }

    /// Apply `intent` optimistically and return the request that carries it
    /// to the server. Returns `None` when a remove or toggle targets an id
    /// the mirror does not hold; nothing is sent in that case. An add fails
    /// with `ApiError::IdOverflow` once the mirror has no id left to issue.
    pub fn begin(&mut self, intent: Intent) -> Result<Option<Mutation>, ApiError> {
        if let Some(id) = intent.target() {
            if self.is_provisional(id) {
                return Err(ApiError::Unconfirmed(id));
            }
        }

        let (pending, request, next) = match &intent {
            Intent::Add(title) => {
                let input = CreateTodo {
                    title: title.to_string(),
                    completed: false,
                };
                let request = self.client.build_create_todo(&input)?;
                let provisional = self.mirror.next_id();
                let next = self.mirror.add(title.clone());
                let item = next
                    .get(provisional)
                    .cloned()
                    .ok_or(IdOverflow(provisional))?;
                (Pending::Add { item }, request, next)
            }
            Intent::Remove(id) => {
                let Some(index) = self.mirror.position(*id) else {
                    return Ok(None);
                };
                let item = self.mirror.items()[index].clone();
                let request = self.client.build_delete_todo(*id);
                (Pending::Remove { item, index }, request, self.mirror.remove(*id))
            }
            Intent::ToggleCompleted(id) => {
                let Some(current) = self.mirror.get(*id) else {
                    return Ok(None);
                };
                let completed = !current.completed;
                let request = self
                    .client
                    .build_update_todo(*id, &UpdateTodo::completed(completed))?;
                (
                    Pending::Toggle { id: *id, completed },
                    request,
                    self.mirror.toggle_completed(*id),
                )
            }
        };

        let mutation = Mutation {
            id: Uuid::new_v4(),
            intent,
            request,
        };
        info!(mutation = %mutation.id, intent = ?mutation.intent, "began optimistic mutation");
        self.pending.push((mutation.id, pending));
        self.mirror = next;
        self.publish();
        Ok(Some(mutation))
    }

    /// Reconcile the mirror with the server's answer to `mutation_id`.
    ///
    /// On failure the optimistic change is undone and the error returned so
    /// the caller can flag it. A 404 on delete counts as success: the item
    /// is gone either way.
    pub fn settle(&mut self, mutation_id: Uuid, response: HttpResponse) -> Result<(), ApiError> {
        let pending = self.take_pending(mutation_id)?;
        let outcome = match pending {
            Pending::Add { item } => {
                let confirmed = self
                    .client
                    .parse_create_todo(response)
                    .and_then(|confirmed| self.confirm_add(item.id, confirmed));
                match confirmed {
                    Ok(()) => Ok(()),
                    Err(err) => Err(self.rollback(Pending::Add { item }, err)),
                }
            }
            Pending::Remove { item, index } => match self.client.parse_delete_todo(response) {
                Ok(()) | Err(ApiError::NotFound) => Ok(()),
                Err(err) => Err(self.rollback(Pending::Remove { item, index }, err)),
            },
            Pending::Toggle { id, completed } => {
                let confirmed = self
                    .client
                    .parse_update_todo(response)
                    .and_then(|confirmed| self.mirror.replace(id, confirmed).map_err(ApiError::from));
                match confirmed {
                    Ok(_) => Ok(()),
                    Err(err) => Err(self.rollback(Pending::Toggle { id, completed }, err)),
                }
            }
        };
        debug!(mutation = %mutation_id, ok = outcome.is_ok(), "settled mutation");
        self.publish();
        outcome
    }

    /// Undo `mutation_id` without a server answer, e.g. when the transport
    /// failed to deliver the request.
    pub fn abandon(&mut self, mutation_id: Uuid) -> Result<(), ApiError> {
        let pending = self.take_pending(mutation_id)?;
        warn!(mutation = %mutation_id, "abandoning mutation");
        self.undo(pending);
        self.publish();
        Ok(())
    }

    /// `begin`, execute the request through `transport`, then `settle`.
    pub fn execute<T: Transport>(&mut self, transport: &T, intent: Intent) -> Result<(), ApiError> {
        let Some(mutation) = self.begin(intent)? else {
            return Ok(());
        };
        match transport.execute(mutation.request) {
            Ok(response) => self.settle(mutation.id, response),
            Err(err) => {
                self.abandon(mutation.id)?;
                Err(err.into())
            }
        }
    }

    /// Fetch the server listing through `transport` and load it.
    pub fn refresh<T: Transport>(&mut self, transport: &T) -> Result<(), ApiError> {
        let response = transport.execute(self.build_load())?;
        self.apply_load(response)
    }

    fn take_pending(&mut self, mutation_id: Uuid) -> Result<Pending, ApiError> {
        let index = self
            .pending
            .iter()
            .position(|(id, _)| *id == mutation_id)
            .ok_or(ApiError::UnknownMutation(mutation_id))?;
        Ok(self.pending.remove(index).1)
    }

    /// Swap the provisional item for the server's. Nothing changes when the
    /// server's id cannot be held.
    fn confirm_add(&mut self, provisional: TodoId, confirmed: TodoItem) -> Result<(), ApiError> {
        let server_id = confirmed.id;
        if server_id.next().is_none() {
            return Err(IdOverflow(server_id).into());
        }
        if server_id != provisional && self.mirror.contains(server_id) {
            let colliding = self.pending.iter_mut().find_map(|(_, pending)| match pending {
                Pending::Add { item } if item.id == server_id => Some(item),
                _ => None,
            });
            match colliding {
                Some(other) => {
                    // Another provisional item holds the server's id; move it.
                    other.id = self
                        .mirror
                        .rekey(server_id)
                        .ok_or(IdOverflow(self.mirror.next_id()))?;
                }
                None => {
                    // A reload already brought the confirmed item in.
                    self.mirror = self.mirror.remove(provisional);
                    return Ok(());
                }
            }
        }
        if !self.mirror.replace(provisional, confirmed.clone())? {
            self.mirror.insert_at(self.mirror.len(), confirmed)?;
        }
        Ok(())
    }

    fn rollback(&mut self, pending: Pending, err: ApiError) -> ApiError {
        warn!(error = %err, "remote mutation failed, rolling back");
        self.undo(pending);
        err
    }

    fn undo(&mut self, pending: Pending) {
        match pending {
            Pending::Add { item } => {
                self.mirror = self.mirror.remove(item.id);
            }
            Pending::Remove { item, index } => {
                // The item was held before, so its id always fits.
                if let Err(err) = self.mirror.insert_at(index, item) {
                    warn!(error = %err, "could not restore removed todo");
                }
            }
            Pending::Toggle { id, completed } => {
                if self.mirror.get(id).is_some_and(|item| item.completed == completed) {
                    self.mirror = self.mirror.toggle_completed(id);
                }
            }
        }
    }

    fn provisional_ids(&self) -> impl Iterator<Item = TodoId> + '_ {
        self.pending.iter().filter_map(|(_, pending)| match pending {
            Pending::Add { item } => Some(item.id),
            _ => None,
        })
    }

    fn publish(&self) {
        self.updates.send_replace(self.mirror.clone());
    }
}

impl TodoSource for RemoteTodos {
    fn fetch(&self, id: TodoId) -> Option<TodoItem> {
        self.mirror.get(id).cloned()
    }

    fn snapshot(&self) -> TodoCollection {
        self.mirror.clone()
    }

    fn subscribe(&self) -> watch::Receiver<TodoCollection> {
        self.updates.subscribe()
    }
}
