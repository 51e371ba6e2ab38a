//! Error types for the todo core.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers frequently distinguish
//! "the resource does not exist" from "the server returned an unexpected
//! status." All other non-2xx responses land in `Http` with the raw status
//! code and body for debugging. Transitions themselves have no errors;
//! `ValidationError` is raised before an intent reaches the engine, and
//! `IdOverflow` guards ids that arrive from outside it.

use thiserror::Error;
use uuid::Uuid;

use crate::types::TodoId;

/// Rejected user input, caught before an intent is dispatched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("title must not be empty")]
    EmptyTitle,
}

/// An id with no successor in the id space. A collection holding it could
/// never issue a fresh id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("todo id {0} leaves no room for another id")]
pub struct IdOverflow(pub TodoId);

/// The host's transport failed to produce a response at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("transport failed: {0}")]
pub struct TransportError(pub String);

/// Errors returned by the API clients and the remote adapter.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404: the requested todo does not exist.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The intent targets an item the server has not assigned an id to yet.
    #[error("todo {0} is not confirmed by the server yet")]
    Unconfirmed(TodoId),

    #[error(transparent)]
    IdOverflow(#[from] IdOverflow),

    /// `settle` was called with an id that `begin` never issued or that was
    /// already settled.
    #[error("unknown mutation {0}")]
    UnknownMutation(Uuid),
}

/// Failure recorded in a `FetchState`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("invalid JSON: {0}")]
    Json(String),
}
