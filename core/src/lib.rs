//! Todo state core: transition engine, store and remote adapter.
//!
//! # Overview
//! An ordered collection of todo items changes only through three intents:
//! Add, Remove and ToggleCompleted. `TodoCollection` applies them as pure
//! functions; `TodoStore` holds a local collection and publishes snapshots;
//! `RemoteTodos` mirrors a server collection and applies the same intents
//! optimistically while their requests are in flight.
//!
//! # Design
//! - The engine is total and side-effect free. Input validation happens
//!   when an `Intent` is built, not inside the engine.
//! - Network access follows the host-does-IO pattern: clients build
//!   `HttpRequest` values and parse `HttpResponse` values; the host executes
//!   them, directly or through a `Transport` it lends to the core.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod characters;
pub mod client;
pub mod engine;
pub mod error;
pub mod fetch;
pub mod http;
pub mod remote;
pub mod store;
pub mod types;
pub mod view;

pub use characters::CharacterClient;
pub use client::TodoClient;
pub use engine::{Intent, TodoCollection};
pub use error::{ApiError, FetchError, IdOverflow, TransportError, ValidationError};
pub use fetch::{fetch_json, FetchState};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use remote::{Mutation, RemoteTodos};
pub use store::{TodoSource, TodoStore};
pub use types::{Character, CreateTodo, PageInfo, ResponseData, Title, TodoId, TodoItem, UpdateTodo};
