pub mod config;

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;

pub use config::{ConfigError, ServerConfig};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Todo {
    pub id: u64,
    pub title: String,
    pub completed: bool,
}

#[derive(Deserialize)]
pub struct CreateTodo {
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Deserialize)]
pub struct UpdateTodo {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Character {
    pub id: u64,
    pub name: String,
    pub status: String,
    pub species: String,
    pub image: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PageInfo {
    pub count: u64,
    pub pages: u64,
    pub next: Option<String>,
    pub prev: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Page<T> {
    pub info: PageInfo,
    pub results: T,
}

/// Todos keyed by id; ids only grow, so key order is insertion order.
#[derive(Debug)]
pub struct Table {
    next_id: u64,
    todos: BTreeMap<u64, Todo>,
}

impl Default for Table {
    fn default() -> Self {
        Self {
            next_id: 1,
            todos: BTreeMap::new(),
        }
    }
}

pub type Db = Arc<RwLock<Table>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Table::default()));
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{id}", get(get_todo).put(update_todo).delete(delete_todo))
        .route("/character", get(list_characters))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock server listening");
    }
    axum::serve(listener, app()).await
}

async fn list_todos(State(db): State<Db>) -> Json<Vec<Todo>> {
    let table = db.read().await;
    Json(table.todos.values().cloned().collect())
}

async fn create_todo(
    State(db): State<Db>,
    Json(input): Json<CreateTodo>,
) -> Result<(StatusCode, Json<Todo>), StatusCode> {
    if input.title.trim().is_empty() {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }
    let mut table = db.write().await;
    let todo = Todo {
        id: table.next_id,
        title: input.title,
        completed: input.completed,
    };
    table.next_id += 1;
    table.todos.insert(todo.id, todo.clone());
    info!(id = todo.id, "created todo");
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn get_todo(
    State(db): State<Db>,
    Path(id): Path<u64>,
) -> Result<Json<Todo>, StatusCode> {
    let table = db.read().await;
    table.todos.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_todo(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<UpdateTodo>,
) -> Result<Json<Todo>, StatusCode> {
    let mut table = db.write().await;
    let todo = table.todos.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(title) = input.title {
        if title.trim().is_empty() {
            return Err(StatusCode::UNPROCESSABLE_ENTITY);
        }
        todo.title = title;
    }
    if let Some(completed) = input.completed {
        todo.completed = completed;
    }
    info!(id, completed = todo.completed, "updated todo");
    Ok(Json(todo.clone()))
}

async fn delete_todo(
    State(db): State<Db>,
    Path(id): Path<u64>,
) -> Result<StatusCode, StatusCode> {
    let mut table = db.write().await;
    let removed = table.todos.remove(&id);
    if removed.is_some() {
        info!(id, "deleted todo");
    }
    removed.map(|_| StatusCode::NO_CONTENT).ok_or(StatusCode::NOT_FOUND)
}

async fn list_characters() -> Json<Page<Vec<Character>>> {
    let results = seed_characters();
    Json(Page {
        info: PageInfo {
            count: results.len() as u64,
            pages: 1,
            next: None,
            prev: None,
        },
        results,
    })
}

fn seed_characters() -> Vec<Character> {
    [
        (1, "Rick Sanchez", "Alive", "Human"),
        (2, "Morty Smith", "Alive", "Human"),
        (3, "Summer Smith", "Alive", "Human"),
    ]
    .into_iter()
    .map(|(id, name, status, species)| Character {
        id,
        name: name.to_string(),
        status: status.to_string(),
        species: species.to_string(),
        image: format!("/character/avatar/{id}.jpeg"),
    })
    .collect()
}
