//! Paginated todo CRUD service over a relational store.
//!
//! # Design
//! - `Config` is read from the environment once at startup and passed down;
//!   nothing reads ambient state after that.
//! - `TodoStore` owns the connection pool and is injected into handlers
//!   through `AppState`.
//! - `app` builds the explicit route table and wraps it in the ordered
//!   cross-cutting chain (logging around CORS around the routes); `run`
//!   serves it on a caller-provided listener.

pub mod config;
pub mod error;
pub mod middleware;
pub mod store;
pub mod todos;

use axum::{
    routing::{get, put},
    Router,
};
use tokio::net::TcpListener;

pub use config::Config;
pub use error::ApiError;
pub use store::TodoStore;
pub use todos::{CreateTodo, Todo, TodoPage, UpdateTodo};

/// Shared state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: TodoStore,
    pub config: Config,
}

pub fn app(state: AppState) -> Router {
    // The original framework matched /todo and /todo/ interchangeably;
    // axum does not, so both spellings map to the same handlers.
    Router::new()
        .route("/health", get(health))
        .route("/todo", get(todos::list).post(todos::create))
        .route("/todo/", get(todos::list).post(todos::create))
        .route("/todo/{id}", put(todos::update).delete(todos::remove))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::cors,
        ))
        .layer(axum::middleware::from_fn(middleware::log_requests))
        .with_state(state)
}

pub async fn run(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state)).await
}

async fn health() -> &'static str {
    "ok"
}
