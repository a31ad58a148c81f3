//! Todo record, request/response payloads, and the four CRUD handlers.

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::AppState;

/// A single todo row as stored and as served.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: i64,
    pub name: String,
    pub done: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Creation payload. Nothing is required; missing fields take their
/// defaults, an empty name included.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTodo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub done: bool,
}

/// Update payload. Only the fields present in the JSON are applied;
/// omitted fields keep their stored values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTodo {
    pub name: Option<String>,
    pub done: Option<bool>,
}

/// One page of live todos.
#[derive(Debug, Serialize)]
pub struct TodoPage {
    pub page: i64,
    pub limit: i64,
    pub todos: Vec<Todo>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Deleted {
    id: i64,
    deleted_at: DateTime<Utc>,
}

/// Raw `page`/`limit` query values; `normalize` handles the fallbacks.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    page: Option<String>,
    limit: Option<String>,
}

impl ListParams {
    /// `page` falls back to 1 when non-numeric or non-positive. `limit`
    /// falls back to 10 when non-numeric but is otherwise passed through,
    /// zero and negative values included.
    fn normalize(&self) -> (i64, i64) {
        let page = self
            .page
            .as_deref()
            .and_then(|raw| raw.parse::<i64>().ok())
            .filter(|page| *page > 0)
            .unwrap_or(1);
        let limit = self
            .limit
            .as_deref()
            .and_then(|raw| raw.parse::<i64>().ok())
            .unwrap_or(10);
        (page, limit)
    }
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<TodoPage>, ApiError> {
    let (page, limit) = params.normalize();
    let offset = (page - 1).saturating_mul(limit);
    let todos = state.store.list(offset, limit).await?;
    Ok(Json(TodoPage { page, limit, todos }))
}

pub async fn create(State(state): State<AppState>, body: Bytes) -> Result<Json<Todo>, ApiError> {
    let input: CreateTodo =
        serde_json::from_slice(&body).map_err(|err| ApiError::Unprocessable(err.to_string()))?;
    let todo = state.store.create(input).await?;
    Ok(Json(todo))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Todo>, ApiError> {
    let input: UpdateTodo =
        serde_json::from_slice(&body).map_err(|err| ApiError::Unprocessable(err.to_string()))?;
    let todo = state.store.update(&id, input).await?;
    Ok(Json(todo))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let Some(todo) = state.store.find(&id).await? else {
        // No matching row: accepted, nothing to do.
        return Ok(StatusCode::ACCEPTED.into_response());
    };
    let deleted_at = state.store.soft_delete(todo.id).await?;
    Ok(Json(Deleted {
        id: todo.id,
        deleted_at,
    })
    .into_response())
}
