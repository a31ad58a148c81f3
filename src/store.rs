//! SQLite-backed todo store.
//!
//! # Design
//! `TodoStore` owns the connection pool and is the only code that speaks
//! SQL. Soft deletion is a `deleted_at` timestamp; every read scopes to
//! `deleted_at IS NULL`. Path ids arrive as raw strings (the handlers do
//! not validate them) and are parsed at this boundary: a non-numeric id
//! behaves exactly like an id with no matching row.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::todos::{CreateTodo, Todo, UpdateTodo};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS todos (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL DEFAULT '',
    done INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    deleted_at TEXT
)";

#[derive(Clone)]
pub struct TodoStore {
    pool: SqlitePool,
}

impl TodoStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Reconciles the schema against the record shape. Run once at startup.
    pub async fn migrate(&self) -> Result<(), sqlx::Error> {
        sqlx::query(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }

    /// At most `limit` live rows starting at `offset`, ascending id.
    /// Both values are passed through unvalidated; SQLite treats a negative
    /// limit as unlimited and a negative offset as zero.
    pub async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Todo>, sqlx::Error> {
        sqlx::query_as(
            "SELECT id, name, done, created_at, updated_at, deleted_at FROM todos \
             WHERE deleted_at IS NULL ORDER BY id LIMIT ?1 OFFSET ?2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    /// Inserts a row. The store assigns the id and both timestamps; they
    /// carry the identical instant.
    pub async fn create(&self, input: CreateTodo) -> Result<Todo, sqlx::Error> {
        let now = Utc::now();
        sqlx::query_as(
            "INSERT INTO todos (name, done, created_at, updated_at) VALUES (?1, ?2, ?3, ?3) \
             RETURNING id, name, done, created_at, updated_at, deleted_at",
        )
        .bind(input.name)
        .bind(input.done)
        .bind(now)
        .fetch_one(&self.pool)
        .await
    }

    /// The live row matching `id`, if any.
    pub async fn find(&self, id: &str) -> Result<Option<Todo>, sqlx::Error> {
        let Ok(id) = id.parse::<i64>() else {
            return Ok(None);
        };
        sqlx::query_as(
            "SELECT id, name, done, created_at, updated_at, deleted_at FROM todos \
             WHERE id = ?1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Applies the present fields to the live row matching `id` and returns
    /// the resulting record. A payload carrying no fields performs no write.
    /// A missing row surfaces as `RowNotFound`, same as any other failure.
    pub async fn update(&self, id: &str, input: UpdateTodo) -> Result<Todo, sqlx::Error> {
        let id: i64 = id.parse().map_err(|_| sqlx::Error::RowNotFound)?;
        if input.name.is_none() && input.done.is_none() {
            return sqlx::query_as(
                "SELECT id, name, done, created_at, updated_at, deleted_at FROM todos \
                 WHERE id = ?1 AND deleted_at IS NULL",
            )
            .bind(id)
            .fetch_one(&self.pool)
            .await;
        }
        let now = Utc::now();
        sqlx::query_as(
            "UPDATE todos SET name = COALESCE(?1, name), done = COALESCE(?2, done), updated_at = ?3 \
             WHERE id = ?4 AND deleted_at IS NULL \
             RETURNING id, name, done, created_at, updated_at, deleted_at",
        )
        .bind(input.name)
        .bind(input.done)
        .bind(now)
        .bind(id)
        .fetch_one(&self.pool)
        .await
    }

    /// Marks the row deleted and returns the deletion timestamp. The row is
    /// retained and excluded from subsequent reads.
    pub async fn soft_delete(&self, id: i64) -> Result<DateTime<Utc>, sqlx::Error> {
        let now = Utc::now();
        sqlx::query("UPDATE todos SET deleted_at = ?1 WHERE id = ?2")
            .bind(now)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn store() -> TodoStore {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let store = TodoStore::new(pool);
        store.migrate().await.unwrap();
        store
    }

    fn input(name: &str) -> CreateTodo {
        CreateTodo {
            name: name.to_string(),
            done: false,
        }
    }

    #[tokio::test]
    async fn create_assigns_increasing_ids_and_equal_timestamps() {
        let store = store().await;
        let first = store.create(input("first")).await.unwrap();
        let second = store.create(input("second")).await.unwrap();
        assert!(first.id > 0);
        assert!(second.id > first.id);
        assert_eq!(first.created_at, first.updated_at);
        assert!(first.deleted_at.is_none());
    }

    #[tokio::test]
    async fn list_pages_in_insertion_order() {
        let store = store().await;
        for n in 0..5 {
            store.create(input(&format!("todo-{n}"))).await.unwrap();
        }
        let page = store.list(2, 2).await.unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].name, "todo-2");
        assert_eq!(page[1].name, "todo-3");
    }

    #[tokio::test]
    async fn negative_limit_is_tolerated() {
        let store = store().await;
        for n in 0..3 {
            store.create(input(&format!("todo-{n}"))).await.unwrap();
        }
        let rows = store.list(0, -1).await.unwrap();
        assert_eq!(rows.len(), 3);
    }

    #[tokio::test]
    async fn update_applies_only_present_fields() {
        let store = store().await;
        let todo = store.create(input("original")).await.unwrap();
        let updated = store
            .update(
                &todo.id.to_string(),
                UpdateTodo {
                    name: None,
                    done: Some(true),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "original");
        assert!(updated.done);
        assert!(updated.updated_at >= updated.created_at);
    }

    #[tokio::test]
    async fn update_with_empty_payload_returns_row_unchanged() {
        let store = store().await;
        let todo = store.create(input("keep")).await.unwrap();
        let same = store
            .update(&todo.id.to_string(), UpdateTodo::default())
            .await
            .unwrap();
        assert_eq!(same.updated_at, todo.updated_at);
        assert_eq!(same.name, "keep");
    }

    #[tokio::test]
    async fn update_missing_row_is_an_error() {
        let store = store().await;
        let result = store
            .update(
                "999",
                UpdateTodo {
                    name: Some("x".to_string()),
                    done: None,
                },
            )
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn update_non_numeric_id_is_an_error() {
        let store = store().await;
        let result = store
            .update(
                "not-a-number",
                UpdateTodo {
                    name: Some("x".to_string()),
                    done: None,
                },
            )
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn soft_deleted_rows_leave_list_and_lookup() {
        let store = store().await;
        let todo = store.create(input("gone")).await.unwrap();
        store.soft_delete(todo.id).await.unwrap();
        assert!(store.list(0, 10).await.unwrap().is_empty());
        assert!(store.find(&todo.id.to_string()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn find_non_numeric_id_is_none() {
        let store = store().await;
        assert!(store.find("not-a-number").await.unwrap().is_none());
    }
}
