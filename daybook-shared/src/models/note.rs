//! Note model and database operations
//!
//! ```sql
//! CREATE TABLE notes (
//!     id INTEGER PRIMARY KEY AUTOINCREMENT,
//!     user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
//!     title TEXT NOT NULL,
//!     content TEXT NOT NULL DEFAULT '',
//!     created_at TEXT NOT NULL
//! );
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use super::OwnerScope;

/// Free-form note
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Note {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a note
#[derive(Debug, Clone)]
pub struct CreateNote {
    pub title: String,
    pub content: String,
}

impl Note {
    pub async fn create(
        pool: &SqlitePool,
        owner: OwnerScope,
        data: CreateNote,
    ) -> Result<Self, sqlx::Error> {
        let note = sqlx::query_as::<_, Note>(
            r#"
            INSERT INTO notes (user_id, title, content, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, user_id, title, content, created_at
            "#,
        )
        .bind(owner.user_id())
        .bind(data.title)
        .bind(data.content)
        .bind(Utc::now())
        .fetch_one(pool)
        .await?;

        Ok(note)
    }

    /// Lists `owner`'s notes, oldest first
    pub async fn list(pool: &SqlitePool, owner: OwnerScope) -> Result<Vec<Self>, sqlx::Error> {
        let notes = sqlx::query_as::<_, Note>(
            r#"
            SELECT id, user_id, title, content, created_at
            FROM notes
            WHERE user_id = ?
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(owner.user_id())
        .fetch_all(pool)
        .await?;

        Ok(notes)
    }

    /// Notes whose title or content contains `needle` (case-sensitive)
    pub async fn search(
        pool: &SqlitePool,
        owner: OwnerScope,
        needle: &str,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let notes = sqlx::query_as::<_, Note>(
            r#"
            SELECT id, user_id, title, content, created_at
            FROM notes
            WHERE user_id = ?1
              AND (instr(title, ?2) > 0 OR instr(content, ?2) > 0)
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(owner.user_id())
        .bind(needle)
        .fetch_all(pool)
        .await?;

        Ok(notes)
    }
}
