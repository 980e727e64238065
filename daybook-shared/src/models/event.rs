//! Calendar event model and database operations
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE events (
//!     id INTEGER PRIMARY KEY AUTOINCREMENT,
//!     user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
//!     title TEXT NOT NULL,
//!     description TEXT,
//!     starts_at TEXT NOT NULL,
//!     ends_at TEXT,
//!     created_at TEXT NOT NULL
//! );
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use super::OwnerScope;

/// Calendar event
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Event {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,

    /// Start instant
    pub starts_at: DateTime<Utc>,

    /// Optional end instant; open-ended when absent
    pub ends_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
}

/// Input for creating an event
#[derive(Debug, Clone)]
pub struct CreateEvent {
    pub title: String,
    pub description: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
}

impl Event {
    pub async fn create(
        pool: &SqlitePool,
        owner: OwnerScope,
        data: CreateEvent,
    ) -> Result<Self, sqlx::Error> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (user_id, title, description, starts_at, ends_at, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id, user_id, title, description, starts_at, ends_at, created_at
            "#,
        )
        .bind(owner.user_id())
        .bind(data.title)
        .bind(data.description)
        .bind(data.starts_at)
        .bind(data.ends_at)
        .bind(Utc::now())
        .fetch_one(pool)
        .await?;

        Ok(event)
    }

    /// Lists `owner`'s events by start time
    pub async fn list(pool: &SqlitePool, owner: OwnerScope) -> Result<Vec<Self>, sqlx::Error> {
        let events = sqlx::query_as::<_, Event>(
            r#"
            SELECT id, user_id, title, description, starts_at, ends_at, created_at
            FROM events
            WHERE user_id = ?
            ORDER BY starts_at ASC, id ASC
            "#,
        )
        .bind(owner.user_id())
        .fetch_all(pool)
        .await?;

        Ok(events)
    }

    /// Events whose title or description contains `needle` (case-sensitive)
    pub async fn search(
        pool: &SqlitePool,
        owner: OwnerScope,
        needle: &str,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let events = sqlx::query_as::<_, Event>(
            r#"
            SELECT id, user_id, title, description, starts_at, ends_at, created_at
            FROM events
            WHERE user_id = ?1
              AND (instr(title, ?2) > 0 OR instr(description, ?2) > 0)
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(owner.user_id())
        .bind(needle)
        .fetch_all(pool)
        .await?;

        Ok(events)
    }
}
