//! Bookmark model and database operations
//!
//! A bookmark is a saved link with a title and an optional description.
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE bookmarks (
//!     id INTEGER PRIMARY KEY AUTOINCREMENT,
//!     user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
//!     title TEXT NOT NULL,
//!     url TEXT NOT NULL,
//!     description TEXT,
//!     created_at TEXT NOT NULL
//! );
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use super::OwnerScope;

/// Saved link
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Bookmark {
    /// Unique bookmark ID
    pub id: i64,

    /// Owning user
    pub user_id: i64,

    /// Display title
    pub title: String,

    /// Target URL, stored as entered
    pub url: String,

    /// Optional description
    pub description: Option<String>,

    /// When the bookmark was saved
    pub created_at: DateTime<Utc>,
}

/// Input for creating a bookmark
#[derive(Debug, Clone)]
pub struct CreateBookmark {
    pub title: String,
    pub url: String,
    pub description: Option<String>,
}

impl Bookmark {
    /// Saves a bookmark for `owner`
    pub async fn create(
        pool: &SqlitePool,
        owner: OwnerScope,
        data: CreateBookmark,
    ) -> Result<Self, sqlx::Error> {
        let bookmark = sqlx::query_as::<_, Bookmark>(
            r#"
            INSERT INTO bookmarks (user_id, title, url, description, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, user_id, title, url, description, created_at
            "#,
        )
        .bind(owner.user_id())
        .bind(data.title)
        .bind(data.url)
        .bind(data.description)
        .bind(Utc::now())
        .fetch_one(pool)
        .await?;

        Ok(bookmark)
    }

    /// Lists `owner`'s bookmarks, oldest first
    pub async fn list(pool: &SqlitePool, owner: OwnerScope) -> Result<Vec<Self>, sqlx::Error> {
        let bookmarks = sqlx::query_as::<_, Bookmark>(
            r#"
            SELECT id, user_id, title, url, description, created_at
            FROM bookmarks
            WHERE user_id = ?
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(owner.user_id())
        .fetch_all(pool)
        .await?;

        Ok(bookmarks)
    }

    /// Bookmarks whose title, description or url contains `needle`
    ///
    /// Matching is literal and case-sensitive. A missing description never
    /// matches.
    pub async fn search(
        pool: &SqlitePool,
        owner: OwnerScope,
        needle: &str,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let bookmarks = sqlx::query_as::<_, Bookmark>(
            r#"
            SELECT id, user_id, title, url, description, created_at
            FROM bookmarks
            WHERE user_id = ?1
              AND (instr(title, ?2) > 0 OR instr(description, ?2) > 0 OR instr(url, ?2) > 0)
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(owner.user_id())
        .bind(needle)
        .fetch_all(pool)
        .await?;

        Ok(bookmarks)
    }
}
