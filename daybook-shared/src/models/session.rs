//! Session model and database operations
//!
//! A session binds an opaque identifier to a user and an expiry instant. It
//! is created at signup or login, deleted at logout, and never renewed. A
//! session past its expiry is treated as absent, and expiry is checked on
//! every lookup rather than cached.
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE sessions (
//!     id BLOB PRIMARY KEY NOT NULL,
//!     user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
//!     expires_at TEXT NOT NULL,
//!     created_at TEXT NOT NULL
//! );
//! ```

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

/// Lifetime of a newly issued session, in days
pub const SESSION_TTL_DAYS: i64 = 7;

/// Lifetime of a newly issued session
pub fn session_ttl() -> Duration {
    Duration::days(SESSION_TTL_DAYS)
}

/// Server-side session record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Session {
    /// Opaque session identifier (UUID v4)
    pub id: Uuid,

    /// Owning user
    pub user_id: i64,

    /// Instant after which the session no longer authenticates
    pub expires_at: DateTime<Utc>,

    /// When the session was issued
    pub created_at: DateTime<Utc>,
}

/// Session joined with the owning user's email
///
/// Only produced by lookups, so an identity built from it always refers to
/// a stored session.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SessionWithUser {
    pub(crate) id: Uuid,
    pub(crate) user_id: i64,
    pub(crate) expires_at: DateTime<Utc>,
    pub(crate) email: String,
}

impl SessionWithUser {
    /// Session identifier
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Owning user
    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    /// Owning user's email
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Session expiry
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// A session is valid only while its expiry is strictly in the future
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

impl Session {
    /// Issues a new session for `user_id` expiring [`session_ttl`] from now
    pub async fn create(pool: &SqlitePool, user_id: i64) -> Result<Self, sqlx::Error> {
        let now = Utc::now();
        Self::create_with_expiry(pool, user_id, now + session_ttl()).await
    }

    /// Issues a new session with an explicit expiry instant
    pub async fn create_with_expiry(
        pool: &SqlitePool,
        user_id: i64,
        expires_at: DateTime<Utc>,
    ) -> Result<Self, sqlx::Error> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (id, user_id, expires_at, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, user_id, expires_at, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(expires_at)
        .bind(Utc::now())
        .fetch_one(pool)
        .await?;

        debug!(user_id, session_id = %session.id, "Session issued");
        Ok(session)
    }

    /// Looks up a session and its user, regardless of expiry
    pub async fn find_with_user(
        pool: &SqlitePool,
        id: Uuid,
    ) -> Result<Option<SessionWithUser>, sqlx::Error> {
        let session = sqlx::query_as::<_, SessionWithUser>(
            r#"
            SELECT s.id, s.user_id, s.expires_at, u.email
            FROM sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(session)
    }

    /// Resolves a session id to its user if the session exists and is unexpired
    pub async fn find_valid(
        pool: &SqlitePool,
        id: Uuid,
    ) -> Result<Option<SessionWithUser>, sqlx::Error> {
        let now = Utc::now();
        let session = Self::find_with_user(pool, id).await?;

        Ok(session.filter(|s| s.is_valid_at(now)))
    }

    /// Deletes a session
    ///
    /// Returns true if a row was removed.
    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts sessions belonging to a user, expired ones included
    pub async fn count_for_user(pool: &SqlitePool, user_id: i64) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sessions WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}
