//! Database models for Daybook
//!
//! This module contains all database models and their operations.
//!
//! # Models
//!
//! - `user`: User accounts and credentials
//! - `session`: Server-side sessions referenced by the session cookie
//! - `task`: Tasks with priority, status and optional due date
//! - `note`: Free-form notes
//! - `bookmark`: Saved links
//! - `event`: Calendar events
//!
//! # Ownership
//!
//! Tasks, notes, bookmarks and events belong to exactly one user. Every
//! operation on them takes an [`OwnerScope`] and binds its user id into the
//! statement, so there is no query path that reads or writes another user's
//! rows.
//!
//! # Example
//!
//! ```no_run
//! use daybook_shared::models::task::Task;
//! use daybook_shared::models::user::{CreateUser, User};
//! use sqlx::SqlitePool;
//!
//! # async fn example(pool: SqlitePool) -> Result<(), sqlx::Error> {
//! let user = User::create(&pool, CreateUser {
//!     email: "user@example.com".to_string(),
//!     password_hash: "$argon2id$...".to_string(),
//! }).await?;
//!
//! let tasks = Task::list(&pool, user.scope()).await?;
//! # Ok(())
//! # }
//! ```

pub mod user;
pub mod session;
pub mod task;
pub mod note;
pub mod bookmark;
pub mod event;

/// Owner filter applied to every record operation
///
/// Obtained from an authenticated request (`AuthContext::scope`) or from a
/// loaded [`user::User`]; the user id is private so a scope cannot be forged
/// from request input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerScope {
    user_id: i64,
}

impl OwnerScope {
    pub(crate) fn new(user_id: i64) -> Self {
        Self { user_id }
    }

    /// The owning user's id
    pub fn user_id(&self) -> i64 {
        self.user_id
    }
}
