//! Task model and database operations
//!
//! Tasks are the main record kind. Every operation is owner-scoped: the
//! owner's id is part of each `WHERE` clause, so an update or delete aimed at
//! another user's task simply matches zero rows.
//!
//! # Ordering
//!
//! Listings are ordered by status (`TODO`, `IN_PROGRESS`, `DONE`), then
//! priority from high to low, then creation time, then id.
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE tasks (
//!     id INTEGER PRIMARY KEY AUTOINCREMENT,
//!     user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
//!     title TEXT NOT NULL,
//!     description TEXT,
//!     priority INTEGER NOT NULL DEFAULT 1,
//!     status TEXT NOT NULL DEFAULT 'TODO',
//!     due_date TEXT,
//!     created_at TEXT NOT NULL
//! );
//! ```
//!
//! # Example
//!
//! ```no_run
//! use daybook_shared::models::task::{Task, TaskFields, TaskPriority, TaskStatus};
//! use daybook_shared::models::OwnerScope;
//! use sqlx::SqlitePool;
//!
//! # async fn example(pool: SqlitePool, owner: OwnerScope) -> Result<(), sqlx::Error> {
//! let task = Task::create(&pool, owner, TaskFields {
//!     title: "Write report".to_string(),
//!     description: None,
//!     priority: TaskPriority::High,
//!     status: TaskStatus::Todo,
//!     due_date: None,
//! }).await?;
//!
//! let tasks = Task::list(&pool, owner).await?;
//! assert!(tasks.iter().any(|t| t.id == task.id));
//! # Ok(())
//! # }
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::{fmt, str::FromStr};

use super::OwnerScope;

const TASK_COLUMNS: &str =
    "id, user_id, title, description, priority, status, due_date, created_at";

const LIST_ORDER: &str = "CASE status WHEN 'TODO' THEN 0 WHEN 'IN_PROGRESS' THEN 1 ELSE 2 END ASC, \
     priority DESC, created_at ASC, id ASC";

/// Task workflow status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Not started
    #[default]
    Todo,

    /// Being worked on
    InProgress,

    /// Finished
    Done,
}

impl TaskStatus {
    /// All statuses in list order
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done];

    /// Stored representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "TODO",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Done => "DONE",
        }
    }
}

/// Task priority; higher sorts first
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[repr(i32)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskPriority {
    Low = 0,
    #[default]
    Medium = 1,
    High = 2,
}

impl TaskPriority {
    /// Form/display representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "LOW",
            TaskPriority::Medium => "MEDIUM",
            TaskPriority::High => "HIGH",
        }
    }
}

/// Unrecognized status or priority value
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown {kind}: {value}")]
pub struct ParseTaskFieldError {
    kind: &'static str,
    value: String,
}

impl FromStr for TaskStatus {
    type Err = ParseTaskFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace(['-', ' '], "_").as_str() {
            "TODO" => Ok(TaskStatus::Todo),
            "IN_PROGRESS" => Ok(TaskStatus::InProgress),
            "DONE" => Ok(TaskStatus::Done),
            _ => Err(ParseTaskFieldError {
                kind: "status",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for TaskPriority {
    type Err = ParseTaskFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LOW" | "0" => Ok(TaskPriority::Low),
            "MEDIUM" | "1" => Ok(TaskPriority::Medium),
            "HIGH" | "2" => Ok(TaskPriority::High),
            _ => Err(ParseTaskFieldError {
                kind: "priority",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task owned by a single user
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: i64,

    /// Owning user
    pub user_id: i64,

    /// Short title
    pub title: String,

    /// Optional longer description
    pub description: Option<String>,

    /// Priority
    pub priority: TaskPriority,

    /// Workflow status
    pub status: TaskStatus,

    /// Optional due date
    pub due_date: Option<NaiveDate>,

    /// When the task was created
    pub created_at: DateTime<Utc>,
}

/// Every user-editable task field
///
/// Used for both creation and full-field updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFields {
    pub title: String,
    pub description: Option<String>,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub due_date: Option<NaiveDate>,
}

/// Number of tasks per status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub todo: i64,
    pub in_progress: i64,
    pub done: i64,
}

impl StatusCounts {
    /// Total across statuses
    pub fn total(&self) -> i64 {
        self.todo + self.in_progress + self.done
    }
}

impl Task {
    /// Whether the task still needs work
    pub fn is_open(&self) -> bool {
        self.status != TaskStatus::Done
    }

    /// Whether the task is due on or before `today`
    pub fn is_due_by(&self, today: NaiveDate) -> bool {
        self.due_date.is_some_and(|due| due <= today)
    }

    /// Open task that is high priority or due by `today`
    pub fn needs_focus(&self, today: NaiveDate) -> bool {
        self.is_open() && (self.priority == TaskPriority::High || self.is_due_by(today))
    }

    /// Creates a task owned by `owner`
    pub async fn create(
        pool: &SqlitePool,
        owner: OwnerScope,
        fields: TaskFields,
    ) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            INSERT INTO tasks (user_id, title, description, priority, status, due_date, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(owner.user_id())
        .bind(fields.title)
        .bind(fields.description)
        .bind(fields.priority)
        .bind(fields.status)
        .bind(fields.due_date)
        .bind(Utc::now())
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Lists every task owned by `owner` in list order
    pub async fn list(pool: &SqlitePool, owner: OwnerScope) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = ? ORDER BY {LIST_ORDER}"
        ))
        .bind(owner.user_id())
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Finds a task by id among `owner`'s tasks
    pub async fn find(
        pool: &SqlitePool,
        owner: OwnerScope,
        id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = ? AND user_id = ?"
        ))
        .bind(id)
        .bind(owner.user_id())
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Replaces every editable field of `owner`'s task `id`
    ///
    /// Returns the number of rows affected. Zero means the id does not exist
    /// or belongs to someone else; callers cannot tell which.
    pub async fn update(
        pool: &SqlitePool,
        owner: OwnerScope,
        id: i64,
        fields: TaskFields,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET title = ?, description = ?, priority = ?, status = ?, due_date = ?
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(fields.title)
        .bind(fields.description)
        .bind(fields.priority)
        .bind(fields.status)
        .bind(fields.due_date)
        .bind(id)
        .bind(owner.user_id())
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Deletes `owner`'s task `id`, returning the number of rows removed
    pub async fn delete(pool: &SqlitePool, owner: OwnerScope, id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(owner.user_id())
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Tasks whose title or description contains `needle` (case-sensitive)
    pub async fn search(
        pool: &SqlitePool,
        owner: OwnerScope,
        needle: &str,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            r#"
            SELECT {TASK_COLUMNS}
            FROM tasks
            WHERE user_id = ?1
              AND (instr(title, ?2) > 0 OR instr(description, ?2) > 0)
            ORDER BY created_at ASC, id ASC
            "#
        ))
        .bind(owner.user_id())
        .bind(needle)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Counts `owner`'s tasks per status
    pub async fn count_by_status(
        pool: &SqlitePool,
        owner: OwnerScope,
    ) -> Result<StatusCounts, sqlx::Error> {
        let rows: Vec<(TaskStatus, i64)> = sqlx::query_as(
            "SELECT status, COUNT(*) FROM tasks WHERE user_id = ? GROUP BY status",
        )
        .bind(owner.user_id())
        .fetch_all(pool)
        .await?;

        let mut counts = StatusCounts::default();
        for (status, count) in rows {
            match status {
                TaskStatus::Todo => counts.todo = count,
                TaskStatus::InProgress => counts.in_progress = count,
                TaskStatus::Done => counts.done = count,
            }
        }

        Ok(counts)
    }
}

/// Open tasks bucketed by due date for the planning view
#[derive(Debug, Clone, Default, Serialize)]
pub struct Plan {
    pub overdue: Vec<Task>,
    pub today: Vec<Task>,
    pub upcoming: Vec<Task>,
    pub unscheduled: Vec<Task>,
}

impl Plan {
    /// Buckets the open tasks of `tasks`, keeping their relative order
    pub fn build(tasks: Vec<Task>, today: NaiveDate) -> Self {
        let mut plan = Plan::default();

        for task in tasks.into_iter().filter(Task::is_open) {
            match task.due_date {
                None => plan.unscheduled.push(task),
                Some(due) if due < today => plan.overdue.push(task),
                Some(due) if due == today => plan.today.push(task),
                Some(_) => plan.upcoming.push(task),
            }
        }

        plan
    }
}
