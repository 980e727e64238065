//! Task pages and form posts
//!
//! # Endpoints
//!
//! - `GET  /tasks` - List the user's tasks
//! - `GET  /tasks/new` - New task form
//! - `POST /tasks` - Create a task
//! - `GET  /tasks/:id/edit` - Edit form (404 if not the user's task)
//! - `POST /tasks/:id` - Replace every field of a task
//! - `POST /tasks/:id/delete` - Delete a task
//!
//! Updates and deletes aimed at a task the user does not own change nothing
//! and still redirect to `/tasks`, exactly like a missing id.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::Payload,
};
use axum::{
    extract::{Path, State},
    response::{Html, Redirect},
    Extension,
};
use chrono::{DateTime, NaiveDate};
use daybook_shared::{
    auth::context::AuthContext,
    models::task::{Task, TaskFields, TaskPriority, TaskStatus},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};
use validator::Validate;

const TASKS_PATH: &str = "/tasks";

/// Create/update form
///
/// Blank optional fields count as absent.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct TaskForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub priority: Option<String>,

    #[serde(default)]
    pub status: Option<String>,

    /// `YYYY-MM-DD`, or an RFC 3339 timestamp whose date part is kept
    #[serde(default, alias = "dueDate")]
    pub due_date: Option<String>,
}

impl TaskForm {
    /// Validates the form and converts it into stored task fields
    pub fn into_fields(self) -> ApiResult<TaskFields> {
        self.validate()?;

        let priority = match non_blank(self.priority) {
            Some(raw) => raw
                .parse::<TaskPriority>()
                .map_err(|e| ApiError::BadRequest(e.to_string()))?,
            None => TaskPriority::default(),
        };

        let status = match non_blank(self.status) {
            Some(raw) => raw
                .parse::<TaskStatus>()
                .map_err(|e| ApiError::BadRequest(e.to_string()))?,
            None => TaskStatus::default(),
        };

        let due_date = non_blank(self.due_date)
            .map(|raw| parse_due_date(&raw))
            .transpose()?;

        Ok(TaskFields {
            title: self.title,
            description: non_blank(self.description),
            priority,
            status,
            due_date,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_due_date(raw: &str) -> ApiResult<NaiveDate> {
    let raw = raw.trim();

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
        .map_err(|_| ApiError::BadRequest(format!("Invalid due date: {}", raw)))
}

/// Parses a task id path segment
///
/// A segment that is not an `i64` cannot name any task, so it is treated
/// like an id with no matching row.
fn parse_task_id(raw: &str) -> Option<i64> {
    raw.parse().ok()
}

fn form_options() -> serde_json::Value {
    json!({
        "priorities": [TaskPriority::Low, TaskPriority::Medium, TaskPriority::High],
        "statuses": TaskStatus::ALL,
    })
}

/// Lists the user's tasks
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Html<String>> {
    let tasks = Task::list(&state.db, auth.scope()).await?;

    state.render("tasks/index", Some(&auth), json!({ "tasks": tasks }))
}

/// Renders the new task form
pub async fn new_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Html<String>> {
    state.render("tasks/new", Some(&auth), form_options())
}

/// Creates a task and redirects to the list
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Payload(form): Payload<TaskForm>,
) -> ApiResult<Redirect> {
    let fields = form.into_fields()?;
    let task = Task::create(&state.db, auth.scope(), fields).await?;

    info!(user_id = auth.user_id(), task_id = task.id, "Task created");
    Ok(Redirect::to(TASKS_PATH))
}

/// Renders the edit form for one of the user's tasks
pub async fn edit_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(raw_id): Path<String>,
) -> ApiResult<Html<String>> {
    let not_found = || ApiError::NotFound("Not found".to_string());

    let id = parse_task_id(&raw_id).ok_or_else(not_found)?;
    let task = Task::find(&state.db, auth.scope(), id)
        .await?
        .ok_or_else(not_found)?;

    let mut data = form_options();
    data["task"] = json!(task);

    state.render("tasks/edit", Some(&auth), data)
}

/// Replaces every field of one of the user's tasks
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(raw_id): Path<String>,
    Payload(form): Payload<TaskForm>,
) -> ApiResult<Redirect> {
    let fields = form.into_fields()?;

    let Some(id) = parse_task_id(&raw_id) else {
        debug!(user_id = auth.user_id(), task_id = %raw_id, "Update matched no task");
        return Ok(Redirect::to(TASKS_PATH));
    };

    let affected = Task::update(&state.db, auth.scope(), id, fields).await?;

    if affected == 0 {
        debug!(user_id = auth.user_id(), task_id = id, "Update matched no task");
    } else {
        info!(user_id = auth.user_id(), task_id = id, "Task updated");
    }

    Ok(Redirect::to(TASKS_PATH))
}

/// Deletes one of the user's tasks; a no-op if absent
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(raw_id): Path<String>,
) -> ApiResult<Redirect> {
    let Some(id) = parse_task_id(&raw_id) else {
        return Ok(Redirect::to(TASKS_PATH));
    };

    let affected = Task::delete(&state.db, auth.scope(), id).await?;

    if affected > 0 {
        info!(user_id = auth.user_id(), task_id = id, "Task deleted");
    }

    Ok(Redirect::to(TASKS_PATH))
}
