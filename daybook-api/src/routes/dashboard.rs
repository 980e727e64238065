//! Dashboard views over the user's tasks
//!
//! "Today" is the current UTC date.

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, response::Html, Extension};
use chrono::Utc;
use daybook_shared::{
    auth::context::AuthContext,
    models::task::{Plan, Task},
};
use serde_json::json;

/// `GET /`: per-status task counts
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Html<String>> {
    let counts = Task::count_by_status(&state.db, auth.scope()).await?;

    state.render(
        "dashboard",
        Some(&auth),
        json!({ "counts": counts, "total": counts.total() }),
    )
}

/// `GET /plan`: open tasks bucketed by due date
pub async fn plan(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Html<String>> {
    let today = Utc::now().date_naive();
    let tasks = Task::list(&state.db, auth.scope()).await?;
    let plan = Plan::build(tasks, today);

    state.render(
        "plan",
        Some(&auth),
        json!({
            "date": today,
            "overdue": plan.overdue,
            "today": plan.today,
            "upcoming": plan.upcoming,
            "unscheduled": plan.unscheduled,
        }),
    )
}

/// `GET /focus`: open tasks that are high priority or due by today
pub async fn focus(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Html<String>> {
    let today = Utc::now().date_naive();
    let tasks: Vec<Task> = Task::list(&state.db, auth.scope())
        .await?
        .into_iter()
        .filter(|task| task.needs_focus(today))
        .collect();

    state.render("focus", Some(&auth), json!({ "date": today, "tasks": tasks }))
}
