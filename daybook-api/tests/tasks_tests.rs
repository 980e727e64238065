//! Task CRUD and dashboard tests

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::*;
use daybook_shared::models::{
    task::{Task, TaskPriority, TaskStatus},
    user::User,
};

async fn tasks_of(ctx: &TestContext, email: &str) -> Vec<Task> {
    let user = User::find_by_email(&ctx.db, email).await.unwrap().unwrap();
    Task::list(&ctx.db, user.scope()).await.unwrap()
}

fn titles(data: &serde_json::Value, key: &str) -> Vec<String> {
    data[key]
        .as_array()
        .unwrap()
        .iter()
        .map(|task| task["title"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_create_task_with_defaults() {
    let ctx = TestContext::new().await.unwrap();
    let cookie = ctx.signup("alice@example.com").await;

    let response = ctx
        .post_form("/tasks", "title=Write+report", Some(&cookie))
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/tasks"));

    let tasks = tasks_of(&ctx, "alice@example.com").await;
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "Write report");
    assert_eq!(tasks[0].priority, TaskPriority::Medium);
    assert_eq!(tasks[0].status, TaskStatus::Todo);
    assert_eq!(tasks[0].description, None);
    assert_eq!(tasks[0].due_date, None);
}

#[tokio::test]
async fn test_create_task_with_all_fields() {
    let ctx = TestContext::new().await.unwrap();
    let cookie = ctx.signup("alice@example.com").await;

    ctx.create_task(
        &cookie,
        "title=Ship&description=Cut+the+release&priority=high&status=in-progress&dueDate=2025-03-01",
    )
    .await;

    let tasks = tasks_of(&ctx, "alice@example.com").await;
    assert_eq!(tasks[0].description.as_deref(), Some("Cut the release"));
    assert_eq!(tasks[0].priority, TaskPriority::High);
    assert_eq!(tasks[0].status, TaskStatus::InProgress);
    assert_eq!(tasks[0].due_date.unwrap().to_string(), "2025-03-01");
}

#[tokio::test]
async fn test_create_task_rejects_invalid_input() {
    let ctx = TestContext::new().await.unwrap();
    let cookie = ctx.signup("alice@example.com").await;

    let response = ctx.post_form("/tasks", "title=", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_string(response).await, "Title is required");

    let response = ctx
        .post_form("/tasks", "title=Ok&priority=URGENT", Some(&cookie))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = ctx
        .post_form("/tasks", "title=Ok&status=BLOCKED", Some(&cookie))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = ctx
        .post_form("/tasks", "title=Ok&due_date=tomorrow", Some(&cookie))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert!(tasks_of(&ctx, "alice@example.com").await.is_empty());
}

#[tokio::test]
async fn test_task_list_is_ordered_and_scoped() {
    let ctx = TestContext::new().await.unwrap();
    let alice = ctx.signup("alice@example.com").await;
    let bob = ctx.signup("bob@example.com").await;

    ctx.create_task(&alice, "title=Done+high&priority=HIGH&status=DONE").await;
    ctx.create_task(&alice, "title=Todo+low&priority=LOW").await;
    ctx.create_task(&alice, "title=Doing&status=IN_PROGRESS").await;
    ctx.create_task(&alice, "title=Todo+high&priority=HIGH").await;
    ctx.create_task(&bob, "title=Bob+task").await;

    let data = ctx.view("/tasks", &alice).await;
    assert_eq!(
        titles(&data, "tasks"),
        vec!["Todo high", "Todo low", "Doing", "Done high"]
    );

    let data = ctx.view("/tasks", &bob).await;
    assert_eq!(titles(&data, "tasks"), vec!["Bob task"]);
}

#[tokio::test]
async fn test_new_and_edit_forms() {
    let ctx = TestContext::new().await.unwrap();
    let cookie = ctx.signup("alice@example.com").await;
    ctx.create_task(&cookie, "title=Edit+me").await;
    let task = &tasks_of(&ctx, "alice@example.com").await[0];

    let data = ctx.view("/tasks/new", &cookie).await;
    assert_eq!(data["priorities"], serde_json::json!(["LOW", "MEDIUM", "HIGH"]));
    assert_eq!(data["statuses"], serde_json::json!(["TODO", "IN_PROGRESS", "DONE"]));

    let data = ctx.view(&format!("/tasks/{}/edit", task.id), &cookie).await;
    assert_eq!(data["task"]["title"], "Edit me");
    assert_eq!(data["task"]["id"], task.id);
}

#[tokio::test]
async fn test_edit_other_users_task_is_not_found() {
    let ctx = TestContext::new().await.unwrap();
    let alice = ctx.signup("alice@example.com").await;
    let bob = ctx.signup("bob@example.com").await;
    ctx.create_task(&alice, "title=Private").await;
    let task = &tasks_of(&ctx, "alice@example.com").await[0];

    let response = ctx
        .get(&format!("/tasks/{}/edit", task.id), Some(&bob))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_string(response).await, "Not found");

    let response = ctx.get("/tasks/9999/edit", Some(&alice)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unparsable_task_id_matches_no_task() {
    let ctx = TestContext::new().await.unwrap();
    let cookie = ctx.signup("alice@example.com").await;
    ctx.create_task(&cookie, "title=Keep+me").await;

    for id in ["abc", "1.5", "99999999999999999999"] {
        let response = ctx.get(&format!("/tasks/{}/edit", id), Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "edit {}", id);
        assert_eq!(body_string(response).await, "Not found");

        let response = ctx
            .post_form(&format!("/tasks/{}", id), "title=Changed", Some(&cookie))
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "update {}", id);
        assert_eq!(location(&response), Some("/tasks"));

        let response = ctx
            .post_form(&format!("/tasks/{}/delete", id), "", Some(&cookie))
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "delete {}", id);
        assert_eq!(location(&response), Some("/tasks"));
    }

    let tasks = tasks_of(&ctx, "alice@example.com").await;
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "Keep me");
}

#[tokio::test]
async fn test_task_json_and_untyped_bodies() {
    let ctx = TestContext::new().await.unwrap();
    let cookie = ctx.signup("alice@example.com").await;

    let response = ctx
        .post_json(
            "/tasks",
            serde_json::json!({ "title": "From JSON", "priority": "HIGH", "dueDate": "2025-03-01" }),
            Some(&cookie),
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/tasks"));

    let response = ctx
        .post_untyped("/tasks", "title=Untyped", Some(&cookie))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = ctx
        .post_json("/tasks", serde_json::json!({ "title": "" }), Some(&cookie))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_string(response).await, "Title is required");

    let tasks = tasks_of(&ctx, "alice@example.com").await;
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].title, "From JSON");
    assert_eq!(tasks[0].priority, TaskPriority::High);
    assert_eq!(tasks[0].due_date.unwrap().to_string(), "2025-03-01");
    assert_eq!(tasks[1].title, "Untyped");
}

#[tokio::test]
async fn test_update_task_replaces_fields() {
    let ctx = TestContext::new().await.unwrap();
    let cookie = ctx.signup("alice@example.com").await;
    ctx.create_task(&cookie, "title=Draft&description=Old&dueDate=2025-01-01")
        .await;
    let task = tasks_of(&ctx, "alice@example.com").await.remove(0);

    let response = ctx
        .post_form(
            &format!("/tasks/{}", task.id),
            "title=Final&priority=LOW&status=DONE",
            Some(&cookie),
        )
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/tasks"));

    let updated = tasks_of(&ctx, "alice@example.com").await.remove(0);
    assert_eq!(updated.id, task.id);
    assert_eq!(updated.title, "Final");
    assert_eq!(updated.priority, TaskPriority::Low);
    assert_eq!(updated.status, TaskStatus::Done);
    // Omitted optional fields are cleared
    assert_eq!(updated.description, None);
    assert_eq!(updated.due_date, None);
    assert_eq!(updated.created_at, task.created_at);
}

#[tokio::test]
async fn test_cross_user_update_and_delete_change_nothing() {
    let ctx = TestContext::new().await.unwrap();
    let alice = ctx.signup("alice@example.com").await;
    let bob = ctx.signup("bob@example.com").await;
    ctx.create_task(&alice, "title=Mine").await;
    let task = tasks_of(&ctx, "alice@example.com").await.remove(0);

    let response = ctx
        .post_form(&format!("/tasks/{}", task.id), "title=Hijacked", Some(&bob))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/tasks"));

    let response = ctx
        .post_form(&format!("/tasks/{}/delete", task.id), "", Some(&bob))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/tasks"));

    let tasks = tasks_of(&ctx, "alice@example.com").await;
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "Mine");
    assert!(tasks_of(&ctx, "bob@example.com").await.is_empty());
}

#[tokio::test]
async fn test_delete_task() {
    let ctx = TestContext::new().await.unwrap();
    let cookie = ctx.signup("alice@example.com").await;
    ctx.create_task(&cookie, "title=Temporary").await;
    let task = tasks_of(&ctx, "alice@example.com").await.remove(0);

    let response = ctx
        .post_form(&format!("/tasks/{}/delete", task.id), "", Some(&cookie))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(tasks_of(&ctx, "alice@example.com").await.is_empty());

    // Deleting again is a no-op
    let response = ctx
        .post_form(&format!("/tasks/{}/delete", task.id), "", Some(&cookie))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_dashboard_counts() {
    let ctx = TestContext::new().await.unwrap();
    let cookie = ctx.signup("alice@example.com").await;
    ctx.create_task(&cookie, "title=A").await;
    ctx.create_task(&cookie, "title=B").await;
    ctx.create_task(&cookie, "title=C&status=IN_PROGRESS").await;
    ctx.create_task(&cookie, "title=D&status=DONE").await;

    let other = ctx.signup("bob@example.com").await;
    ctx.create_task(&other, "title=E").await;

    let data = ctx.view("/", &cookie).await;
    assert_eq!(data["counts"]["todo"], 2);
    assert_eq!(data["counts"]["in_progress"], 1);
    assert_eq!(data["counts"]["done"], 1);
    assert_eq!(data["total"], 4);
}

#[tokio::test]
async fn test_plan_buckets() {
    let ctx = TestContext::new().await.unwrap();
    let cookie = ctx.signup("alice@example.com").await;

    let today = Utc::now().date_naive();
    let yesterday = today - Duration::days(1);
    let next_week = today + Duration::days(7);

    ctx.create_task(&cookie, &format!("title=Late&due_date={}", yesterday)).await;
    ctx.create_task(&cookie, &format!("title=Now&due_date={}", today)).await;
    ctx.create_task(&cookie, &format!("title=Later&due_date={}", next_week)).await;
    ctx.create_task(&cookie, "title=Someday").await;
    ctx.create_task(&cookie, &format!("title=Finished&status=DONE&due_date={}", yesterday))
        .await;

    let data = ctx.view("/plan", &cookie).await;
    assert_eq!(data["date"], today.to_string());
    assert_eq!(titles(&data, "overdue"), vec!["Late"]);
    assert_eq!(titles(&data, "today"), vec!["Now"]);
    assert_eq!(titles(&data, "upcoming"), vec!["Later"]);
    assert_eq!(titles(&data, "unscheduled"), vec!["Someday"]);
}

#[tokio::test]
async fn test_focus_lists_urgent_open_tasks() {
    let ctx = TestContext::new().await.unwrap();
    let cookie = ctx.signup("alice@example.com").await;

    let today = Utc::now().date_naive();
    let next_week = today + Duration::days(7);

    ctx.create_task(&cookie, "title=Important&priority=HIGH").await;
    ctx.create_task(&cookie, &format!("title=Due&due_date={}", today)).await;
    ctx.create_task(&cookie, &format!("title=Relaxed&due_date={}", next_week)).await;
    ctx.create_task(&cookie, "title=Closed&priority=HIGH&status=DONE").await;

    let data = ctx.view("/focus", &cookie).await;
    assert_eq!(titles(&data, "tasks"), vec!["Important", "Due"]);
}
