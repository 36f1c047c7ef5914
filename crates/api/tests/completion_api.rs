//! HTTP-level integration tests for project completion and teardown.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete, get, patch_json, post_json, seed_user, token_for};
use devalign_db::models::task::CreateTask;
use devalign_db::repositories::{TaskRepo, UserRepo};
use sqlx::PgPool;

async fn seed_skill(pool: &PgPool, name: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO skills (name) VALUES ($1) RETURNING id")
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn create_project(pool: &PgPool, token: &str, staff_ids: Vec<i64>) -> i64 {
    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/projects/with-staffing",
        token,
        serde_json::json!({"name": "Atlas", "description": "d", "staff_ids": staff_ids}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["project"]["id"]
        .as_i64()
        .unwrap()
}

async fn seed_started_task(pool: &PgPool, project_id: i64, creator: i64, assignee: i64, skill: i64) {
    let task = TaskRepo::create(
        pool,
        &CreateTask {
            project_id,
            title: "API work".to_string(),
            description: None,
            status: Some("in_progress".to_string()),
            required_skills: vec![skill],
            created_by: creator,
        },
    )
    .await
    .unwrap();
    TaskRepo::assign_user(pool, task.id, assignee).await.unwrap();
}

// ---------------------------------------------------------------------------
// Completion
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_completing_transfers_skills_once(pool: PgPool) {
    let creator = seed_user(&pool, "Mira", "manager", None).await;
    let ann = seed_user(&pool, "Ann", "staff", Some(creator.id)).await;
    let token = token_for(creator.id, &creator.role);
    let project_id = create_project(&pool, &token, vec![ann.id]).await;
    let rust = seed_skill(&pool, "Rust").await;
    seed_started_task(&pool, project_id, creator.id, ann.id, rust).await;

    let app = common::build_test_app(pool.clone());
    let response = patch_json(
        app,
        &format!("/api/v1/projects/{project_id}/status"),
        &token,
        serde_json::json!({"status": "completed"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "completed");
    assert!(json["data"]["completed_at"].is_string());

    let skills = UserRepo::skill_ids(&pool, ann.id).await.unwrap();
    assert_eq!(skills, vec![rust]);

    // Re-sending completed is a no-op, not an error, and grants nothing new.
    let app = common::build_test_app(pool.clone());
    let response = patch_json(
        app,
        &format!("/api/v1/projects/{project_id}/status"),
        &token,
        serde_json::json!({"status": "completed"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let skills = UserRepo::skill_ids(&pool, ann.id).await.unwrap();
    assert_eq!(skills, vec![rust]);

    // The assignee hears about the completion.
    let app = common::build_test_app(pool);
    let notes = body_json(
        get(app, "/api/v1/notifications", &token_for(ann.id, &ann.role)).await,
    )
    .await;
    assert!(notes["data"]
        .as_array()
        .unwrap()
        .iter()
        .any(|n| n["title"] == "Project Completed"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_reopening_a_completed_project_is_rejected(pool: PgPool) {
    let creator = seed_user(&pool, "Mira", "manager", None).await;
    let token = token_for(creator.id, &creator.role);
    let project_id = create_project(&pool, &token, vec![]).await;

    let app = common::build_test_app(pool.clone());
    patch_json(
        app,
        &format!("/api/v1/projects/{project_id}/status"),
        &token,
        serde_json::json!({"status": "completed"}),
    )
    .await;

    let app = common::build_test_app(pool.clone());
    let response = patch_json(
        app,
        &format!("/api/v1/projects/{project_id}/status"),
        &token,
        serde_json::json!({"status": "active"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool);
    let response = patch_json(
        app,
        &format!("/api/v1/projects/{project_id}/status"),
        &token,
        serde_json::json!({"status": "archived"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Teardown
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_removes_dependents_and_notifies_team(pool: PgPool) {
    let creator = seed_user(&pool, "Mira", "manager", None).await;
    let ann = seed_user(&pool, "Ann", "staff", Some(creator.id)).await;
    let token = token_for(creator.id, &creator.role);
    let project_id = create_project(&pool, &token, vec![ann.id]).await;
    let rust = seed_skill(&pool, "Rust").await;
    seed_started_task(&pool, project_id, creator.id, ann.id, rust).await;

    let app = common::build_test_app(pool.clone());
    let response = delete(app, &format!("/api/v1/projects/{project_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool.clone());
    let response = get(app, &format!("/api/v1/projects/{project_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let tasks: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tasks WHERE project_id = $1")
        .bind(project_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(tasks, 0);

    // The former member gets the teardown notice, with no project link.
    let app = common::build_test_app(pool.clone());
    let notes = body_json(
        get(app, "/api/v1/notifications", &token_for(ann.id, &ann.role)).await,
    )
    .await;
    let deleted_note = notes["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|n| n["title"] == "Project Deleted")
        .expect("teardown notice should exist");
    assert!(deleted_note["related_project"].is_null());

    // Deleting again is a 404.
    let app = common::build_test_app(pool);
    let response = delete(app, &format!("/api/v1/projects/{project_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_health_reports_db_status(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = common::get_unauthed(app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["db_healthy"], true);
}
