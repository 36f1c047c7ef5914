//! Integration tests for project completion and teardown.
//!
//! - The conditional completion write
//! - Earned-skill aggregation from started tasks
//! - Cascade deletion and notification survival

use sqlx::PgPool;

use devalign_db::models::borrow_request::CreateBorrowRequest;
use devalign_db::models::notification::NewNotification;
use devalign_db::models::project::CreateProject;
use devalign_db::models::task::CreateTask;
use devalign_db::models::user::CreateUser;
use devalign_db::repositories::{
    AssignmentRepo, BorrowRequestRepo, NotificationRepo, ProjectRepo, TaskRepo, UserRepo,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_user(name: &str, email: &str, role: &str) -> CreateUser {
    CreateUser {
        name: name.to_string(),
        email: email.to_string(),
        password_hash: "hash".to_string(),
        role: role.to_string(),
        manager_id: None,
    }
}

fn new_project(name: &str, created_by: i64) -> CreateProject {
    CreateProject {
        name: name.to_string(),
        description: "test project".to_string(),
        start_date: None,
        deadline: None,
        created_by,
    }
}

async fn seed_skill(pool: &PgPool, name: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO skills (name) VALUES ($1) RETURNING id")
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap()
}

// ---------------------------------------------------------------------------
// Test: completion only succeeds while active
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_complete_is_conditional(pool: PgPool) {
    let manager = UserRepo::create(&pool, &new_user("Mgr", "mgr@test.dev", "manager"))
        .await
        .unwrap();
    let project = ProjectRepo::create(&pool, &new_project("Alpha", manager.id))
        .await
        .unwrap();

    let completed = ProjectRepo::complete(&pool, project.id).await.unwrap();
    let completed = completed.unwrap();
    assert_eq!(completed.status, "completed");
    assert!(completed.completed_at.is_some());

    // Completing twice loses the race.
    let again = ProjectRepo::complete(&pool, project.id).await.unwrap();
    assert!(again.is_none());
}

// ---------------------------------------------------------------------------
// Test: earned skills come only from started tasks
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_earned_skills_skip_untouched_tasks(pool: PgPool) {
    let manager = UserRepo::create(&pool, &new_user("Mgr", "mgr@test.dev", "manager"))
        .await
        .unwrap();
    let ann = UserRepo::create(&pool, &new_user("Ann", "ann@test.dev", "staff"))
        .await
        .unwrap();
    let project = ProjectRepo::create(&pool, &new_project("Alpha", manager.id))
        .await
        .unwrap();
    let rust = seed_skill(&pool, "Rust").await;
    let sql = seed_skill(&pool, "SQL").await;

    let started = TaskRepo::create(
        &pool,
        &CreateTask {
            project_id: project.id,
            title: "API".to_string(),
            description: None,
            status: Some("in_progress".to_string()),
            required_skills: vec![rust],
            created_by: manager.id,
        },
    )
    .await
    .unwrap();
    TaskRepo::assign_user(&pool, started.id, ann.id).await.unwrap();

    let untouched = TaskRepo::create(
        &pool,
        &CreateTask {
            project_id: project.id,
            title: "Schema".to_string(),
            description: None,
            status: None,
            required_skills: vec![sql],
            created_by: manager.id,
        },
    )
    .await
    .unwrap();
    TaskRepo::assign_user(&pool, untouched.id, ann.id)
        .await
        .unwrap();

    let earned = TaskRepo::earned_skills_for_project(&pool, project.id)
        .await
        .unwrap();
    assert_eq!(earned.len(), 1);
    assert_eq!(earned[0].user_id, ann.id);
    assert_eq!(earned[0].skill_id, rust);
}

// ---------------------------------------------------------------------------
// Test: skill grants are idempotent
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_grant_skills_skips_held(pool: PgPool) {
    let ann = UserRepo::create(&pool, &new_user("Ann", "ann@test.dev", "staff"))
        .await
        .unwrap();
    let rust = seed_skill(&pool, "Rust").await;
    let sql = seed_skill(&pool, "SQL").await;

    let granted = UserRepo::grant_skills(&pool, ann.id, &[rust]).await.unwrap();
    assert_eq!(granted, 1);

    let granted = UserRepo::grant_skills(&pool, ann.id, &[rust, sql])
        .await
        .unwrap();
    assert_eq!(granted, 1);

    let skills = UserRepo::skill_ids(&pool, ann.id).await.unwrap();
    assert_eq!(skills, vec![rust, sql]);
}

// ---------------------------------------------------------------------------
// Test: teardown removes dependents but keeps notifications
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_cascade_keeps_notifications(pool: PgPool) {
    let manager = UserRepo::create(&pool, &new_user("Mgr", "mgr@test.dev", "manager"))
        .await
        .unwrap();
    let approver = UserRepo::create(&pool, &new_user("App", "app@test.dev", "manager"))
        .await
        .unwrap();
    let ann = UserRepo::create(&pool, &new_user("Ann", "ann@test.dev", "staff"))
        .await
        .unwrap();
    let project = ProjectRepo::create(&pool, &new_project("Alpha", manager.id))
        .await
        .unwrap();
    AssignmentRepo::create_if_absent(&pool, project.id, ann.id, false)
        .await
        .unwrap();
    let request = BorrowRequestRepo::create(
        &pool,
        &CreateBorrowRequest {
            project_id: project.id,
            staff_id: ann.id,
            requested_by: manager.id,
            approved_by: approver.id,
        },
    )
    .await
    .unwrap();
    let rust = seed_skill(&pool, "Rust").await;
    let task = TaskRepo::create(
        &pool,
        &CreateTask {
            project_id: project.id,
            title: "API".to_string(),
            description: None,
            status: None,
            required_skills: vec![rust],
            created_by: manager.id,
        },
    )
    .await
    .unwrap();
    TaskRepo::assign_user(&pool, task.id, ann.id).await.unwrap();
    let notification = NotificationRepo::create(
        &pool,
        ann.id,
        &NewNotification::announcement("Project Deleted", "Alpha is gone")
            .with_project(project.id),
    )
    .await
    .unwrap();

    assert!(ProjectRepo::delete_cascade(&pool, project.id).await.unwrap());

    assert!(ProjectRepo::find_by_id(&pool, project.id)
        .await
        .unwrap()
        .is_none());
    assert!(TaskRepo::find_by_id(&pool, task.id).await.unwrap().is_none());
    assert!(BorrowRequestRepo::find_by_id(&pool, request.id)
        .await
        .unwrap()
        .is_none());
    assert_eq!(
        AssignmentRepo::count_for_project(&pool, project.id)
            .await
            .unwrap(),
        0
    );

    // The notification survives with its project reference nulled.
    let kept = NotificationRepo::list_for_user(&pool, ann.id, false, 10, 0)
        .await
        .unwrap();
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].id, notification.id);
    assert!(kept[0].related_project.is_none());

    // Deleting again reports nothing removed.
    assert!(!ProjectRepo::delete_cascade(&pool, project.id).await.unwrap());
}
