//! Integration tests for borrow request writes.
//!
//! - The compare-and-set decision write
//! - Duplicate pending detection
//! - Approver queue listing

use sqlx::PgPool;

use devalign_db::models::borrow_request::{ApprovalStatus, CreateBorrowRequest};
use devalign_db::models::project::CreateProject;
use devalign_db::models::user::CreateUser;
use devalign_db::repositories::{BorrowRequestRepo, ProjectRepo, UserRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_user(name: &str, email: &str, role: &str, manager_id: Option<i64>) -> CreateUser {
    CreateUser {
        name: name.to_string(),
        email: email.to_string(),
        password_hash: "hash".to_string(),
        role: role.to_string(),
        manager_id,
    }
}

async fn seed(pool: &PgPool) -> (i64, i64, i64, i64) {
    let requester = UserRepo::create(pool, &new_user("Req", "req@test.dev", "manager", None))
        .await
        .unwrap();
    let approver = UserRepo::create(pool, &new_user("App", "app@test.dev", "manager", None))
        .await
        .unwrap();
    let staff = UserRepo::create(
        pool,
        &new_user("Ann", "ann@test.dev", "staff", Some(approver.id)),
    )
    .await
    .unwrap();
    let project = ProjectRepo::create(
        pool,
        &CreateProject {
            name: "Alpha".to_string(),
            description: "test project".to_string(),
            start_date: None,
            deadline: None,
            created_by: requester.id,
        },
    )
    .await
    .unwrap();
    (requester.id, approver.id, staff.id, project.id)
}

// ---------------------------------------------------------------------------
// Test: a decision lands exactly once
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_decide_is_compare_and_set(pool: PgPool) {
    let (requester, approver, staff, project) = seed(&pool).await;
    let request = BorrowRequestRepo::create(
        &pool,
        &CreateBorrowRequest {
            project_id: project,
            staff_id: staff,
            requested_by: requester,
            approved_by: approver,
        },
    )
    .await
    .unwrap();
    assert_eq!(request.status, ApprovalStatus::Pending);
    assert!(request.decided_at.is_none());

    let decided = BorrowRequestRepo::decide(&pool, request.id, ApprovalStatus::Approved)
        .await
        .unwrap();
    let decided = decided.unwrap();
    assert_eq!(decided.status, ApprovalStatus::Approved);
    assert!(decided.decided_at.is_some());

    // A second decision, of either direction, loses the race.
    let again = BorrowRequestRepo::decide(&pool, request.id, ApprovalStatus::Rejected)
        .await
        .unwrap();
    assert!(again.is_none());

    let stored = BorrowRequestRepo::find_by_id(&pool, request.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, ApprovalStatus::Approved);
}

// ---------------------------------------------------------------------------
// Test: concurrent decisions admit a single winner
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_concurrent_decisions_single_winner(pool: PgPool) {
    let (requester, approver, staff, project) = seed(&pool).await;
    let request = BorrowRequestRepo::create(
        &pool,
        &CreateBorrowRequest {
            project_id: project,
            staff_id: staff,
            requested_by: requester,
            approved_by: approver,
        },
    )
    .await
    .unwrap();

    let approve = BorrowRequestRepo::decide(&pool, request.id, ApprovalStatus::Approved);
    let reject = BorrowRequestRepo::decide(&pool, request.id, ApprovalStatus::Rejected);
    let (a, r) = tokio::join!(approve, reject);
    let winners = [a.unwrap(), r.unwrap()]
        .into_iter()
        .flatten()
        .count();
    assert_eq!(winners, 1);
}

// ---------------------------------------------------------------------------
// Test: duplicate pending detection
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_pending_exists(pool: PgPool) {
    let (requester, approver, staff, project) = seed(&pool).await;
    assert!(!BorrowRequestRepo::pending_exists(&pool, project, staff)
        .await
        .unwrap());

    let request = BorrowRequestRepo::create(
        &pool,
        &CreateBorrowRequest {
            project_id: project,
            staff_id: staff,
            requested_by: requester,
            approved_by: approver,
        },
    )
    .await
    .unwrap();
    assert!(BorrowRequestRepo::pending_exists(&pool, project, staff)
        .await
        .unwrap());

    BorrowRequestRepo::decide(&pool, request.id, ApprovalStatus::Rejected)
        .await
        .unwrap();
    assert!(!BorrowRequestRepo::pending_exists(&pool, project, staff)
        .await
        .unwrap());
}

// ---------------------------------------------------------------------------
// Test: approver queue shows only own pending requests, oldest first
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_pending_queue_scoped_to_approver(pool: PgPool) {
    let (requester, approver, staff, project) = seed(&pool).await;
    let other_approver = UserRepo::create(
        &pool,
        &new_user("Other", "other@test.dev", "manager", None),
    )
    .await
    .unwrap();
    let other_staff = UserRepo::create(
        &pool,
        &new_user("Bob", "bob@test.dev", "staff", Some(other_approver.id)),
    )
    .await
    .unwrap();

    let first = BorrowRequestRepo::create(
        &pool,
        &CreateBorrowRequest {
            project_id: project,
            staff_id: staff,
            requested_by: requester,
            approved_by: approver,
        },
    )
    .await
    .unwrap();
    BorrowRequestRepo::create(
        &pool,
        &CreateBorrowRequest {
            project_id: project,
            staff_id: other_staff.id,
            requested_by: requester,
            approved_by: other_approver.id,
        },
    )
    .await
    .unwrap();

    let queue = BorrowRequestRepo::list_pending_for_approver(&pool, approver, 50, 0)
        .await
        .unwrap();
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0].id, first.id);
    assert_eq!(queue[0].project_name, "Alpha");
    assert_eq!(queue[0].staff_name, "Ann");
    assert_eq!(queue[0].requested_by_name, "Req");
}
