//! Repository for the `borrow_requests` table.

use sqlx::PgPool;

use devalign_core::types::DbId;

use crate::models::borrow_request::{
    ApprovalStatus, BorrowRequest, BorrowRequestWithContext, CreateBorrowRequest,
};

/// Column list for `borrow_requests` queries.
const COLUMNS: &str = "id, project_id, staff_id, requested_by, approved_by, status, \
    decided_at, created_at, updated_at";

/// Provides CRUD operations for borrow requests.
pub struct BorrowRequestRepo;

impl BorrowRequestRepo {
    /// Insert a new pending borrow request, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateBorrowRequest,
    ) -> Result<BorrowRequest, sqlx::Error> {
        let query = format!(
            "INSERT INTO borrow_requests (project_id, staff_id, requested_by, approved_by)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BorrowRequest>(&query)
            .bind(input.project_id)
            .bind(input.staff_id)
            .bind(input.requested_by)
            .bind(input.approved_by)
            .fetch_one(pool)
            .await
    }

    /// Find a borrow request by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<BorrowRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM borrow_requests WHERE id = $1");
        sqlx::query_as::<_, BorrowRequest>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Move a pending request to a terminal state, stamping `decided_at`.
    ///
    /// The status filter makes this a compare-and-set: of any number of
    /// concurrent decisions on one request, exactly one observes the update.
    /// Returns the decided row, or `None` if the request was no longer
    /// pending (or never existed).
    pub async fn decide(
        pool: &PgPool,
        id: DbId,
        status: ApprovalStatus,
    ) -> Result<Option<BorrowRequest>, sqlx::Error> {
        let query = format!(
            "UPDATE borrow_requests
             SET status = $2, decided_at = NOW()
             WHERE id = $1 AND status = 'pending'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BorrowRequest>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    /// Whether a pending request already exists for this (project, staff)
    /// pair.
    pub async fn pending_exists(
        pool: &PgPool,
        project_id: DbId,
        staff_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS(
                SELECT 1 FROM borrow_requests
                WHERE project_id = $1 AND staff_id = $2 AND status = 'pending'
            )",
        )
        .bind(project_id)
        .bind(staff_id)
        .fetch_one(pool)
        .await
    }

    /// List an approver's pending queue with display context, oldest first.
    pub async fn list_pending_for_approver(
        pool: &PgPool,
        approver_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<BorrowRequestWithContext>, sqlx::Error> {
        sqlx::query_as::<_, BorrowRequestWithContext>(
            "SELECT br.id, br.project_id, p.name AS project_name,
                    br.staff_id, s.name AS staff_name,
                    br.requested_by, r.name AS requested_by_name,
                    br.status, br.created_at
             FROM borrow_requests br
             JOIN projects p ON p.id = br.project_id
             JOIN users s ON s.id = br.staff_id
             JOIN users r ON r.id = br.requested_by
             WHERE br.approved_by = $1 AND br.status = 'pending'
             ORDER BY br.created_at ASC
             LIMIT $2 OFFSET $3",
        )
        .bind(approver_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    /// List all borrow requests for a project, newest first.
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<BorrowRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM borrow_requests
             WHERE project_id = $1
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, BorrowRequest>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }
}
