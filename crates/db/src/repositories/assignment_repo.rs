//! Repository for the `project_assignments` table.

use sqlx::PgPool;

use devalign_core::types::DbId;

use crate::models::assignment::{ProjectAssignment, TeamMember};

/// Column list for `project_assignments` queries.
const COLUMNS: &str = "id, project_id, user_id, is_tech_lead, created_at, updated_at";

/// Provides CRUD operations for project assignments.
pub struct AssignmentRepo;

impl AssignmentRepo {
    /// Insert an assignment unless one already exists for (project, user).
    ///
    /// Returns `true` if a row was inserted, `false` if the member was
    /// already assigned. Callers use the return value to decide whether to
    /// bump the project's member counter.
    pub async fn create_if_absent(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
        is_tech_lead: bool,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO project_assignments (project_id, user_id, is_tech_lead)
             VALUES ($1, $2, $3)
             ON CONFLICT (project_id, user_id) DO NOTHING",
        )
        .bind(project_id)
        .bind(user_id)
        .bind(is_tech_lead)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Find the assignment for a (project, user) pair.
    pub async fn find(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
    ) -> Result<Option<ProjectAssignment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_assignments
             WHERE project_id = $1 AND user_id = $2"
        );
        sqlx::query_as::<_, ProjectAssignment>(&query)
            .bind(project_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Remove an assignment. Returns `true` if a row was deleted.
    pub async fn remove(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM project_assignments WHERE project_id = $1 AND user_id = $2",
        )
        .bind(project_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List a project's team with assignee details, tech leads first.
    pub async fn list_team(pool: &PgPool, project_id: DbId) -> Result<Vec<TeamMember>, sqlx::Error> {
        sqlx::query_as::<_, TeamMember>(
            "SELECT u.id AS user_id, u.name, u.email, u.role, pa.is_tech_lead
             FROM project_assignments pa
             JOIN users u ON u.id = pa.user_id
             WHERE pa.project_id = $1
             ORDER BY pa.is_tech_lead DESC, u.name ASC",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }

    /// Promote a staff member to tech lead, guarded against a second staff
    /// lead on the same project.
    ///
    /// The NOT EXISTS guard spans other rows, so a conditional UPDATE alone
    /// is not enough: two concurrent promotions of different users would
    /// each pass the guard against a pre-commit snapshot. Taking the project
    /// row lock first serializes promotions per project, and the guarded
    /// UPDATE then starts on a snapshot that includes the prior winner.
    /// Returns `true` if the row was promoted, `false` if the assignment
    /// does not exist or another staff member already holds the slot.
    pub async fn promote_staff_lead(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query("SELECT id FROM projects WHERE id = $1 FOR UPDATE")
            .bind(project_id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query(
            "UPDATE project_assignments pa
             SET is_tech_lead = true
             WHERE pa.project_id = $1 AND pa.user_id = $2
               AND NOT EXISTS (
                   SELECT 1 FROM project_assignments other
                   JOIN users u ON u.id = other.user_id
                   WHERE other.project_id = $1
                     AND other.user_id <> $2
                     AND other.is_tech_lead = true
                     AND u.role = 'staff'
               )",
        )
        .bind(project_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    /// Clear a member's tech-lead flag. Returns `true` if a row was updated.
    pub async fn demote_tech_lead(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE project_assignments
             SET is_tech_lead = false
             WHERE project_id = $1 AND user_id = $2",
        )
        .bind(project_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count staff members (not the managing roles) holding the tech-lead
    /// flag on a project, excluding one user.
    pub async fn staff_lead_count_excluding(
        pool: &PgPool,
        project_id: DbId,
        exclude_user: DbId,
    ) -> Result<i64, sqlx::Error> {
        let count: Option<i64> = sqlx::query_scalar(
            "SELECT COUNT(*) FROM project_assignments pa
             JOIN users u ON u.id = pa.user_id
             WHERE pa.project_id = $1
               AND pa.is_tech_lead = true
               AND pa.user_id <> $2
               AND u.role = 'staff'",
        )
        .bind(project_id)
        .bind(exclude_user)
        .fetch_one(pool)
        .await?;
        Ok(count.unwrap_or(0))
    }

    /// Count assignments on a project.
    pub async fn count_for_project(pool: &PgPool, project_id: DbId) -> Result<i64, sqlx::Error> {
        let count: Option<i64> =
            sqlx::query_scalar("SELECT COUNT(*) FROM project_assignments WHERE project_id = $1")
                .bind(project_id)
                .fetch_one(pool)
                .await?;
        Ok(count.unwrap_or(0))
    }
}
