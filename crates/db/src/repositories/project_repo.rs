//! Repository for the `projects` table, including the completion and
//! teardown writes.

use sqlx::PgPool;

use devalign_core::types::DbId;

use crate::models::project::{CreateProject, Project, ProjectFilter};

/// Column list for `projects` queries.
const COLUMNS: &str = "id, name, description, status, start_date, deadline, completed_at, \
    team_member_count, created_by, created_at, updated_at";

const DEFAULT_PER_PAGE: i64 = 20;
const MAX_PER_PAGE: i64 = 100;

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new active project, returning the created row.
    ///
    /// `team_member_count` starts at 1 for the creating manager; assignment
    /// writes adjust it from there.
    pub async fn create(pool: &PgPool, input: &CreateProject) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (name, description, start_date, deadline, created_by)
             VALUES ($1, $2, COALESCE($3, NOW()), $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.start_date)
            .bind(input.deadline)
            .bind(input.created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a project by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List projects matching the filter, newest first, paginated.
    pub async fn list(pool: &PgPool, filter: &ProjectFilter) -> Result<Vec<Project>, sqlx::Error> {
        let page = filter.page.unwrap_or(1).max(1);
        let per_page = filter
            .per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE);
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE ($1::text IS NULL OR status = $1)
               AND ($2::bigint IS NULL OR created_by = $2)
             ORDER BY created_at DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&filter.status)
            .bind(filter.created_by)
            .bind(per_page)
            .bind((page - 1) * per_page)
            .fetch_all(pool)
            .await
    }

    /// Atomically adjust the team member counter by `delta`.
    ///
    /// Returns `false` if the project does not exist. The counter's CHECK
    /// constraint rejects adjustments that would drop it below 1.
    pub async fn adjust_member_count(
        pool: &PgPool,
        project_id: DbId,
        delta: i32,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE projects SET team_member_count = team_member_count + $2 WHERE id = $1",
        )
        .bind(project_id)
        .bind(delta)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Transition an active project to completed, stamping `completed_at`.
    ///
    /// This is a conditional write: it only succeeds while the project is
    /// still active, so concurrent completions cannot both win. Returns the
    /// updated row, or `None` if the project was not active (or not found).
    pub async fn complete(pool: &PgPool, project_id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects
             SET status = 'completed', completed_at = NOW()
             WHERE id = $1 AND status = 'active'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(project_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a project and every dependent record in one transaction.
    ///
    /// Notifications referencing the project are kept; their foreign keys
    /// null out via ON DELETE SET NULL. Returns `true` if the project row
    /// existed.
    pub async fn delete_cascade(pool: &PgPool, project_id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            "DELETE FROM task_assignments
             WHERE task_id IN (SELECT id FROM tasks WHERE project_id = $1)",
        )
        .bind(project_id)
        .execute(&mut *tx)
        .await?;
        sqlx::query(
            "DELETE FROM task_skills
             WHERE task_id IN (SELECT id FROM tasks WHERE project_id = $1)",
        )
        .bind(project_id)
        .execute(&mut *tx)
        .await?;
        sqlx::query("DELETE FROM tasks WHERE project_id = $1")
            .bind(project_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM borrow_requests WHERE project_id = $1")
            .bind(project_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM project_assignments WHERE project_id = $1")
            .bind(project_id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(project_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
