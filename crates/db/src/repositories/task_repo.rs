//! Repository for the `tasks`, `task_skills`, and `task_assignments` tables.

use sqlx::PgPool;

use devalign_core::types::DbId;

use crate::models::task::{CreateTask, EarnedSkillRow, Task};

/// Column list for `tasks` queries.
const COLUMNS: &str =
    "id, project_id, title, description, status, created_by, created_at, updated_at";

/// Provides CRUD operations for tasks.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a task together with its required skills, in one transaction.
    pub async fn create(pool: &PgPool, input: &CreateTask) -> Result<Task, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO tasks (project_id, title, description, status, created_by)
             VALUES ($1, $2, $3, COALESCE($4, 'todo'), $5)
             RETURNING {COLUMNS}"
        );
        let task = sqlx::query_as::<_, Task>(&query)
            .bind(input.project_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.status)
            .bind(input.created_by)
            .fetch_one(&mut *tx)
            .await?;

        if !input.required_skills.is_empty() {
            sqlx::query(
                "INSERT INTO task_skills (task_id, skill_id)
                 SELECT $1, skill_id FROM UNNEST($2::bigint[]) AS t(skill_id)
                 ON CONFLICT (task_id, skill_id) DO NOTHING",
            )
            .bind(task.id)
            .bind(&input.required_skills)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(task)
    }

    /// Find a task by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Assign a user to a task. Returns `true` if a row was inserted.
    pub async fn assign_user(
        pool: &PgPool,
        task_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO task_assignments (task_id, user_id)
             VALUES ($1, $2)
             ON CONFLICT (task_id, user_id) DO NOTHING",
        )
        .bind(task_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Collect every (assignee, required skill) pair from a project's started
    /// tasks. Started means in progress or done; untouched todo tasks earn
    /// nobody anything.
    pub async fn earned_skills_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<EarnedSkillRow>, sqlx::Error> {
        sqlx::query_as::<_, EarnedSkillRow>(
            "SELECT DISTINCT ta.user_id, ts.skill_id
             FROM tasks t
             JOIN task_assignments ta ON ta.task_id = t.id
             JOIN task_skills ts ON ts.task_id = t.id
             WHERE t.project_id = $1
               AND t.status IN ('in_progress', 'done')
             ORDER BY ta.user_id, ts.skill_id",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }
}
