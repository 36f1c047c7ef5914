//! Repository for the `users`, `skills`, and `user_skills` tables.

use sqlx::PgPool;

use devalign_core::types::DbId;

use crate::models::user::{CreateUser, User};

/// Column list for `users` queries.
const COLUMNS: &str =
    "id, name, email, password_hash, role, manager_id, is_active, created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (name, email, password_hash, role, manager_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.role)
            .bind(input.manager_id)
            .fetch_one(pool)
            .await
    }

    /// Find a user by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch all users whose IDs appear in `ids`. Unknown IDs are simply
    /// absent from the result, so callers can diff to find them.
    pub async fn find_by_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = ANY($1)");
        sqlx::query_as::<_, User>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// List active users with a given role, ordered by name.
    pub async fn list_by_role(pool: &PgPool, role: &str) -> Result<Vec<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users
             WHERE role = $1 AND is_active = true
             ORDER BY name ASC"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(role)
            .fetch_all(pool)
            .await
    }

    /// Grant a set of skills to a user. Already-held skills are left alone.
    ///
    /// Returns the number of newly granted skills.
    pub async fn grant_skills(
        pool: &PgPool,
        user_id: DbId,
        skill_ids: &[DbId],
    ) -> Result<u64, sqlx::Error> {
        if skill_ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query(
            "INSERT INTO user_skills (user_id, skill_id)
             SELECT $1, skill_id FROM UNNEST($2::bigint[]) AS t(skill_id)
             ON CONFLICT (user_id, skill_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(skill_ids)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// List the skill IDs a user holds.
    pub async fn skill_ids(pool: &PgPool, user_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT skill_id FROM user_skills WHERE user_id = $1 ORDER BY skill_id",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}
