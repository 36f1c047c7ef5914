//! Read-only user lookup shared by the workflow services.

use devalign_core::error::CoreError;
use devalign_core::types::DbId;
use devalign_db::models::user::User;
use devalign_db::repositories::UserRepo;
use devalign_db::DbPool;

use crate::error::AppResult;

/// Resolves users, their managers, and role groups.
#[derive(Clone)]
pub struct Directory {
    pool: DbPool,
}

impl Directory {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Fetch a user or fail with `NotFound`.
    pub async fn get_user(&self, id: DbId) -> AppResult<User> {
        UserRepo::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| CoreError::NotFound { entity: "User", id }.into())
    }

    /// Fetch a batch of users; every requested id must exist.
    ///
    /// The first missing id fails the whole lookup with `NotFound`, so
    /// callers get all-or-nothing resolution before any writes happen.
    pub async fn get_users(&self, ids: &[DbId]) -> AppResult<Vec<User>> {
        let users = UserRepo::find_by_ids(&self.pool, ids).await?;
        if users.len() != ids.len() {
            let found: std::collections::BTreeSet<DbId> = users.iter().map(|u| u.id).collect();
            if let Some(missing) = ids.iter().find(|id| !found.contains(id)) {
                return Err(CoreError::NotFound {
                    entity: "User",
                    id: *missing,
                }
                .into());
            }
        }
        Ok(users)
    }

    /// All active users holding a role.
    pub async fn users_by_role(&self, role: &str) -> AppResult<Vec<User>> {
        Ok(UserRepo::list_by_role(&self.pool, role).await?)
    }
}
