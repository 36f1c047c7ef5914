//! Task entity models and DTOs.
//!
//! Task CRUD itself is not part of this service's HTTP surface; tasks are
//! read by the completion engine and removed by project teardown.

use devalign_core::skills::EarnedSkill;
use devalign_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `tasks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Task {
    pub id: DbId,
    pub project_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a new task with its required skills.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTask {
    pub project_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub required_skills: Vec<DbId>,
    pub created_by: DbId,
}

/// One (assignee, required skill) pair from a started task, as queried for
/// skill transfer at project completion.
#[derive(Debug, Clone, FromRow)]
pub struct EarnedSkillRow {
    pub user_id: DbId,
    pub skill_id: DbId,
}

impl From<EarnedSkillRow> for EarnedSkill {
    fn from(row: EarnedSkillRow) -> Self {
        EarnedSkill {
            user_id: row.user_id,
            skill_id: row.skill_id,
        }
    }
}
