//! Project entity models and DTOs.

use devalign_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub status: String,
    pub start_date: Timestamp,
    pub deadline: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub team_member_count: i32,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a new project row.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub name: String,
    pub description: String,
    pub start_date: Option<Timestamp>,
    pub deadline: Option<Timestamp>,
    pub created_by: DbId,
}

/// Request body for `POST /projects/with-staffing`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProjectWithStaffing {
    #[validate(length(min = 1, max = 100, message = "Project name must be specified"))]
    pub name: String,
    #[validate(length(min = 1, message = "Project description must be specified"))]
    pub description: String,
    pub start_date: Option<Timestamp>,
    pub deadline: Option<Timestamp>,
    pub staff_ids: Vec<DbId>,
}

/// Request body for `PATCH /projects/{id}/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct SetProjectStatus {
    pub status: String,
}

/// Optional filters for project listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectFilter {
    pub status: Option<String>,
    pub created_by: Option<DbId>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}
