//! Project assignment models and DTOs.

use devalign_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `project_assignments` table. Unique per (project, user).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectAssignment {
    pub id: DbId,
    pub project_id: DbId,
    pub user_id: DbId,
    pub is_tech_lead: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An assignment joined with the assignee for team listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TeamMember {
    pub user_id: DbId,
    pub name: String,
    pub email: String,
    pub role: String,
    pub is_tech_lead: bool,
}

/// Request body for the tech-lead endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SetTechLeadRequest {
    pub is_tech_lead: bool,
}

/// Request body for the add/remove/replace staff endpoints.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StaffIdsRequest {
    #[validate(length(min = 1, message = "staff_ids must not be empty"))]
    pub staff_ids: Vec<DbId>,
}
