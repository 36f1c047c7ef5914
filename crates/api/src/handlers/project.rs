//! Handlers for the `/projects` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use validator::Validate;

use devalign_core::roles::ROLE_HR;
use devalign_core::types::DbId;
use devalign_db::models::assignment::{SetTechLeadRequest, StaffIdsRequest, TeamMember};
use devalign_db::models::borrow_request::BorrowRequest;
use devalign_db::models::project::{
    CreateProjectWithStaffing, Project, ProjectFilter, SetProjectStatus,
};
use devalign_db::repositories::{AssignmentRepo, BorrowRequestRepo, ProjectRepo};

use crate::error::AppResult;
use crate::middleware::rbac::{RequireManager, RequireManagerOrHr};
use crate::response::DataResponse;
use crate::state::AppState;
use crate::workflows::staffing::StaffingResult;

/// POST /api/v1/projects/with-staffing
///
/// Create a project and staff it in one pass. Manager only.
pub async fn create_with_staffing(
    RequireManager(auth): RequireManager,
    State(state): State<AppState>,
    Json(input): Json<CreateProjectWithStaffing>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let result = state
        .staffing
        .create_project_with_staffing(auth.user_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: result })))
}

/// GET /api/v1/projects
///
/// List projects. Managers see their own; HR sees all (with optional
/// `status` and `created_by` filters).
pub async fn list_projects(
    RequireManagerOrHr(auth): RequireManagerOrHr,
    State(state): State<AppState>,
    Query(mut filter): Query<ProjectFilter>,
) -> AppResult<Json<DataResponse<Vec<Project>>>> {
    if auth.role != ROLE_HR {
        filter.created_by = Some(auth.user_id);
    }
    let projects = ProjectRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: projects }))
}

/// GET /api/v1/projects/{id}
pub async fn get_project(
    RequireManagerOrHr(_auth): RequireManagerOrHr,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<ProjectWithTeam>>> {
    let project = ProjectRepo::find_by_id(&state.pool, project_id)
        .await?
        .ok_or(devalign_core::error::CoreError::NotFound {
            entity: "Project",
            id: project_id,
        })?;
    let team = AssignmentRepo::list_team(&state.pool, project_id).await?;
    Ok(Json(DataResponse {
        data: ProjectWithTeam { project, team },
    }))
}

/// A project together with its staffed team.
#[derive(Debug, serde::Serialize)]
pub struct ProjectWithTeam {
    #[serde(flatten)]
    pub project: Project,
    pub team: Vec<TeamMember>,
}

/// PATCH /api/v1/projects/{id}/status
///
/// Completing a project runs the skill transfer. Manager or HR.
pub async fn set_status(
    RequireManagerOrHr(_auth): RequireManagerOrHr,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<SetProjectStatus>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = state.completion.set_status(project_id, &input.status).await?;
    Ok(Json(DataResponse { data: project }))
}

/// DELETE /api/v1/projects/{id}
///
/// Tear the project down and notify the former team. Manager or HR.
pub async fn delete_project(
    RequireManagerOrHr(_auth): RequireManagerOrHr,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    state.completion.delete_project(project_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/projects/{id}/staff
///
/// Add staff to an existing project.
pub async fn add_staff(
    RequireManagerOrHr(auth): RequireManagerOrHr,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<StaffIdsRequest>,
) -> AppResult<Json<DataResponse<StaffingResult>>> {
    input.validate()?;
    let result = state
        .staffing
        .add_staff(auth.user_id, project_id, &input.staff_ids)
        .await?;
    Ok(Json(DataResponse { data: result }))
}

/// DELETE /api/v1/projects/{id}/staff
///
/// Remove staff from a project. The creator cannot be removed.
pub async fn remove_staff(
    RequireManagerOrHr(auth): RequireManagerOrHr,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<StaffIdsRequest>,
) -> AppResult<Json<DataResponse<Project>>> {
    input.validate()?;
    let project = state
        .staffing
        .remove_staff(auth.user_id, project_id, &input.staff_ids)
        .await?;
    Ok(Json(DataResponse { data: project }))
}

/// PUT /api/v1/projects/{id}/staff
///
/// Replace the staffed team with the requested membership.
pub async fn replace_staff(
    RequireManagerOrHr(auth): RequireManagerOrHr,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<StaffIdsRequest>,
) -> AppResult<Json<DataResponse<StaffingResult>>> {
    input.validate()?;
    let result = state
        .staffing
        .replace_staff(auth.user_id, project_id, &input.staff_ids)
        .await?;
    Ok(Json(DataResponse { data: result }))
}

/// PUT /api/v1/projects/{id}/staff/{user_id}/tech-lead
///
/// Promote or demote a member's tech-lead flag, subject to the capacity
/// rule. Manager or HR.
pub async fn set_tech_lead(
    RequireManagerOrHr(_auth): RequireManagerOrHr,
    State(state): State<AppState>,
    Path((project_id, user_id)): Path<(DbId, DbId)>,
    Json(input): Json<SetTechLeadRequest>,
) -> AppResult<Json<DataResponse<devalign_db::models::assignment::ProjectAssignment>>> {
    let assignment = state
        .staffing
        .set_tech_lead(project_id, user_id, input.is_tech_lead)
        .await?;
    Ok(Json(DataResponse { data: assignment }))
}

/// GET /api/v1/projects/{id}/borrow-requests
///
/// All borrow requests raised for a project. Manager or HR.
pub async fn list_borrow_requests(
    RequireManagerOrHr(_auth): RequireManagerOrHr,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<BorrowRequest>>>> {
    let requests = BorrowRequestRepo::list_for_project(&state.pool, project_id).await?;
    Ok(Json(DataResponse { data: requests }))
}
