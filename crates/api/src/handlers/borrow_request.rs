//! Handlers for the `/borrow-requests` resource.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use devalign_core::types::DbId;
use devalign_db::models::borrow_request::{BorrowRequest, BorrowRequestWithContext, RespondRequest};
use devalign_db::repositories::BorrowRequestRepo;

use crate::error::AppResult;
use crate::middleware::rbac::RequireManager;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /borrow-requests/pending`.
#[derive(Debug, Deserialize)]
pub struct PendingQuery {
    /// Maximum number of results. Defaults to 50, capped at 100.
    pub limit: Option<i64>,
    /// Number of results to skip. Defaults to 0.
    pub offset: Option<i64>,
}

const MAX_LIMIT: i64 = 100;
const DEFAULT_LIMIT: i64 = 50;

/// GET /api/v1/borrow-requests/pending
///
/// The authenticated manager's pending approval queue, oldest first.
pub async fn list_pending(
    RequireManager(auth): RequireManager,
    State(state): State<AppState>,
    Query(params): Query<PendingQuery>,
) -> AppResult<Json<DataResponse<Vec<BorrowRequestWithContext>>>> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
    let offset = params.offset.unwrap_or(0);
    let queue =
        BorrowRequestRepo::list_pending_for_approver(&state.pool, auth.user_id, limit, offset)
            .await?;
    Ok(Json(DataResponse { data: queue }))
}

/// POST /api/v1/borrow-requests/{id}/respond
///
/// Approve or reject a pending borrow request. Only the assigned approver
/// may respond, and only once.
pub async fn respond(
    RequireManager(auth): RequireManager,
    State(state): State<AppState>,
    Path(request_id): Path<DbId>,
    Json(input): Json<RespondRequest>,
) -> AppResult<Json<DataResponse<BorrowRequest>>> {
    let decided = state
        .approval
        .respond(auth.user_id, request_id, input.approve)
        .await?;
    Ok(Json(DataResponse { data: decided }))
}
