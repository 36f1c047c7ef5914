//! Route definitions for the `/projects` resource.

use axum::routing::{get, patch, post, put};
use axum::Router;

use crate::handlers::project;
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// POST   /with-staffing                      -> create_with_staffing
/// GET    /                                   -> list_projects
/// GET    /{id}                               -> get_project
/// PATCH  /{id}/status                        -> set_status
/// DELETE /{id}                               -> delete_project
/// POST   /{id}/staff                         -> add_staff
/// DELETE /{id}/staff                         -> remove_staff
/// PUT    /{id}/staff                         -> replace_staff
/// PUT    /{id}/staff/{user_id}/tech-lead     -> set_tech_lead
/// GET    /{id}/borrow-requests               -> list_borrow_requests
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/with-staffing", post(project::create_with_staffing))
        .route("/", get(project::list_projects))
        .route(
            "/{id}",
            get(project::get_project).delete(project::delete_project),
        )
        .route("/{id}/status", patch(project::set_status))
        .route(
            "/{id}/staff",
            post(project::add_staff)
                .delete(project::remove_staff)
                .put(project::replace_staff),
        )
        .route(
            "/{id}/staff/{user_id}/tech-lead",
            put(project::set_tech_lead),
        )
        .route("/{id}/borrow-requests", get(project::list_borrow_requests))
}
