//! Route tree assembly.

pub mod borrow_request;
pub mod health;
pub mod notification;
pub mod project;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /projects/with-staffing                      create + staff (manager)
/// /projects                                    list (manager|hr)
/// /projects/{id}                               get
/// /projects/{id}/status                        complete / no-op (PATCH)
/// /projects/{id}                               teardown (DELETE)
/// /projects/{id}/staff                         add (POST), remove (DELETE),
///                                              replace (PUT)
/// /projects/{id}/staff/{user_id}/tech-lead     promote/demote (PUT)
/// /projects/{id}/borrow-requests               list for project
///
/// /borrow-requests/pending                     approver queue (manager)
/// /borrow-requests/{id}/respond                approve/reject (POST)
///
/// /notifications                               list
/// /notifications/unread-count                  count
/// /notifications/{id}/read                     mark read (PATCH)
/// /notifications/read-all                      mark all read (PATCH)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/projects", project::router())
        .nest("/borrow-requests", borrow_request::router())
        .nest("/notifications", notification::router())
}
