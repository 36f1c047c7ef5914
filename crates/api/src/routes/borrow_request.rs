//! Route definitions for the `/borrow-requests` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::borrow_request;
use crate::state::AppState;

/// Routes mounted at `/borrow-requests`.
///
/// ```text
/// GET    /pending          -> list_pending
/// POST   /{id}/respond     -> respond
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/pending", get(borrow_request::list_pending))
        .route("/{id}/respond", post(borrow_request::respond))
}
