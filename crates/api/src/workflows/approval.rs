//! Borrow request decisions.
//!
//! States: `Pending -> Approved | Rejected`, both terminal. The transition
//! itself is a compare-and-set in the store, so a second responder (or a
//! concurrent duplicate) always observes `AlreadyProcessed` and never
//! double-assigns or re-notifies.

use devalign_core::error::CoreError;
use devalign_core::types::DbId;
use devalign_db::models::borrow_request::{ApprovalStatus, BorrowRequest};
use devalign_db::models::notification::NewNotification;
use devalign_db::models::project::Project;
use devalign_db::repositories::{AssignmentRepo, BorrowRequestRepo, ProjectRepo};
use devalign_db::DbPool;
use devalign_events::NotificationDispatcher;

use crate::error::AppResult;
use crate::workflows::directory::Directory;

/// Decides borrow requests and applies the consequences.
#[derive(Clone)]
pub struct ApprovalService {
    pool: DbPool,
    directory: Directory,
    dispatcher: NotificationDispatcher,
}

impl ApprovalService {
    pub fn new(pool: DbPool, directory: Directory, dispatcher: NotificationDispatcher) -> Self {
        Self {
            pool,
            directory,
            dispatcher,
        }
    }

    /// Approve or reject a pending borrow request.
    ///
    /// Preconditions, in order: the request exists; the responder is the
    /// assigned approver (fixed at creation); the request is still pending.
    pub async fn respond(
        &self,
        responder_id: DbId,
        request_id: DbId,
        approve: bool,
    ) -> AppResult<BorrowRequest> {
        let request = BorrowRequestRepo::find_by_id(&self.pool, request_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "BorrowRequest",
                id: request_id,
            })?;

        if request.approved_by != responder_id {
            return Err(CoreError::Forbidden(
                "You are not the assigned approver for this request".to_string(),
            )
            .into());
        }

        if request.status.is_terminal() {
            return Err(CoreError::AlreadyProcessed {
                decision: request.status.as_decision(),
            }
            .into());
        }

        let status = ApprovalStatus::from_decision(approve);
        let decided = BorrowRequestRepo::decide(&self.pool, request_id, status)
            .await?
            .ok_or_else(|| {
                // Lost the race to another decision; report what stands now.
                CoreError::AlreadyProcessed {
                    decision: status.as_decision(),
                }
            })?;

        if approve {
            let inserted = AssignmentRepo::create_if_absent(
                &self.pool,
                decided.project_id,
                decided.staff_id,
                false,
            )
            .await?;
            if inserted {
                ProjectRepo::adjust_member_count(&self.pool, decided.project_id, 1).await?;
            }
        }
        self.notify_outcome(&decided, approve).await;
        Ok(decided)
    }

    /// Tell the people affected by the decision. Best-effort.
    ///
    /// Approval notifies the staff member and the requester. Rejection
    /// notifies the requester only; the staff member never saw a confirmed
    /// assignment and gets no rejection notice.
    async fn notify_outcome(&self, request: &BorrowRequest, approved: bool) {
        let project = match ProjectRepo::find_by_id(&self.pool, request.project_id).await {
            Ok(Some(project)) => project,
            Ok(None) => return,
            Err(e) => {
                tracing::error!(request_id = request.id, error = %e, "Project lookup failed");
                return;
            }
        };

        if approved {
            self.notify_approved(request, &project).await;
        } else {
            self.notify_rejected(request, &project).await;
        }
    }

    async fn notify_approved(&self, request: &BorrowRequest, project: &Project) {
        if let Ok(staff) = self.directory.get_user(request.staff_id).await {
            let note = NewNotification::announcement(
                "Project Assignment Approved",
                format!(
                    "Your manager has approved your assignment to the project \"{}\". \
                     You are now officially part of the team!",
                    project.name
                ),
            )
            .with_project(project.id);
            if let Err(e) = self.dispatcher.notify(&staff, &note).await {
                tracing::error!(user_id = staff.id, error = %e, "Approval notification failed");
            }

            if let Ok(requester) = self.directory.get_user(request.requested_by).await {
                let note = NewNotification::announcement(
                    "Staff Assignment Approved",
                    format!(
                        "{} has been approved by their manager and is now assigned \
                         to your project \"{}\".",
                        staff.name, project.name
                    ),
                )
                .with_project(project.id);
                if let Err(e) = self.dispatcher.notify(&requester, &note).await {
                    tracing::error!(user_id = requester.id, error = %e, "Requester notification failed");
                }
            }
        }
    }

    async fn notify_rejected(&self, request: &BorrowRequest, project: &Project) {
        let staff_name = match self.directory.get_user(request.staff_id).await {
            Ok(staff) => staff.name,
            Err(_) => "the staff member".to_string(),
        };
        if let Ok(requester) = self.directory.get_user(request.requested_by).await {
            let note = NewNotification::announcement(
                "Staff Assignment Rejected",
                format!(
                    "The manager has declined your request to assign {} to the \
                     project \"{}\". You may need to find a replacement.",
                    staff_name, project.name
                ),
            )
            .with_project(project.id);
            if let Err(e) = self.dispatcher.notify(&requester, &note).await {
                tracing::error!(user_id = requester.id, error = %e, "Rejection notification failed");
            }
        }
    }
}
