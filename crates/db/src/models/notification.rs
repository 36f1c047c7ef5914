//! Notification entity models and DTOs.

use devalign_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// General informational notification.
pub const KIND_ANNOUNCEMENT: &str = "announcement";

/// A notification that asks a manager to decide a borrow request.
pub const KIND_PROJECT_APPROVAL: &str = "project_approval";

/// A row from the `notifications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub message: String,
    pub kind: String,
    pub is_read: bool,
    pub related_project: Option<DbId>,
    pub related_borrow_request: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a notification. One record per recipient per event.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub title: String,
    pub message: String,
    pub kind: &'static str,
    pub related_project: Option<DbId>,
    pub related_borrow_request: Option<DbId>,
}

impl NewNotification {
    /// An `announcement` notification with no related entities.
    pub fn announcement(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            kind: KIND_ANNOUNCEMENT,
            related_project: None,
            related_borrow_request: None,
        }
    }

    /// Attach a related project.
    pub fn with_project(mut self, project_id: DbId) -> Self {
        self.related_project = Some(project_id);
        self
    }

    /// Attach a related borrow request and mark the notification as an
    /// approval ask.
    pub fn approval_ask(mut self, borrow_request_id: DbId) -> Self {
        self.kind = KIND_PROJECT_APPROVAL;
        self.related_borrow_request = Some(borrow_request_id);
        self
    }
}
