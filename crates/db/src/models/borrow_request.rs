//! Borrow request models and the approval state machine's state type.

use devalign_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// State of a borrow request.
///
/// `Pending` is the only state that accepts a transition; `Approved` and
/// `Rejected` are terminal. Persisted as lowercase text, matching the CHECK
/// constraint on `borrow_requests.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    /// Whether the state accepts no further transitions.
    pub fn is_terminal(self) -> bool {
        self != ApprovalStatus::Pending
    }

    /// Past-tense form used in error messages and notifications.
    pub fn as_decision(self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
        }
    }

    /// The terminal state for a boolean approve/reject decision.
    pub fn from_decision(approve: bool) -> Self {
        if approve {
            ApprovalStatus::Approved
        } else {
            ApprovalStatus::Rejected
        }
    }
}

/// A row from the `borrow_requests` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BorrowRequest {
    pub id: DbId,
    pub project_id: DbId,
    pub staff_id: DbId,
    pub requested_by: DbId,
    pub approved_by: DbId,
    pub status: ApprovalStatus,
    pub decided_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a new borrow request (always pending).
#[derive(Debug, Clone)]
pub struct CreateBorrowRequest {
    pub project_id: DbId,
    pub staff_id: DbId,
    pub requested_by: DbId,
    pub approved_by: DbId,
}

/// Request body for the respond endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RespondRequest {
    pub approve: bool,
}

/// A borrow request joined with display context for approver queues.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BorrowRequestWithContext {
    pub id: DbId,
    pub project_id: DbId,
    pub project_name: String,
    pub staff_id: DbId,
    pub staff_name: String,
    pub requested_by: DbId,
    pub requested_by_name: String,
    pub status: ApprovalStatus,
    pub created_at: Timestamp,
}
