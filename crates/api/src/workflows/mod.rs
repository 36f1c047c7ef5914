//! Staffing workflow services.
//!
//! Each service is constructed once at startup with its collaborators
//! (pool, [`Directory`], dispatcher) and shared through
//! [`AppState`](crate::state::AppState).
//!
//! - [`Directory`]: read-only user lookup.
//! - [`StaffingAllocator`]: project creation and team membership.
//! - [`ApprovalService`]: borrow request decisions.
//! - [`CompletionEngine`]: completion (skill transfer) and teardown.

pub mod approval;
pub mod completion;
pub mod directory;
pub mod staffing;

pub use approval::ApprovalService;
pub use completion::CompletionEngine;
pub use directory::Directory;
pub use staffing::StaffingAllocator;
