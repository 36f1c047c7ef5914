//! Tech-lead capacity rule.
//!
//! Managers are tech leads automatically and permanently on every project
//! they join. Among non-manager assignments, a project carries at most one
//! tech lead. The rule here produces the user-facing rejection; the store
//! enforces the same limit again with a conditional write so that two
//! concurrent promotions cannot both slip past this check.

use crate::error::CoreError;
use crate::roles::ROLE_MANAGER;

/// Maximum number of non-manager tech leads per project.
pub const MAX_STAFF_TECH_LEADS: i64 = 1;

/// Decide whether a tech-lead change on an assignment is acceptable.
///
/// `other_staff_leads` is the count of non-manager tech-lead assignments on
/// the project, excluding the assignment being changed.
pub fn evaluate_change(
    user_role: &str,
    requested: bool,
    other_staff_leads: i64,
) -> Result<(), CoreError> {
    if user_role == ROLE_MANAGER {
        return Err(CoreError::Immutable(
            "A manager's tech-lead status cannot be changed".to_string(),
        ));
    }
    if requested && other_staff_leads >= MAX_STAFF_TECH_LEADS {
        return Err(CoreError::LimitExceeded(
            "max 1 staff tech lead per project".to_string(),
        ));
    }
    Ok(())
}
