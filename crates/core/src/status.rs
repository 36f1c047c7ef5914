//! Project and task status constants and transition rules.

/// Project is open for staffing and task work.
pub const PROJECT_ACTIVE: &str = "active";

/// Project is finished; skills have been transferred.
pub const PROJECT_COMPLETED: &str = "completed";

/// All valid project status values.
pub const VALID_PROJECT_STATUSES: &[&str] = &[PROJECT_ACTIVE, PROJECT_COMPLETED];

pub const TASK_TODO: &str = "todo";
pub const TASK_IN_PROGRESS: &str = "in_progress";
pub const TASK_DONE: &str = "done";

/// All valid task status values.
pub const VALID_TASK_STATUSES: &[&str] = &[TASK_TODO, TASK_IN_PROGRESS, TASK_DONE];

/// Validate that a project status string is one of the accepted values.
pub fn validate_project_status(status: &str) -> Result<(), String> {
    if VALID_PROJECT_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(format!(
            "Invalid project status '{status}'. Must be one of: {}",
            VALID_PROJECT_STATUSES.join(", ")
        ))
    }
}

/// Whether a task in this status contributes its required skills at
/// project completion. Unstarted work transfers nothing.
pub fn task_counts_for_skill_transfer(status: &str) -> bool {
    status == TASK_IN_PROGRESS || status == TASK_DONE
}

/// Project status transitions are one-way: `active -> completed`.
///
/// Re-sending the current status is allowed (and treated as a no-op by the
/// completion engine); reopening a completed project is not.
pub fn validate_project_transition(from: &str, to: &str) -> Result<(), String> {
    if from == PROJECT_COMPLETED && to == PROJECT_ACTIVE {
        return Err("A completed project cannot be reopened".to_string());
    }
    validate_project_status(to)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_project_statuses_accepted() {
        assert!(validate_project_status(PROJECT_ACTIVE).is_ok());
        assert!(validate_project_status(PROJECT_COMPLETED).is_ok());
    }

    #[test]
    fn test_invalid_project_status_rejected() {
        let result = validate_project_status("on_hold");
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Invalid project status"));
    }

    #[test]
    fn test_skill_transfer_excludes_todo() {
        assert!(!task_counts_for_skill_transfer(TASK_TODO));
        assert!(task_counts_for_skill_transfer(TASK_IN_PROGRESS));
        assert!(task_counts_for_skill_transfer(TASK_DONE));
    }

    #[test]
    fn test_completed_to_active_rejected() {
        let result = validate_project_transition(PROJECT_COMPLETED, PROJECT_ACTIVE);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("cannot be reopened"));
    }

    #[test]
    fn test_active_to_completed_allowed() {
        assert!(validate_project_transition(PROJECT_ACTIVE, PROJECT_COMPLETED).is_ok());
    }

    #[test]
    fn test_resending_current_status_allowed() {
        assert!(validate_project_transition(PROJECT_COMPLETED, PROJECT_COMPLETED).is_ok());
        assert!(validate_project_transition(PROJECT_ACTIVE, PROJECT_ACTIVE).is_ok());
    }
}
