//! Staffing partition rule.
//!
//! When a manager staffs a project, each candidate falls into one of three
//! buckets: direct subordinates are assigned immediately, staff reporting
//! to a different manager need that manager's approval (a borrow request),
//! and staff with no manager on record cannot be placed at all.

use crate::roles::ROLE_MANAGER;
use crate::types::DbId;

/// The facts about a candidate that the partition rule consumes.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub id: DbId,
    pub role: String,
    pub manager_id: Option<DbId>,
}

/// Where a candidate lands relative to the project creator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// Assign immediately. Managers joining a team are tech leads.
    Direct { tech_lead: bool },
    /// A borrow request must be approved by this manager first.
    NeedsApproval { approver: DbId },
    /// No manager on record; nobody can approve the borrow.
    Unassignable,
}

/// Classify one candidate against the project creator.
pub fn classify(creator_id: DbId, candidate: &Candidate) -> Placement {
    match candidate.manager_id {
        Some(manager_id) if manager_id == creator_id => Placement::Direct {
            tech_lead: candidate.role == ROLE_MANAGER,
        },
        Some(manager_id) => Placement::NeedsApproval {
            approver: manager_id,
        },
        None => Placement::Unassignable,
    }
}

/// Drop duplicate candidate ids and the creator's own id, preserving order.
///
/// The creator always receives exactly one tech-lead assignment up front;
/// listing them among the candidates must not produce a second row.
pub fn dedup_candidates(creator_id: DbId, staff_ids: &[DbId]) -> Vec<DbId> {
    let mut seen = std::collections::BTreeSet::new();
    staff_ids
        .iter()
        .copied()
        .filter(|id| *id != creator_id && seen.insert(*id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::{ROLE_MANAGER, ROLE_STAFF};

    fn staff(id: DbId, manager_id: Option<DbId>) -> Candidate {
        Candidate {
            id,
            role: ROLE_STAFF.to_string(),
            manager_id,
        }
    }

    #[test]
    fn test_direct_subordinate_assigned_directly() {
        let placement = classify(1, &staff(10, Some(1)));
        assert_eq!(placement, Placement::Direct { tech_lead: false });
    }

    #[test]
    fn test_other_managers_report_needs_approval() {
        let placement = classify(1, &staff(11, Some(2)));
        assert_eq!(placement, Placement::NeedsApproval { approver: 2 });
    }

    #[test]
    fn test_partition_never_reversed() {
        // Candidate A reports to the creator, candidate B to another
        // manager. A must be direct and B must be a borrow, never the
        // other way around.
        let a = staff(10, Some(1));
        let b = staff(11, Some(2));
        assert!(matches!(classify(1, &a), Placement::Direct { .. }));
        assert_eq!(classify(1, &b), Placement::NeedsApproval { approver: 2 });
    }

    #[test]
    fn test_manager_subordinate_becomes_tech_lead() {
        let candidate = Candidate {
            id: 12,
            role: ROLE_MANAGER.to_string(),
            manager_id: Some(1),
        };
        assert_eq!(classify(1, &candidate), Placement::Direct { tech_lead: true });
    }

    #[test]
    fn test_no_manager_is_unassignable() {
        assert_eq!(classify(1, &staff(13, None)), Placement::Unassignable);
    }

    #[test]
    fn test_dedup_drops_creator_and_duplicates() {
        assert_eq!(dedup_candidates(1, &[10, 1, 11, 10, 11]), vec![10, 11]);
    }

    #[test]
    fn test_dedup_preserves_order() {
        assert_eq!(dedup_candidates(1, &[30, 20, 10]), vec![30, 20, 10]);
    }
}
