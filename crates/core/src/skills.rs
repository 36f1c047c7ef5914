//! Skill-transfer aggregation for project completion.
//!
//! A completed project propagates the required skills of every started
//! task (`in_progress` or `done`) to the users assigned to that task. The
//! persistence layer is handed one deduplicated skill set per user so each
//! affected profile is written exactly once, not once per task assignment.

use std::collections::{BTreeMap, BTreeSet};

use crate::types::DbId;

/// One (task assignee, required skill) pair harvested from the store.
#[derive(Debug, Clone)]
pub struct EarnedSkill {
    pub user_id: DbId,
    pub skill_id: DbId,
}

/// Group earned skills by user, deduplicating within each user.
///
/// BTree containers keep the output deterministic, which also keeps the
/// per-user write order stable across runs.
pub fn aggregate_by_user(earned: &[EarnedSkill]) -> BTreeMap<DbId, BTreeSet<DbId>> {
    let mut by_user: BTreeMap<DbId, BTreeSet<DbId>> = BTreeMap::new();
    for e in earned {
        by_user.entry(e.user_id).or_default().insert(e.skill_id);
    }
    by_user
}

#[cfg(test)]
mod tests {
    use super::*;

    fn earned(user_id: DbId, skill_id: DbId) -> EarnedSkill {
        EarnedSkill { user_id, skill_id }
    }

    #[test]
    fn test_skills_grouped_per_user() {
        let rows = vec![earned(1, 10), earned(2, 10), earned(1, 11)];
        let by_user = aggregate_by_user(&rows);
        assert_eq!(by_user.len(), 2);
        assert_eq!(by_user[&1], BTreeSet::from([10, 11]));
        assert_eq!(by_user[&2], BTreeSet::from([10]));
    }

    #[test]
    fn test_duplicate_pairs_collapse() {
        // The same user working two tasks that both require skill 10 must
        // yield a single entry.
        let rows = vec![earned(1, 10), earned(1, 10), earned(1, 10)];
        let by_user = aggregate_by_user(&rows);
        assert_eq!(by_user[&1], BTreeSet::from([10]));
    }

    #[test]
    fn test_empty_input_yields_empty_map() {
        assert!(aggregate_by_user(&[]).is_empty());
    }
}
