//! Staffing allocator: project creation and team membership.
//!
//! Candidates are partitioned by `core::staffing::classify`: direct
//! subordinates of the project's manager are assigned immediately, staff
//! under another manager get a pending borrow request, and staff with no
//! manager on record are reported back as unassignable.

use serde::Serialize;

use devalign_core::error::CoreError;
use devalign_core::roles::{ROLE_HR, ROLE_MANAGER};
use devalign_core::staffing::{classify, dedup_candidates, Candidate, Placement};
use devalign_core::tech_lead;
use devalign_core::types::DbId;
use devalign_db::models::assignment::ProjectAssignment;
use devalign_db::models::borrow_request::{BorrowRequest, CreateBorrowRequest};
use devalign_db::models::notification::NewNotification;
use devalign_db::models::project::{CreateProject, CreateProjectWithStaffing, Project};
use devalign_db::models::user::User;
use devalign_db::repositories::{AssignmentRepo, BorrowRequestRepo, ProjectRepo};
use devalign_db::DbPool;
use devalign_events::NotificationDispatcher;

use crate::error::AppResult;
use crate::workflows::directory::Directory;

/// Outcome of a staffing pass.
#[derive(Debug, Serialize)]
pub struct StaffingResult {
    pub project: Project,
    pub assignments: Vec<ProjectAssignment>,
    pub pending_borrow_requests: Vec<BorrowRequest>,
    /// Candidate ids with no manager on record. Reported, never silently
    /// dropped.
    pub unassignable: Vec<DbId>,
}

/// Creates projects and manages team membership.
#[derive(Clone)]
pub struct StaffingAllocator {
    pool: DbPool,
    directory: Directory,
    dispatcher: NotificationDispatcher,
}

impl StaffingAllocator {
    pub fn new(pool: DbPool, directory: Directory, dispatcher: NotificationDispatcher) -> Self {
        Self {
            pool,
            directory,
            dispatcher,
        }
    }

    /// Create a project and staff it in one pass.
    ///
    /// Candidate resolution is all-or-nothing: an unknown id fails the call
    /// before anything is written. Notification failures after the project
    /// exists are best-effort.
    pub async fn create_project_with_staffing(
        &self,
        creator_id: DbId,
        input: CreateProjectWithStaffing,
    ) -> AppResult<StaffingResult> {
        let creator = self.directory.get_user(creator_id).await?;
        if creator.role != ROLE_MANAGER {
            return Err(CoreError::Forbidden(
                "Only managers can create projects".to_string(),
            )
            .into());
        }

        let candidate_ids = dedup_candidates(creator.id, &input.staff_ids);
        let candidates = self.directory.get_users(&candidate_ids).await?;

        let project = ProjectRepo::create(
            &self.pool,
            &CreateProject {
                name: input.name,
                description: input.description,
                start_date: input.start_date,
                deadline: input.deadline,
                created_by: creator.id,
            },
        )
        .await?;

        // The creator leads the team; the seeded counter of 1 is theirs.
        AssignmentRepo::create_if_absent(&self.pool, project.id, creator.id, true).await?;

        let mut result = self.place_candidates(&project, &creator, &candidates).await?;
        self.notify_hr_summary(
            &creator,
            &project,
            &result,
            "New Project Created",
            "created the project",
        )
        .await;
        result.project = self.load_project(project.id).await?;

        result.assignments = {
            let mut all = Vec::with_capacity(result.assignments.len() + 1);
            if let Some(own) = AssignmentRepo::find(&self.pool, project.id, creator.id).await? {
                all.push(own);
            }
            all.extend(result.assignments);
            all
        };
        Ok(result)
    }

    /// Staff additional candidates onto an existing project.
    ///
    /// Classification runs against the project's creating manager, not the
    /// actor, so borrow requests always name the right approver.
    pub async fn add_staff(
        &self,
        actor_id: DbId,
        project_id: DbId,
        staff_ids: &[DbId],
    ) -> AppResult<StaffingResult> {
        let project = self.load_project(project_id).await?;
        let creator = self.directory.get_user(project.created_by).await?;
        self.ensure_can_manage(actor_id, &project).await?;

        let candidate_ids = dedup_candidates(creator.id, staff_ids);
        let candidates = self.directory.get_users(&candidate_ids).await?;

        let mut result = self.place_candidates(&project, &creator, &candidates).await?;
        if !result.assignments.is_empty() || !result.pending_borrow_requests.is_empty() {
            let actor = self.directory.get_user(actor_id).await?;
            self.notify_hr_summary(
                &actor,
                &project,
                &result,
                "Project Staffing Updated",
                "added staff to the project",
            )
            .await;
        }
        result.project = self.load_project(project_id).await?;
        Ok(result)
    }

    /// Remove members from a project, decrementing the counter by the
    /// number of rows actually deleted. The creator cannot be removed.
    pub async fn remove_staff(
        &self,
        actor_id: DbId,
        project_id: DbId,
        staff_ids: &[DbId],
    ) -> AppResult<Project> {
        let project = self.load_project(project_id).await?;
        self.ensure_can_manage(actor_id, &project).await?;

        if staff_ids.contains(&project.created_by) {
            return Err(CoreError::Forbidden(
                "The project creator cannot be removed from the team".to_string(),
            )
            .into());
        }

        let mut removed = 0i32;
        for staff_id in staff_ids {
            if AssignmentRepo::remove(&self.pool, project_id, *staff_id).await? {
                removed += 1;
            }
        }
        if removed > 0 {
            ProjectRepo::adjust_member_count(&self.pool, project_id, -removed).await?;
        }
        self.load_project(project_id).await
    }

    /// Replace the project's staffed team with the requested membership.
    ///
    /// Diffs current vs requested: members absent from the request are
    /// removed, new ids go through the usual placement pass. The creator is
    /// always kept.
    pub async fn replace_staff(
        &self,
        actor_id: DbId,
        project_id: DbId,
        staff_ids: &[DbId],
    ) -> AppResult<StaffingResult> {
        let project = self.load_project(project_id).await?;
        self.ensure_can_manage(actor_id, &project).await?;

        let requested = dedup_candidates(project.created_by, staff_ids);
        let current = AssignmentRepo::list_team(&self.pool, project_id).await?;

        let to_remove: Vec<DbId> = current
            .iter()
            .map(|m| m.user_id)
            .filter(|id| *id != project.created_by && !requested.contains(id))
            .collect();
        if !to_remove.is_empty() {
            self.remove_staff(actor_id, project_id, &to_remove).await?;
        }

        self.add_staff(actor_id, project_id, &requested).await
    }

    /// Change a member's tech-lead flag, subject to the capacity rule.
    ///
    /// The rule is checked up front for a precise error, then enforced again
    /// by the locked promotion so concurrent requests cannot both win. A
    /// demotion has no capacity to compete for; its write only comes back
    /// false when the assignment is gone.
    pub async fn set_tech_lead(
        &self,
        project_id: DbId,
        user_id: DbId,
        requested: bool,
    ) -> AppResult<ProjectAssignment> {
        let _project = self.load_project(project_id).await?;
        let member = self.directory.get_user(user_id).await?;

        let changed = if requested {
            if AssignmentRepo::find(&self.pool, project_id, user_id)
                .await?
                .is_none()
            {
                return Err(CoreError::NotFound {
                    entity: "Assignment",
                    id: user_id,
                }
                .into());
            }
            let other_leads =
                AssignmentRepo::staff_lead_count_excluding(&self.pool, project_id, user_id).await?;
            tech_lead::evaluate_change(&member.role, true, other_leads)?;
            AssignmentRepo::promote_staff_lead(&self.pool, project_id, user_id).await?
        } else {
            tech_lead::evaluate_change(&member.role, false, 0)?;
            AssignmentRepo::demote_tech_lead(&self.pool, project_id, user_id).await?
        };
        if !changed {
            return Err(if requested {
                // Another promotion won between the check and the write.
                CoreError::LimitExceeded("max 1 staff tech lead per project".to_string())
            } else {
                CoreError::NotFound {
                    entity: "Assignment",
                    id: user_id,
                }
            }
            .into());
        }

        AssignmentRepo::find(&self.pool, project_id, user_id)
            .await?
            .ok_or_else(|| {
                CoreError::NotFound {
                    entity: "Assignment",
                    id: user_id,
                }
                .into()
            })
    }

    // -- internals ----------------------------------------------------------

    async fn load_project(&self, project_id: DbId) -> AppResult<Project> {
        ProjectRepo::find_by_id(&self.pool, project_id)
            .await?
            .ok_or_else(|| {
                CoreError::NotFound {
                    entity: "Project",
                    id: project_id,
                }
                .into()
            })
    }

    /// Team changes are open to the creating manager and HR.
    async fn ensure_can_manage(&self, actor_id: DbId, project: &Project) -> AppResult<()> {
        if actor_id == project.created_by {
            return Ok(());
        }
        let actor = self.directory.get_user(actor_id).await?;
        if actor.role == ROLE_HR {
            return Ok(());
        }
        Err(CoreError::Forbidden(
            "Only the project's manager or HR can change the team".to_string(),
        )
        .into())
    }

    /// Run the partition over resolved candidates and apply each bucket.
    async fn place_candidates(
        &self,
        project: &Project,
        creator: &User,
        candidates: &[User],
    ) -> AppResult<StaffingResult> {
        let mut assignments = Vec::new();
        let mut pending = Vec::new();
        let mut unassignable = Vec::new();
        let mut direct_inserted = 0i32;

        for user in candidates {
            let candidate = Candidate {
                id: user.id,
                role: user.role.clone(),
                manager_id: user.manager_id,
            };
            match classify(creator.id, &candidate) {
                Placement::Direct { tech_lead } => {
                    let inserted =
                        AssignmentRepo::create_if_absent(&self.pool, project.id, user.id, tech_lead)
                            .await?;
                    if !inserted {
                        continue; // already on the team
                    }
                    direct_inserted += 1;
                    if let Some(assignment) =
                        AssignmentRepo::find(&self.pool, project.id, user.id).await?
                    {
                        assignments.push(assignment);
                    }
                    let note = NewNotification::announcement(
                        "New Project Assignment",
                        format!(
                            "You have been assigned to the project \"{}\".",
                            project.name
                        ),
                    )
                    .with_project(project.id);
                    if let Err(e) = self.dispatcher.notify(user, &note).await {
                        tracing::error!(user_id = user.id, error = %e, "Assignment notification failed");
                    }
                }
                Placement::NeedsApproval { approver } => {
                    if BorrowRequestRepo::pending_exists(&self.pool, project.id, user.id).await? {
                        continue; // an identical ask is already in flight
                    }
                    let request = BorrowRequestRepo::create(
                        &self.pool,
                        &CreateBorrowRequest {
                            project_id: project.id,
                            staff_id: user.id,
                            requested_by: creator.id,
                            approved_by: approver,
                        },
                    )
                    .await?;
                    self.notify_borrow_created(project, creator, user, &request)
                        .await;
                    pending.push(request);
                }
                Placement::Unassignable => {
                    tracing::warn!(
                        user_id = user.id,
                        project_id = project.id,
                        "Candidate has no manager on record, cannot be placed"
                    );
                    unassignable.push(user.id);
                }
            }
        }

        if direct_inserted > 0 {
            ProjectRepo::adjust_member_count(&self.pool, project.id, direct_inserted).await?;
        }

        Ok(StaffingResult {
            project: project.clone(),
            assignments,
            pending_borrow_requests: pending,
            unassignable,
        })
    }

    /// Notify the approving manager and the candidate about a new pending
    /// borrow request. Best-effort.
    async fn notify_borrow_created(
        &self,
        project: &Project,
        creator: &User,
        staff: &User,
        request: &BorrowRequest,
    ) {
        match self.directory.get_user(request.approved_by).await {
            Ok(approver) => {
                let ask = NewNotification::announcement(
                    "Staff Assignment Approval Needed",
                    format!(
                        "{} has requested to assign {} to the project \"{}\". \
                         Please approve or reject this request.",
                        creator.name, staff.name, project.name
                    ),
                )
                .with_project(project.id)
                .approval_ask(request.id);
                if let Err(e) = self.dispatcher.notify(&approver, &ask).await {
                    tracing::error!(user_id = approver.id, error = %e, "Approver notification failed");
                }
            }
            Err(e) => {
                tracing::error!(request_id = request.id, error = %e, "Approver lookup failed");
            }
        }

        let pending_note = NewNotification::announcement(
            "Pending Project Assignment",
            format!(
                "{} has requested to assign you to the project \"{}\". \
                 Waiting for your manager's approval.",
                creator.name, project.name
            ),
        )
        .with_project(project.id);
        if let Err(e) = self.dispatcher.notify(staff, &pending_note).await {
            tracing::error!(user_id = staff.id, error = %e, "Pending notification failed");
        }
    }

    /// Give HR a per-project staffing summary. Best-effort.
    async fn notify_hr_summary(
        &self,
        actor: &User,
        project: &Project,
        result: &StaffingResult,
        title: &str,
        action: &str,
    ) {
        let hr_users = match self.directory.users_by_role(ROLE_HR).await {
            Ok(users) => users,
            Err(e) => {
                tracing::error!(error = %e, "HR lookup failed, skipping summary");
                return;
            }
        };
        let note = NewNotification::announcement(
            title,
            format!(
                "{} {} \"{}\" with {} direct assignment(s) and {} pending approval(s).",
                actor.name,
                action,
                project.name,
                result.assignments.len(),
                result.pending_borrow_requests.len()
            ),
        )
        .with_project(project.id);
        self.dispatcher.notify_many(&hr_users, &note).await;
    }
}
