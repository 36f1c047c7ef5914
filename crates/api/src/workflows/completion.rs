//! Project completion and teardown.
//!
//! Completion is edge-triggered: the transition from `active` to
//! `completed` runs the skill transfer exactly once; re-sending `completed`
//! is a no-op. Teardown deletes the project and every dependent record in
//! one transaction, then notifies a membership snapshot taken beforehand.

use devalign_core::error::CoreError;
use devalign_core::roles::ROLE_HR;
use devalign_core::skills::aggregate_by_user;
use devalign_core::status::{validate_project_transition, PROJECT_ACTIVE, PROJECT_COMPLETED};
use devalign_core::types::DbId;
use devalign_db::models::notification::NewNotification;
use devalign_db::models::project::Project;
use devalign_db::repositories::{AssignmentRepo, ProjectRepo, TaskRepo, UserRepo};
use devalign_db::DbPool;
use devalign_events::NotificationDispatcher;

use crate::error::AppResult;
use crate::workflows::directory::Directory;

/// Runs project completion (skill transfer) and teardown.
#[derive(Clone)]
pub struct CompletionEngine {
    pool: DbPool,
    directory: Directory,
    dispatcher: NotificationDispatcher,
}

impl CompletionEngine {
    pub fn new(pool: DbPool, directory: Directory, dispatcher: NotificationDispatcher) -> Self {
        Self {
            pool,
            directory,
            dispatcher,
        }
    }

    /// Apply a status change to a project.
    ///
    /// - `completed` on an active project runs completion.
    /// - `completed` on a completed project returns the project unchanged.
    /// - `active` on a completed project is rejected; the transition is
    ///   one-way.
    pub async fn set_status(&self, project_id: DbId, status: &str) -> AppResult<Project> {
        let project = self.load_project(project_id).await?;
        validate_project_transition(&project.status, status)
            .map_err(CoreError::Validation)?;

        if status == PROJECT_ACTIVE || project.status == PROJECT_COMPLETED {
            return Ok(project);
        }

        self.complete(project).await
    }

    /// Delete a project and everything hanging off it.
    ///
    /// The membership and HR snapshots are taken before the delete so the
    /// teardown notice can still name its recipients afterwards.
    pub async fn delete_project(&self, project_id: DbId) -> AppResult<()> {
        let project = self.load_project(project_id).await?;
        let team = AssignmentRepo::list_team(&self.pool, project_id).await?;
        let member_ids: Vec<DbId> = team.iter().map(|m| m.user_id).collect();
        let mut recipients = self.directory.get_users(&member_ids).await?;
        for hr in self.directory.users_by_role(ROLE_HR).await? {
            if !recipients.iter().any(|u| u.id == hr.id) {
                recipients.push(hr);
            }
        }

        let deleted = ProjectRepo::delete_cascade(&self.pool, project_id).await?;
        if !deleted {
            return Err(CoreError::NotFound {
                entity: "Project",
                id: project_id,
            }
            .into());
        }

        // related_project stays unset: the row it would point at is gone.
        let note = NewNotification::announcement(
            "Project Deleted",
            format!(
                "The project \"{}\" has been deleted. All related assignments and \
                 tasks were removed.",
                project.name
            ),
        );
        self.dispatcher.notify_many(&recipients, &note).await;
        Ok(())
    }

    // -- internals ----------------------------------------------------------

    /// Transfer earned skills, flip the status, notify.
    async fn complete(&self, project: Project) -> AppResult<Project> {
        let earned: Vec<_> = TaskRepo::earned_skills_for_project(&self.pool, project.id)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();
        let by_user = aggregate_by_user(&earned);

        let mut skills_granted = 0u64;
        for (user_id, skill_ids) in &by_user {
            let skill_ids: Vec<DbId> = skill_ids.iter().copied().collect();
            skills_granted += UserRepo::grant_skills(&self.pool, *user_id, &skill_ids).await?;
        }

        let completed = ProjectRepo::complete(&self.pool, project.id)
            .await?
            // Lost the race to a concurrent completion; the transfer above
            // is idempotent, so just report the standing state.
            .unwrap_or(project);

        self.notify_completed(&completed, by_user.len(), skills_granted)
            .await;
        Ok(completed)
    }

    async fn notify_completed(&self, project: &Project, users_affected: usize, skills: u64) {
        let team = match AssignmentRepo::list_team(&self.pool, project.id).await {
            Ok(team) => team,
            Err(e) => {
                tracing::error!(project_id = project.id, error = %e, "Team lookup failed");
                return;
            }
        };
        let member_ids: Vec<DbId> = team.iter().map(|m| m.user_id).collect();
        let members = match self.directory.get_users(&member_ids).await {
            Ok(members) => members,
            Err(e) => {
                tracing::error!(project_id = project.id, error = %e, "Member lookup failed");
                return;
            }
        };

        let note = NewNotification::announcement(
            "Project Completed",
            format!(
                "The project \"{}\" has been completed. Skills from your tasks \
                 have been added to your profile.",
                project.name
            ),
        )
        .with_project(project.id);
        self.dispatcher.notify_many(&members, &note).await;

        if let Ok(hr_users) = self.directory.users_by_role(ROLE_HR).await {
            let note = NewNotification::announcement(
                "Project Completed",
                format!(
                    "The project \"{}\" was completed: {} member profile(s) updated, \
                     {} skill(s) transferred.",
                    project.name, users_affected, skills
                ),
            )
            .with_project(project.id);
            self.dispatcher.notify_many(&hr_users, &note).await;
        }
    }

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
}
