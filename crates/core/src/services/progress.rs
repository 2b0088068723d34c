//! Progress update service.
//!
//! Progress updates are free-text notes appended to a complaint by the
//! people working it. They are append-only and never edited.

use campusfix_common::{AppError, AppResult, IdGenerator};
use campusfix_db::{
    entities::{progress_update, user},
    repositories::{ComplaintRepository, ProgressUpdateRepository, RoleAssignmentRepository},
};
use sea_orm::Set;
use validator::Validate;

use crate::lifecycle;
use crate::roles::RoleSet;

/// Input for appending a progress update.
#[derive(Debug, Validate)]
pub struct CreateProgressInput {
    pub complaint_id: String,

    #[validate(length(min = 1, max = 4000))]
    pub notes: String,
}

/// Progress update service.
#[derive(Clone)]
pub struct ProgressService {
    progress_repo: ProgressUpdateRepository,
    complaint_repo: ComplaintRepository,
    role_repo: RoleAssignmentRepository,
    id_gen: IdGenerator,
}

impl ProgressService {
    /// Create a new progress service.
    #[must_use]
    pub const fn new(
        progress_repo: ProgressUpdateRepository,
        complaint_repo: ComplaintRepository,
        role_repo: RoleAssignmentRepository,
    ) -> Self {
        Self {
            progress_repo,
            complaint_repo,
            role_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Append a progress update to a complaint.
    ///
    /// Whoever may drive the complaint's transitions may record progress on
    /// it: the admin, the assigned coordinator or the assigned worker.
    pub async fn create(
        &self,
        actor: &user::Model,
        input: CreateProgressInput,
    ) -> AppResult<progress_update::Model> {
        input.validate()?;

        let notes = input.notes.trim();
        if notes.is_empty() {
            return Err(AppError::Validation(
                "Progress notes are required".to_string(),
            ));
        }

        let complaint = self.complaint_repo.get_by_id(&input.complaint_id).await?;
        let roles = self.roles_for(&actor.id).await?;
        lifecycle::authorize_transition(&actor.id, &roles, &complaint)?;

        let model = progress_update::ActiveModel {
            id: Set(self.id_gen.generate()),
            complaint_id: Set(complaint.id),
            author_id: Set(actor.id.clone()),
            notes: Set(notes.to_string()),
            created_at: Set(chrono::Utc::now().into()),
        };

        self.progress_repo.create(model).await
    }

    /// List a complaint's progress updates, oldest first.
    ///
    /// Readable by anyone who can see the complaint itself: overseers plus
    /// the assigned coordinator and worker.
    pub async fn list(
        &self,
        actor: &user::Model,
        complaint_id: &str,
    ) -> AppResult<Vec<progress_update::Model>> {
        let complaint = self.complaint_repo.get_by_id(complaint_id).await?;
        let roles = self.roles_for(&actor.id).await?;

        if !roles.is_overseer() {
            lifecycle::authorize_transition(&actor.id, &roles, &complaint)?;
        }

        self.progress_repo.list_for_complaint(&complaint.id).await
    }

    async fn roles_for(&self, user_id: &str) -> AppResult<RoleSet> {
        Ok(RoleSet::new(self.role_repo.find_for_user(user_id).await?))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use campusfix_db::entities::{
        complaint::{self, ComplaintStatus},
        role_assignment::{self, RoleKind},
    };
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn service_with(db: Arc<sea_orm::DatabaseConnection>) -> ProgressService {
        ProgressService::new(
            ProgressUpdateRepository::new(db.clone()),
            ComplaintRepository::new(db.clone()),
            RoleAssignmentRepository::new(db),
        )
    }

    fn test_user(id: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: id.to_string(),
            name: id.to_string(),
            email: None,
            token: format!("token_{id}"),
            created_at: Utc::now().into(),
        }
    }

    fn test_complaint(worker_id: Option<&str>) -> complaint::Model {
        let now = Utc::now();
        complaint::Model {
            id: "c1".to_string(),
            ticket_code: "CMP-1A2B3C4D".to_string(),
            campus_id: "main".to_string(),
            complaint_type_id: "plumbing".to_string(),
            location: "Dorm A".to_string(),
            description: "Leaky pipe".to_string(),
            image_path: None,
            status: ComplaintStatus::InProgress,
            coordinator_id: Some("coord1".to_string()),
            worker_id: worker_id.map(str::to_string),
            resolution_notes: None,
            resolution_image_path: None,
            resolved_at: None,
            verified_at: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn worker_assignment(user_id: &str) -> role_assignment::Model {
        role_assignment::Model {
            id: format!("ra-{user_id}"),
            user_id: user_id.to_string(),
            role: RoleKind::Worker,
            campus_id: Some("main".to_string()),
            complaint_type_id: Some("plumbing".to_string()),
            created_at: Utc::now().into(),
        }
    }

    fn progress(id: &str, notes: &str) -> progress_update::Model {
        progress_update::Model {
            id: id.to_string(),
            complaint_id: "c1".to_string(),
            author_id: "worker1".to_string(),
            notes: notes.to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_assigned_worker_appends_progress() {
        let created = progress("p1", "Started draining the line");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_complaint(Some("worker1"))]])
                .append_query_results([[worker_assignment("worker1")]])
                .append_query_results([[created.clone()]])
                .into_connection(),
        );
        let service = service_with(db);

        let result = service
            .create(
                &test_user("worker1"),
                CreateProgressInput {
                    complaint_id: "c1".to_string(),
                    notes: "Started draining the line".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(result.notes, "Started draining the line");
    }

    #[tokio::test]
    async fn test_unassigned_worker_cannot_append() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_complaint(Some("worker1"))]])
                .append_query_results([[worker_assignment("worker2")]])
                .into_connection(),
        );
        let service = service_with(db);

        let result = service
            .create(
                &test_user("worker2"),
                CreateProgressInput {
                    complaint_id: "c1".to_string(),
                    notes: "Trying to help".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_blank_notes_rejected() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = service_with(db);

        let result = service
            .create(
                &test_user("worker1"),
                CreateProgressInput {
                    complaint_id: "c1".to_string(),
                    notes: "   ".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_overseer_lists_progress() {
        let vp_role = role_assignment::Model {
            id: "ra-vp".to_string(),
            user_id: "vp1".to_string(),
            role: RoleKind::Vp,
            campus_id: None,
            complaint_type_id: None,
            created_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_complaint(Some("worker1"))]])
                .append_query_results([[vp_role]])
                .append_query_results([[
                    progress("p1", "Drained the line"),
                    progress("p2", "Replaced the washer"),
                ]])
                .into_connection(),
        );
        let service = service_with(db);

        let result = service.list(&test_user("vp1"), "c1").await.unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].notes, "Drained the line");
    }
}
