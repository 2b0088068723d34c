//! Role/assignment directory.
//!
//! Resolves who is responsible for a (campus, complaint type) pair: the
//! single coordinator, that coordinator's workers, and the users a given
//! actor may hand a complaint to next. Also owns admin-only role
//! provisioning, where the scope and uniqueness invariants are enforced.

use std::collections::HashMap;

use campusfix_common::{AppError, AppResult, IdGenerator};
use campusfix_db::{
    entities::{
        role_assignment::{self, RoleKind},
        user,
    },
    repositories::{
        CampusRepository, ComplaintRepository, ComplaintTypeRepository, RoleAssignmentRepository,
        UserRepository,
    },
};
use sea_orm::Set;

use crate::roles::RoleSet;

/// Input for provisioning a role assignment.
#[derive(Debug)]
pub struct AssignRoleInput {
    pub user_id: String,
    /// Wire name of the role.
    pub role: String,
    pub campus_id: Option<String>,
    pub complaint_type_id: Option<String>,
}

/// Input for editing an existing role assignment.
#[derive(Debug)]
pub struct UpdateRoleInput {
    pub assignment_id: String,
    /// Wire name of the role.
    pub role: String,
    pub campus_id: Option<String>,
    pub complaint_type_id: Option<String>,
}

/// Role/assignment directory service.
#[derive(Clone)]
pub struct DirectoryService {
    role_repo: RoleAssignmentRepository,
    user_repo: UserRepository,
    campus_repo: CampusRepository,
    complaint_type_repo: ComplaintTypeRepository,
    complaint_repo: ComplaintRepository,
    id_gen: IdGenerator,
}

impl DirectoryService {
    /// Create a new directory service.
    #[must_use]
    pub const fn new(
        role_repo: RoleAssignmentRepository,
        user_repo: UserRepository,
        campus_repo: CampusRepository,
        complaint_type_repo: ComplaintTypeRepository,
        complaint_repo: ComplaintRepository,
    ) -> Self {
        Self {
            role_repo,
            user_repo,
            campus_repo,
            complaint_type_repo,
            complaint_repo,
            id_gen: IdGenerator::new(),
        }
    }

    // ========== Queries ==========

    /// The coordinator responsible for a (campus, complaint type) pair.
    ///
    /// `None` is a valid, expected state: the pair simply has no
    /// provisioned coordinator yet.
    pub async fn coordinator_for(
        &self,
        campus_id: &str,
        complaint_type_id: &str,
    ) -> AppResult<Option<user::Model>> {
        match self
            .role_repo
            .find_coordinator(campus_id, complaint_type_id)
            .await?
        {
            Some(assignment) => Ok(Some(self.user_repo.get_by_id(&assignment.user_id).await?)),
            None => Ok(None),
        }
    }

    /// The workers provisioned for a (campus, complaint type) pair, in the
    /// order they were provisioned.
    pub async fn workers_for(
        &self,
        campus_id: &str,
        complaint_type_id: &str,
    ) -> AppResult<Vec<user::Model>> {
        let assignments = self
            .role_repo
            .find_workers(campus_id, complaint_type_id)
            .await?;
        let ids: Vec<String> = assignments.iter().map(|a| a.user_id.clone()).collect();
        let mut by_id: HashMap<String, user::Model> = self
            .user_repo
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .map(|u| (u.id.clone(), u))
            .collect();

        // Re-apply the assignment order; find_by_ids gives no ordering.
        Ok(assignments
            .iter()
            .filter_map(|a| by_id.remove(&a.user_id))
            .collect())
    }

    /// The users the actor may hand this complaint to next.
    ///
    /// Workers delegate to no one; a coordinator delegates to the workers
    /// of the complaint's (campus, type); overseers route to the pair's
    /// coordinator. A pair with no provisioned coordinator yields an empty
    /// set.
    pub async fn assignable_targets_for(
        &self,
        actor: &user::Model,
        complaint_id: &str,
    ) -> AppResult<Vec<user::Model>> {
        let complaint = self.complaint_repo.get_by_id(complaint_id).await?;
        let roles = self.roles_for(&actor.id).await?;

        if roles.is_overseer() {
            let coordinator = self
                .coordinator_for(&complaint.campus_id, &complaint.complaint_type_id)
                .await?;
            return Ok(coordinator.into_iter().collect());
        }

        if roles.has_role(RoleKind::Coordinator) {
            return self
                .workers_for(&complaint.campus_id, &complaint.complaint_type_id)
                .await;
        }

        Ok(Vec::new())
    }

    /// A user's role assignments, earliest first (the first is the primary
    /// role). Admin only.
    pub async fn roles_for_user(
        &self,
        actor: &user::Model,
        user_id: &str,
    ) -> AppResult<Vec<role_assignment::Model>> {
        self.require_admin(actor).await?;
        self.user_repo.get_by_id(user_id).await?;
        self.role_repo.find_for_user(user_id).await
    }

    // ========== Provisioning (admin only) ==========

    /// Provision a role assignment for a user.
    pub async fn assign_role(
        &self,
        actor: &user::Model,
        input: AssignRoleInput,
    ) -> AppResult<role_assignment::Model> {
        self.require_admin(actor).await?;

        let role = RoleKind::parse(input.role.trim())
            .ok_or_else(|| AppError::Validation(format!("Invalid role: {}", input.role.trim())))?;

        let target = self.user_repo.get_by_id(&input.user_id).await?;
        let scope = self
            .validate_scope(role, input.campus_id, input.complaint_type_id)
            .await?;
        let (campus_id, complaint_type_id) = scope.map_or((None, None), |(c, t)| (Some(c), Some(t)));

        let model = role_assignment::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(target.id.clone()),
            role: Set(role),
            campus_id: Set(campus_id.clone()),
            complaint_type_id: Set(complaint_type_id.clone()),
            created_at: Set(chrono::Utc::now().into()),
        };

        let created = if role == RoleKind::Coordinator {
            // Check-then-insert inside one transaction so the pair cannot
            // end up with two coordinators.
            let txn = self.role_repo.begin().await?;
            if let (Some(campus_id), Some(complaint_type_id)) =
                (campus_id.as_deref(), complaint_type_id.as_deref())
            {
                let existing = self
                    .role_repo
                    .find_coordinator_tx(&txn, campus_id, complaint_type_id)
                    .await?;
                if existing.is_some() {
                    return Err(AppError::Conflict(
                        "A coordinator for this campus and complaint type already exists"
                            .to_string(),
                    ));
                }
            }
            let created = self.role_repo.create_tx(&txn, model).await?;
            txn.commit()
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            created
        } else {
            self.role_repo.create(model).await?
        };

        tracing::info!(
            user_id = %created.user_id,
            role = role.as_str(),
            actor_id = %actor.id,
            "Role assignment provisioned"
        );
        Ok(created)
    }

    /// Edit an existing role assignment.
    pub async fn update_role(
        &self,
        actor: &user::Model,
        input: UpdateRoleInput,
    ) -> AppResult<role_assignment::Model> {
        self.require_admin(actor).await?;

        let role = RoleKind::parse(input.role.trim())
            .ok_or_else(|| AppError::Validation(format!("Invalid role: {}", input.role.trim())))?;

        let existing = self.role_repo.get_by_id(&input.assignment_id).await?;
        let scope = self
            .validate_scope(role, input.campus_id, input.complaint_type_id)
            .await?;
        let (campus_id, complaint_type_id) = scope.map_or((None, None), |(c, t)| (Some(c), Some(t)));

        let txn = self.role_repo.begin().await?;
        if role == RoleKind::Coordinator {
            if let (Some(campus_id), Some(complaint_type_id)) =
                (campus_id.as_deref(), complaint_type_id.as_deref())
            {
                let holder = self
                    .role_repo
                    .find_coordinator_tx(&txn, campus_id, complaint_type_id)
                    .await?;
                if holder.is_some_and(|h| h.id != existing.id) {
                    return Err(AppError::Conflict(
                        "A coordinator for this campus and complaint type already exists"
                            .to_string(),
                    ));
                }
            }
        }

        let mut model: role_assignment::ActiveModel = existing.into();
        model.role = Set(role);
        model.campus_id = Set(campus_id);
        model.complaint_type_id = Set(complaint_type_id);

        let updated = self.role_repo.update_tx(&txn, model).await?;
        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(updated)
    }

    // ========== Helpers ==========

    async fn roles_for(&self, user_id: &str) -> AppResult<RoleSet> {
        Ok(RoleSet::new(self.role_repo.find_for_user(user_id).await?))
    }

    async fn require_admin(&self, actor: &user::Model) -> AppResult<()> {
        let roles = self.roles_for(&actor.id).await?;
        if !roles.is_admin() {
            return Err(AppError::Forbidden(
                "Only admins can manage role assignments".to_string(),
            ));
        }
        Ok(())
    }

    /// Validate the scope-field invariant and the worker exclusion; return
    /// the verified (campus, type) pair for scoped roles.
    async fn validate_scope(
        &self,
        role: RoleKind,
        campus_id: Option<String>,
        complaint_type_id: Option<String>,
    ) -> AppResult<Option<(String, String)>> {
        if role.is_scoped() {
            let (Some(campus_id), Some(complaint_type_id)) = (campus_id, complaint_type_id)
            else {
                return Err(AppError::Validation(
                    "Coordinator and worker roles require a campus and a complaint type"
                        .to_string(),
                ));
            };
            let campus = self.campus_repo.get_by_id(&campus_id).await?;
            let complaint_type = self
                .complaint_type_repo
                .get_by_id(&complaint_type_id)
                .await?;
            if role == RoleKind::Worker && !complaint_type.has_workers {
                return Err(AppError::Validation(format!(
                    "Complaint type {} does not take workers",
                    complaint_type.name
                )));
            }
            Ok(Some((campus.id, complaint_type.id)))
        } else {
            if campus_id.is_some() || complaint_type_id.is_some() {
                return Err(AppError::Validation(
                    "Admin, VP and director roles carry no campus or complaint type".to_string(),
                ));
            }
            Ok(None)
        }
    }
}
