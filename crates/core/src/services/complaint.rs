//! Complaint service: submission, tracking, scoped reads, lifecycle
//! transitions, assignment and dashboard counts.

use std::sync::Arc;

use campusfix_common::{
    AppError, AppResult, IdGenerator,
    storage::{StorageBackend, generate_storage_key},
};
use campusfix_db::{
    entities::{
        complaint::{self, ComplaintStatus},
        role_assignment::RoleKind,
        user,
    },
    repositories::{
        CampusRepository, ComplaintFilter, ComplaintRepository, ComplaintTypeRepository,
        RoleAssignmentRepository, UserRepository,
    },
};
use sea_orm::Set;
use serde::Serialize;
use validator::Validate;

use crate::lifecycle;
use crate::roles::RoleSet;

/// An image accompanying a submission or a transition.
#[derive(Debug, Clone)]
pub struct UploadImage {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Input for submitting a complaint.
#[derive(Debug, Validate)]
pub struct SubmitComplaintInput {
    pub campus_id: String,
    pub complaint_type_id: String,

    #[validate(length(min = 1, max = 512))]
    pub location: String,

    #[validate(length(min = 1, max = 4000))]
    pub description: String,

    pub image: Option<UploadImage>,
}

/// Input for a status transition.
#[derive(Debug)]
pub struct UpdateStatusInput {
    pub complaint_id: String,
    /// Wire name of the target status.
    pub status: String,
    pub resolution_notes: Option<String>,
    pub resolution_image: Option<UploadImage>,
}

/// Input for routing a complaint to a coordinator or worker.
#[derive(Debug)]
pub struct AssignComplaintInput {
    pub complaint_id: String,
    pub target_user_id: String,
}

/// Filters for scoped listings.
#[derive(Debug, Default)]
pub struct ListComplaintsInput {
    /// Wire name of a status to filter by.
    pub status: Option<String>,
    pub campus_id: Option<String>,
    pub complaint_type_id: Option<String>,
    pub limit: u64,
    pub offset: u64,
}

/// Dashboard counts within an actor's visible scope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ComplaintStats {
    pub total: u64,
    pub pending: u64,
    pub assigned: u64,
    pub in_progress: u64,
    pub completed: u64,
    pub verified: u64,
}

/// Complaint service owning the lifecycle state machine.
#[derive(Clone)]
pub struct ComplaintService {
    complaint_repo: ComplaintRepository,
    campus_repo: CampusRepository,
    complaint_type_repo: ComplaintTypeRepository,
    role_repo: RoleAssignmentRepository,
    user_repo: UserRepository,
    storage: Arc<dyn StorageBackend>,
    id_gen: IdGenerator,
}

impl ComplaintService {
    /// Create a new complaint service.
    #[must_use]
    pub const fn new(
        complaint_repo: ComplaintRepository,
        campus_repo: CampusRepository,
        complaint_type_repo: ComplaintTypeRepository,
        role_repo: RoleAssignmentRepository,
        user_repo: UserRepository,
        storage: Arc<dyn StorageBackend>,
    ) -> Self {
        Self {
            complaint_repo,
            campus_repo,
            complaint_type_repo,
            role_repo,
            user_repo,
            storage,
            id_gen: IdGenerator::new(),
        }
    }

    // ========== Submission & Tracking ==========

    /// Submit a new complaint. Public: no acting user.
    ///
    /// The responsible coordinator for the (campus, type) pair, if one is
    /// provisioned, is recorded on the new complaint; the status stays
    /// `pending` until that coordinator assigns a worker.
    pub async fn submit(&self, input: SubmitComplaintInput) -> AppResult<complaint::Model> {
        input.validate()?;

        let location = input.location.trim();
        let description = input.description.trim();
        if location.is_empty() {
            return Err(AppError::Validation("Location is required".to_string()));
        }
        if description.is_empty() {
            return Err(AppError::Validation("Description is required".to_string()));
        }

        // Referenced campus and type must exist.
        let campus = self.campus_repo.get_by_id(&input.campus_id).await?;
        let complaint_type = self
            .complaint_type_repo
            .get_by_id(&input.complaint_type_id)
            .await?;

        let coordinator = self
            .role_repo
            .find_coordinator(&campus.id, &complaint_type.id)
            .await?;

        let image_path = match input.image {
            Some(image) => Some(self.store_image("complaints", &image).await?),
            None => None,
        };

        let now = chrono::Utc::now();
        let id = self.id_gen.generate();
        let ticket_code = self.id_gen.generate_ticket_code();

        let model = complaint::ActiveModel {
            id: Set(id),
            ticket_code: Set(ticket_code.clone()),
            campus_id: Set(campus.id),
            complaint_type_id: Set(complaint_type.id),
            location: Set(location.to_string()),
            description: Set(description.to_string()),
            image_path: Set(image_path),
            status: Set(ComplaintStatus::Pending),
            coordinator_id: Set(coordinator.map(|c| c.user_id)),
            worker_id: Set(None),
            resolution_notes: Set(None),
            resolution_image_path: Set(None),
            resolved_at: Set(None),
            verified_at: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let created = self.complaint_repo.create(model).await?;
        tracing::info!(
            ticket_code = %created.ticket_code,
            campus_id = %created.campus_id,
            complaint_type_id = %created.complaint_type_id,
            "Complaint submitted"
        );
        Ok(created)
    }

    /// Look up a complaint by its ticket code. Public: no acting user.
    pub async fn track(&self, ticket_code: &str) -> AppResult<complaint::Model> {
        let code = ticket_code.trim();
        if code.is_empty() {
            return Err(AppError::Validation("Ticket code is required".to_string()));
        }
        self.complaint_repo.get_by_ticket_code(code).await
    }

    /// Get a complaint by ID.
    pub async fn get(&self, id: &str) -> AppResult<complaint::Model> {
        self.complaint_repo.get_by_id(id).await
    }

    // ========== Scoped Reads ==========

    /// List complaints visible to the actor, newest first.
    ///
    /// Overseers (admin/vp/director) see everything and may filter by
    /// status, campus and type. A coordinator sees the complaints of their
    /// assigned (campus, type) scopes; a worker sees the complaints assigned
    /// to them. Scoped roles take only the status filter; their scope pins
    /// campus and type.
    pub async fn list(
        &self,
        actor: &user::Model,
        input: ListComplaintsInput,
    ) -> AppResult<Vec<complaint::Model>> {
        let status = Self::parse_status_filter(input.status.as_deref())?;
        let roles = self.roles_for(&actor.id).await?;

        if roles.is_overseer() {
            let filter = ComplaintFilter {
                status,
                campus_id: input.campus_id,
                complaint_type_id: input.complaint_type_id,
                ..Default::default()
            };
            return self
                .complaint_repo
                .list(filter, input.limit, input.offset)
                .await;
        }

        let filters = Self::scope_filters(&roles, &actor.id, status)?;
        self.list_merged(filters, input.limit, input.offset).await
    }

    /// Dashboard counts within the actor's scope.
    pub async fn stats(&self, actor: &user::Model) -> AppResult<ComplaintStats> {
        let roles = self.roles_for(&actor.id).await?;

        let filters = if roles.is_overseer() {
            vec![ComplaintFilter::default()]
        } else {
            Self::scope_filters(&roles, &actor.id, None)?
        };

        let mut stats = ComplaintStats::default();
        for filter in filters {
            stats.total += self.complaint_repo.count(filter.clone()).await?;
            for status in ComplaintStatus::all() {
                let count = self
                    .complaint_repo
                    .count(ComplaintFilter {
                        status: Some(status),
                        ..filter.clone()
                    })
                    .await?;
                match status {
                    ComplaintStatus::Pending => stats.pending += count,
                    ComplaintStatus::Assigned => stats.assigned += count,
                    ComplaintStatus::InProgress => stats.in_progress += count,
                    ComplaintStatus::Completed => stats.completed += count,
                    ComplaintStatus::Verified => stats.verified += count,
                }
            }
        }
        Ok(stats)
    }

    // ========== Transitions ==========

    /// Drive a status transition.
    ///
    /// The complaint row is re-read under a row lock inside a transaction;
    /// validation and the permission rule run against that fresh row, so
    /// concurrent transitions serialize instead of interleaving.
    pub async fn update_status(
        &self,
        actor: &user::Model,
        input: UpdateStatusInput,
    ) -> AppResult<complaint::Model> {
        let target = ComplaintStatus::parse(input.status.trim()).ok_or_else(|| {
            AppError::Validation(format!("Invalid status value: {}", input.status.trim()))
        })?;

        let roles = self.roles_for(&actor.id).await?;

        let txn = self.complaint_repo.begin().await?;
        let current = self
            .complaint_repo
            .get_for_update_tx(&txn, &input.complaint_id)
            .await?;

        lifecycle::validate_transition(
            current.status,
            target,
            input.resolution_notes.as_deref(),
        )?;
        lifecycle::authorize_transition(&actor.id, &roles, &current)?;

        let resolution_image_path = match input.resolution_image {
            Some(ref image) => Some(self.store_image("resolutions", image).await?),
            None => None,
        };

        let now = chrono::Utc::now().into();
        let stamps = lifecycle::transition_stamps(target, &current, now);
        let previous = current.status;

        let mut model: complaint::ActiveModel = current.into();
        model.status = Set(target);
        model.resolved_at = Set(stamps.resolved_at);
        model.verified_at = Set(stamps.verified_at);
        model.updated_at = Set(now);
        if let Some(notes) = input
            .resolution_notes
            .filter(|n| !n.trim().is_empty())
        {
            // Stored verbatim.
            model.resolution_notes = Set(Some(notes));
        }
        if let Some(path) = resolution_image_path {
            model.resolution_image_path = Set(Some(path));
        }

        let updated = self.complaint_repo.update_tx(&txn, model).await?;
        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::info!(
            ticket_code = %updated.ticket_code,
            from = previous.as_str(),
            to = target.as_str(),
            actor_id = %actor.id,
            "Complaint status updated"
        );
        Ok(updated)
    }

    // ========== Assignment ==========

    /// Route a complaint to a coordinator or worker.
    ///
    /// Overseers assign the coordinator; the assigned coordinator delegates
    /// to one of their workers, which also advances a still-pending
    /// complaint to `assigned`. Workers may not delegate.
    pub async fn assign(
        &self,
        actor: &user::Model,
        input: AssignComplaintInput,
    ) -> AppResult<complaint::Model> {
        let roles = self.roles_for(&actor.id).await?;
        if !roles.is_overseer() && !roles.has_role(RoleKind::Coordinator) {
            return Err(AppError::Forbidden(
                "You are not allowed to assign complaints".to_string(),
            ));
        }

        let txn = self.complaint_repo.begin().await?;
        let current = self
            .complaint_repo
            .get_for_update_tx(&txn, &input.complaint_id)
            .await?;

        let target_user = self.user_repo.get_by_id(&input.target_user_id).await?;
        let target_roles = self.roles_for(&target_user.id).await?;

        let now = chrono::Utc::now().into();
        let mut model: complaint::ActiveModel = current.clone().into();
        model.updated_at = Set(now);

        if roles.is_overseer() {
            if !target_roles.is_coordinator_for(&current.campus_id, &current.complaint_type_id) {
                return Err(AppError::Validation(format!(
                    "User {} is not the coordinator for this campus and complaint type",
                    target_user.username
                )));
            }
            model.coordinator_id = Set(Some(target_user.id.clone()));
        } else {
            // Coordinator: only the assigned coordinator may delegate.
            if current.coordinator_id.as_deref() != Some(actor.id.as_str()) {
                return Err(AppError::Forbidden(
                    "Only the assigned coordinator can delegate this complaint".to_string(),
                ));
            }
            if !target_roles.is_worker_for(&current.campus_id, &current.complaint_type_id) {
                return Err(AppError::Validation(format!(
                    "User {} is not a worker for this campus and complaint type",
                    target_user.username
                )));
            }
            model.worker_id = Set(Some(target_user.id.clone()));
            if current.status == ComplaintStatus::Pending {
                model.status = Set(ComplaintStatus::Assigned);
            }
        }

        let updated = self.complaint_repo.update_tx(&txn, model).await?;
        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::info!(
            ticket_code = %updated.ticket_code,
            target_user_id = %target_user.id,
            actor_id = %actor.id,
            "Complaint assigned"
        );
        Ok(updated)
    }

    // ========== Helpers ==========

    async fn roles_for(&self, user_id: &str) -> AppResult<RoleSet> {
        Ok(RoleSet::new(self.role_repo.find_for_user(user_id).await?))
    }

    async fn store_image(&self, scope: &str, image: &UploadImage) -> AppResult<String> {
        let key = generate_storage_key(scope, &image.file_name);
        let uploaded = self
            .storage
            .upload(&key, &image.data, &image.content_type)
            .await?;
        Ok(uploaded.key)
    }

    fn parse_status_filter(status: Option<&str>) -> AppResult<Option<ComplaintStatus>> {
        match status {
            None => Ok(None),
            Some(raw) => {
                let raw = raw.trim();
                if raw.is_empty() {
                    return Ok(None);
                }
                ComplaintStatus::parse(raw)
                    .map(Some)
                    .ok_or_else(|| AppError::Validation(format!("Invalid status value: {raw}")))
            }
        }
    }

    /// Scope filters for a non-overseer actor: one per coordinator scope,
    /// or a single worker filter. Actors with no role see nothing.
    fn scope_filters(
        roles: &RoleSet,
        actor_id: &str,
        status: Option<ComplaintStatus>,
    ) -> AppResult<Vec<ComplaintFilter>> {
        let coordinator_filters: Vec<ComplaintFilter> = roles
            .coordinator_scopes()
            .map(|(campus_id, complaint_type_id)| ComplaintFilter {
                status,
                campus_id: Some(campus_id.to_string()),
                complaint_type_id: Some(complaint_type_id.to_string()),
                ..Default::default()
            })
            .collect();
        if !coordinator_filters.is_empty() {
            return Ok(coordinator_filters);
        }

        if roles.has_role(RoleKind::Worker) {
            return Ok(vec![ComplaintFilter {
                status,
                worker_id: Some(actor_id.to_string()),
                ..Default::default()
            }]);
        }

        Err(AppError::Forbidden(
            "No role assigned to this user".to_string(),
        ))
    }

    /// Run one listing per filter and merge newest-first. A single filter
    /// (the common case) pages in the database; multi-scope coordinators
    /// merge in memory.
    async fn list_merged(
        &self,
        mut filters: Vec<ComplaintFilter>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<complaint::Model>> {
        if filters.len() == 1 {
            if let Some(filter) = filters.pop() {
                return self.complaint_repo.list(filter, limit, offset).await;
            }
        }

        let mut merged = Vec::new();
        for filter in filters {
            merged.extend(
                self.complaint_repo
                    .list(filter, limit.saturating_add(offset), 0)
                    .await?,
            );
        }
        merged.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(merged
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }
}
