//! Complaint type catalog service.

use campusfix_common::{AppError, AppResult, IdGenerator};
use campusfix_db::{
    entities::{complaint_type, user},
    repositories::{ComplaintTypeRepository, RoleAssignmentRepository},
};
use sea_orm::Set;

use crate::roles::RoleSet;

/// Complaint type catalog service.
///
/// Types with `has_workers = false` never take worker assignments; their
/// coordinator closes complaints directly.
#[derive(Clone)]
pub struct ComplaintTypeService {
    complaint_type_repo: ComplaintTypeRepository,
    role_repo: RoleAssignmentRepository,
    id_gen: IdGenerator,
}

impl ComplaintTypeService {
    /// Create a new complaint type service.
    #[must_use]
    pub const fn new(
        complaint_type_repo: ComplaintTypeRepository,
        role_repo: RoleAssignmentRepository,
    ) -> Self {
        Self {
            complaint_type_repo,
            role_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a complaint type. Admin only; names are unique.
    pub async fn create(
        &self,
        actor: &user::Model,
        name: &str,
        has_workers: bool,
    ) -> AppResult<complaint_type::Model> {
        let roles = RoleSet::new(self.role_repo.find_for_user(&actor.id).await?);
        if !roles.is_admin() {
            return Err(AppError::Forbidden(
                "Only admins can manage complaint types".to_string(),
            ));
        }

        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation(
                "Complaint type name is required".to_string(),
            ));
        }
        if name.len() > 256 {
            return Err(AppError::Validation(
                "Complaint type name too long".to_string(),
            ));
        }

        if self.complaint_type_repo.find_by_name(name).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Complaint type {name} already exists"
            )));
        }

        let model = complaint_type::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(name.to_string()),
            has_workers: Set(has_workers),
            created_at: Set(chrono::Utc::now().into()),
        };
        self.complaint_type_repo.create(model).await
    }

    /// Get a complaint type by ID.
    pub async fn get(&self, id: &str) -> AppResult<complaint_type::Model> {
        self.complaint_type_repo.get_by_id(id).await
    }

    /// List all complaint types, ordered by name. Public.
    pub async fn list(&self) -> AppResult<Vec<complaint_type::Model>> {
        self.complaint_type_repo.list().await
    }
}
