//! Campus catalog service.

use campusfix_common::{AppError, AppResult, IdGenerator};
use campusfix_db::{
    entities::{campus, user},
    repositories::{CampusRepository, RoleAssignmentRepository},
};
use sea_orm::Set;

use crate::roles::RoleSet;

/// Campus catalog service. Campuses are created by admins and referenced by
/// complaints and scoped role assignments.
#[derive(Clone)]
pub struct CampusService {
    campus_repo: CampusRepository,
    role_repo: RoleAssignmentRepository,
    id_gen: IdGenerator,
}

impl CampusService {
    /// Create a new campus service.
    #[must_use]
    pub const fn new(campus_repo: CampusRepository, role_repo: RoleAssignmentRepository) -> Self {
        Self {
            campus_repo,
            role_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a campus. Admin only; names are unique.
    pub async fn create(&self, actor: &user::Model, name: &str) -> AppResult<campus::Model> {
        let roles = RoleSet::new(self.role_repo.find_for_user(&actor.id).await?);
        if !roles.is_admin() {
            return Err(AppError::Forbidden(
                "Only admins can manage campuses".to_string(),
            ));
        }

        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Campus name is required".to_string()));
        }
        if name.len() > 256 {
            return Err(AppError::Validation("Campus name too long".to_string()));
        }

        if self.campus_repo.find_by_name(name).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Campus {name} already exists"
            )));
        }

        let model = campus::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(name.to_string()),
            created_at: Set(chrono::Utc::now().into()),
        };
        self.campus_repo.create(model).await
    }

    /// Get a campus by ID.
    pub async fn get(&self, id: &str) -> AppResult<campus::Model> {
        self.campus_repo.get_by_id(id).await
    }

    /// List all campuses, ordered by name. Public: the submission form
    /// needs the catalog before any authentication.
    pub async fn list(&self) -> AppResult<Vec<campus::Model>> {
        self.campus_repo.list().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use campusfix_db::entities::role_assignment::{self, RoleKind};
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn service_with(db: Arc<sea_orm::DatabaseConnection>) -> CampusService {
        CampusService::new(
            CampusRepository::new(db.clone()),
            RoleAssignmentRepository::new(db),
        )
    }

    fn admin_user() -> user::Model {
        user::Model {
            id: "admin1".to_string(),
            username: "admin".to_string(),
            name: "Admin".to_string(),
            email: None,
            token: "token_admin1".to_string(),
            created_at: Utc::now().into(),
        }
    }

    fn admin_assignment() -> role_assignment::Model {
        role_assignment::Model {
            id: "ra-admin1".to_string(),
            user_id: "admin1".to_string(),
            role: RoleKind::Admin,
            campus_id: None,
            complaint_type_id: None,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_name() {
        let existing = campus::Model {
            id: "main".to_string(),
            name: "Main".to_string(),
            created_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[admin_assignment()]])
                .append_query_results([[existing]])
                .into_connection(),
        );
        let service = service_with(db);

        let result = service.create(&admin_user(), "Main").await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_create_requires_admin() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<role_assignment::Model>::new()])
                .into_connection(),
        );
        let service = service_with(db);

        let result = service.create(&admin_user(), "North").await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_list_orders_by_name() {
        let north = campus::Model {
            id: "north".to_string(),
            name: "North".to_string(),
            created_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[north]])
                .into_connection(),
        );
        let service = service_with(db);

        let result = service.list().await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "North");
    }
}
