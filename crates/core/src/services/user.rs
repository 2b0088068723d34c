//! User provisioning service.
//!
//! Users exist only because an admin provisioned them; there is no
//! self-service signup. Provisioning issues the opaque bearer token the
//! user authenticates with from then on.

use campusfix_common::{AppError, AppResult, IdGenerator};
use campusfix_db::{
    entities::user,
    repositories::{RoleAssignmentRepository, UserRepository},
};
use sea_orm::Set;
use validator::Validate;

use crate::roles::RoleSet;

/// Input for provisioning a user.
#[derive(Debug, Validate)]
pub struct CreateUserInput {
    #[validate(length(min = 1, max = 64))]
    pub username: String,

    #[validate(length(min = 1, max = 256))]
    pub name: String,

    #[validate(email)]
    pub email: Option<String>,
}

/// User provisioning service.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    role_repo: RoleAssignmentRepository,
    id_gen: IdGenerator,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(user_repo: UserRepository, role_repo: RoleAssignmentRepository) -> Self {
        Self {
            user_repo,
            role_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Resolve a bearer token to its user.
    pub async fn authenticate_by_token(&self, token: &str) -> AppResult<user::Model> {
        self.user_repo
            .find_by_token(token)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    /// Provision a new user and issue their bearer token.
    pub async fn create(
        &self,
        actor: &user::Model,
        input: CreateUserInput,
    ) -> AppResult<user::Model> {
        self.require_admin(actor).await?;
        input.validate()?;

        let username = input.username.trim().to_lowercase();
        if username.is_empty() {
            return Err(AppError::Validation("Username is required".to_string()));
        }
        if !username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
        {
            return Err(AppError::Validation(
                "Username may only contain letters, digits, '_' and '.'".to_string(),
            ));
        }

        if self.user_repo.find_by_username(&username).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Username {username} is already taken"
            )));
        }

        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            username: Set(username),
            name: Set(input.name.trim().to_string()),
            email: Set(input.email),
            token: Set(self.id_gen.generate_token()),
            created_at: Set(chrono::Utc::now().into()),
        };

        let created = self.user_repo.create(model).await?;
        tracing::info!(
            user_id = %created.id,
            username = %created.username,
            actor_id = %actor.id,
            "User provisioned"
        );
        Ok(created)
    }

    /// Get a user by ID.
    pub async fn get(&self, id: &str) -> AppResult<user::Model> {
        self.user_repo.get_by_id(id).await
    }

    /// List users in provisioning order. Admin only.
    pub async fn list(
        &self,
        actor: &user::Model,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<user::Model>> {
        self.require_admin(actor).await?;
        self.user_repo.list(limit, offset).await
    }

    /// Delete a user and their role assignments.
    ///
    /// This is the only path that removes role assignments; both deletes
    /// commit in one transaction.
    pub async fn delete(&self, actor: &user::Model, user_id: &str) -> AppResult<()> {
        self.require_admin(actor).await?;

        if actor.id == user_id {
            return Err(AppError::BadRequest(
                "Cannot delete your own account".to_string(),
            ));
        }

        let target = self.user_repo.get_by_id(user_id).await?;

        let txn = self.user_repo.begin().await?;
        let removed_roles = self.role_repo.delete_for_user_tx(&txn, &target.id).await?;
        self.user_repo.delete_tx(&txn, target).await?;
        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::info!(
            user_id = %user_id,
            removed_roles,
            actor_id = %actor.id,
            "User deleted"
        );
        Ok(())
    }

    async fn require_admin(&self, actor: &user::Model) -> AppResult<()> {
        let roles = RoleSet::new(self.role_repo.find_for_user(&actor.id).await?);
        if !roles.is_admin() {
            return Err(AppError::Forbidden(
                "Only admins can manage users".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use campusfix_db::entities::role_assignment::{self, RoleKind};
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn service_with(db: Arc<sea_orm::DatabaseConnection>) -> UserService {
        UserService::new(
            UserRepository::new(db.clone()),
            RoleAssignmentRepository::new(db),
        )
    }

    fn test_user(id: &str, username: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: username.to_string(),
            name: username.to_string(),
            email: None,
            token: format!("token_{id}"),
            created_at: Utc::now().into(),
        }
    }

    fn admin_assignment(user_id: &str) -> role_assignment::Model {
        role_assignment::Model {
            id: format!("ra-{user_id}"),
            user_id: user_id.to_string(),
            role: RoleKind::Admin,
            campus_id: None,
            complaint_type_id: None,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_authenticate_by_token_unknown_is_unauthorized() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );
        let service = service_with(db);

        let result = service.authenticate_by_token("nope").await;

        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_create_requires_admin() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<role_assignment::Model>::new()])
                .into_connection(),
        );
        let service = service_with(db);

        let result = service
            .create(
                &test_user("u1", "someone"),
                CreateUserInput {
                    username: "newuser".to_string(),
                    name: "New User".to_string(),
                    email: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_list_requires_admin() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<role_assignment::Model>::new()])
                .into_connection(),
        );
        let service = service_with(db);

        let result = service.list(&test_user("u1", "someone"), 30, 0).await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_username() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[admin_assignment("admin1")]])
                .append_query_results([[test_user("u2", "taken")]])
                .into_connection(),
        );
        let service = service_with(db);

        let result = service
            .create(
                &test_user("admin1", "admin"),
                CreateUserInput {
                    username: "taken".to_string(),
                    name: "Someone".to_string(),
                    email: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_odd_usernames() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[admin_assignment("admin1")]])
                .into_connection(),
        );
        let service = service_with(db);

        let result = service
            .create(
                &test_user("admin1", "admin"),
                CreateUserInput {
                    username: "not a username!".to_string(),
                    name: "Someone".to_string(),
                    email: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_cascades_role_assignments() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[admin_assignment("admin1")]])
                .append_query_results([[test_user("u1", "leaver")]])
                .append_exec_results([
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 2, // role assignments removed
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1, // user row removed
                    },
                ])
                .into_connection(),
        );
        let service = service_with(db);

        let result = service.delete(&test_user("admin1", "admin"), "u1").await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_delete_rejects_self() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[admin_assignment("admin1")]])
                .into_connection(),
        );
        let service = service_with(db);

        let result = service
            .delete(&test_user("admin1", "admin"), "admin1")
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
