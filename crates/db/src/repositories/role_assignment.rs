//! Role assignment repository.

use std::sync::Arc;

use crate::entities::{
    RoleAssignment,
    role_assignment::{self, RoleKind},
};
use campusfix_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QueryOrder, Select, TransactionTrait,
};

/// Role assignment repository for database operations.
#[derive(Clone)]
pub struct RoleAssignmentRepository {
    db: Arc<DatabaseConnection>,
}

impl RoleAssignmentRepository {
    /// Create a new role assignment repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Begin a database transaction.
    ///
    /// Coordinator provisioning checks the pair for an existing coordinator
    /// and inserts in the same transaction.
    pub async fn begin(&self) -> AppResult<DatabaseTransaction> {
        self.db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new role assignment.
    pub async fn create(
        &self,
        model: role_assignment::ActiveModel,
    ) -> AppResult<role_assignment::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new role assignment within a transaction.
    pub async fn create_tx(
        &self,
        txn: &DatabaseTransaction,
        model: role_assignment::ActiveModel,
    ) -> AppResult<role_assignment::Model> {
        model
            .insert(txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a role assignment by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<role_assignment::Model> {
        RoleAssignment::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound(format!("Role assignment {id} not found")))
    }

    /// Find all role assignments for a user, earliest first.
    ///
    /// The first element is the user's primary role.
    pub async fn find_for_user(&self, user_id: &str) -> AppResult<Vec<role_assignment::Model>> {
        RoleAssignment::find()
            .filter(role_assignment::Column::UserId.eq(user_id))
            .order_by_asc(role_assignment::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the coordinator assignment for a (campus, complaint type) pair.
    ///
    /// At most one such assignment exists; uniqueness is enforced at
    /// provisioning time.
    pub async fn find_coordinator(
        &self,
        campus_id: &str,
        complaint_type_id: &str,
    ) -> AppResult<Option<role_assignment::Model>> {
        Self::coordinator_query(campus_id, complaint_type_id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the coordinator assignment for a pair within a transaction.
    pub async fn find_coordinator_tx(
        &self,
        txn: &DatabaseTransaction,
        campus_id: &str,
        complaint_type_id: &str,
    ) -> AppResult<Option<role_assignment::Model>> {
        Self::coordinator_query(campus_id, complaint_type_id)
            .one(txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    fn coordinator_query(campus_id: &str, complaint_type_id: &str) -> Select<RoleAssignment> {
        RoleAssignment::find()
            .filter(role_assignment::Column::Role.eq(RoleKind::Coordinator))
            .filter(role_assignment::Column::CampusId.eq(campus_id))
            .filter(role_assignment::Column::ComplaintTypeId.eq(complaint_type_id))
    }

    /// Find all worker assignments for a (campus, complaint type) pair, in
    /// insertion order.
    pub async fn find_workers(
        &self,
        campus_id: &str,
        complaint_type_id: &str,
    ) -> AppResult<Vec<role_assignment::Model>> {
        RoleAssignment::find()
            .filter(role_assignment::Column::Role.eq(RoleKind::Worker))
            .filter(role_assignment::Column::CampusId.eq(campus_id))
            .filter(role_assignment::Column::ComplaintTypeId.eq(complaint_type_id))
            .order_by_asc(role_assignment::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a role assignment within a transaction.
    pub async fn update_tx(
        &self,
        txn: &DatabaseTransaction,
        model: role_assignment::ActiveModel,
    ) -> AppResult<role_assignment::Model> {
        model
            .update(txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete all role assignments for a user within a transaction.
    ///
    /// Only called from user deletion; role assignments are never removed
    /// any other way.
    pub async fn delete_for_user_tx(
        &self,
        txn: &DatabaseTransaction,
        user_id: &str,
    ) -> AppResult<u64> {
        let result = RoleAssignment::delete_many()
            .filter(role_assignment::Column::UserId.eq(user_id))
            .exec(txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_assignment(
        id: &str,
        user_id: &str,
        role: RoleKind,
        scope: Option<(&str, &str)>,
    ) -> role_assignment::Model {
        role_assignment::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            role,
            campus_id: scope.map(|(c, _)| c.to_string()),
            complaint_type_id: scope.map(|(_, t)| t.to_string()),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_coordinator_none_is_valid() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<role_assignment::Model>::new()])
                .into_connection(),
        );

        let repo = RoleAssignmentRepository::new(db);
        let result = repo.find_coordinator("campus1", "type1").await.unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_find_workers() {
        let w1 = create_test_assignment("r1", "w1", RoleKind::Worker, Some(("campus1", "type1")));
        let w2 = create_test_assignment("r2", "w2", RoleKind::Worker, Some(("campus1", "type1")));

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[w1, w2]])
                .into_connection(),
        );

        let repo = RoleAssignmentRepository::new(db);
        let result = repo.find_workers("campus1", "type1").await.unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].user_id, "w1");
    }

    #[tokio::test]
    async fn test_find_for_user_orders_by_creation() {
        let admin = create_test_assignment("r1", "u1", RoleKind::Admin, None);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[admin]])
                .into_connection(),
        );

        let repo = RoleAssignmentRepository::new(db);
        let result = repo.find_for_user("u1").await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].role, RoleKind::Admin);
    }
}
