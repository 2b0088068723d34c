//! Complaint repository.

use std::sync::Arc;

use crate::entities::{
    Complaint,
    complaint::{self, ComplaintStatus},
};
use campusfix_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};

/// Scope filter for complaint listings and counts.
///
/// All fields are conjunctive; `None` means "no constraint".
#[derive(Debug, Clone, Default)]
pub struct ComplaintFilter {
    pub status: Option<ComplaintStatus>,
    pub campus_id: Option<String>,
    pub complaint_type_id: Option<String>,
    pub coordinator_id: Option<String>,
    pub worker_id: Option<String>,
}

impl ComplaintFilter {
    fn apply(self, mut query: sea_orm::Select<Complaint>) -> sea_orm::Select<Complaint> {
        if let Some(status) = self.status {
            query = query.filter(complaint::Column::Status.eq(status));
        }
        if let Some(campus_id) = self.campus_id {
            query = query.filter(complaint::Column::CampusId.eq(campus_id));
        }
        if let Some(type_id) = self.complaint_type_id {
            query = query.filter(complaint::Column::ComplaintTypeId.eq(type_id));
        }
        if let Some(coordinator_id) = self.coordinator_id {
            query = query.filter(complaint::Column::CoordinatorId.eq(coordinator_id));
        }
        if let Some(worker_id) = self.worker_id {
            query = query.filter(complaint::Column::WorkerId.eq(worker_id));
        }
        query
    }
}

/// Complaint repository for database operations.
#[derive(Clone)]
pub struct ComplaintRepository {
    db: Arc<DatabaseConnection>,
}

impl ComplaintRepository {
    /// Create a new complaint repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Begin a database transaction.
    ///
    /// Status transitions and assignments re-read the complaint row inside
    /// the returned transaction so multi-field updates commit atomically.
    pub async fn begin(&self) -> AppResult<DatabaseTransaction> {
        self.db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new complaint.
    pub async fn create(&self, model: complaint::ActiveModel) -> AppResult<complaint::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a complaint by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<complaint::Model>> {
        Complaint::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a complaint by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<complaint::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::ComplaintNotFound(id.to_string()))
    }

    /// Find a complaint by its ticket code, returning an error if not found.
    pub async fn get_by_ticket_code(&self, ticket_code: &str) -> AppResult<complaint::Model> {
        Complaint::find()
            .filter(complaint::Column::TicketCode.eq(ticket_code))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::ComplaintNotFound(ticket_code.to_string()))
    }

    /// List complaints matching a filter, newest first.
    pub async fn list(
        &self,
        filter: ComplaintFilter,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<complaint::Model>> {
        filter
            .apply(Complaint::find())
            .order_by_desc(complaint::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count complaints matching a filter.
    pub async fn count(&self, filter: ComplaintFilter) -> AppResult<u64> {
        filter
            .apply(Complaint::find())
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a complaint.
    pub async fn update(&self, model: complaint::ActiveModel) -> AppResult<complaint::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Load a complaint inside a transaction with a row-level lock.
    ///
    /// Concurrent transitions on the same complaint serialize on this lock,
    /// so the read-validate-write sequence never interleaves.
    pub async fn get_for_update_tx(
        &self,
        txn: &DatabaseTransaction,
        id: &str,
    ) -> AppResult<complaint::Model> {
        Complaint::find_by_id(id)
            .lock_exclusive()
            .one(txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::ComplaintNotFound(id.to_string()))
    }

    /// Update a complaint inside a transaction.
    pub async fn update_tx(
        &self,
        txn: &DatabaseTransaction,
        model: complaint::ActiveModel,
    ) -> AppResult<complaint::Model> {
        model
            .update(txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_complaint(id: &str, ticket_code: &str) -> complaint::Model {
        complaint::Model {
            id: id.to_string(),
            ticket_code: ticket_code.to_string(),
            campus_id: "campus1".to_string(),
            complaint_type_id: "type1".to_string(),
            location: "Dorm A".to_string(),
            description: "Leaky pipe".to_string(),
            image_path: None,
            status: ComplaintStatus::Pending,
            coordinator_id: None,
            worker_id: None,
            resolution_notes: None,
            resolution_image_path: None,
            resolved_at: None,
            verified_at: None,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_get_by_ticket_code() {
        let c = create_test_complaint("c1", "CMP-1A2B3C4D");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[c.clone()]])
                .into_connection(),
        );

        let repo = ComplaintRepository::new(db);
        let result = repo.get_by_ticket_code("CMP-1A2B3C4D").await.unwrap();

        assert_eq!(result.id, "c1");
        assert_eq!(result.status, ComplaintStatus::Pending);
    }

    #[tokio::test]
    async fn test_get_by_ticket_code_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<complaint::Model>::new()])
                .into_connection(),
        );

        let repo = ComplaintRepository::new(db);
        let result = repo.get_by_ticket_code("CMP-MISSING1").await;

        match result {
            Err(AppError::ComplaintNotFound(code)) => assert_eq!(code, "CMP-MISSING1"),
            other => panic!("Expected ComplaintNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_list_with_filter() {
        let c1 = create_test_complaint("c1", "CMP-AAAAAAAA");
        let c2 = create_test_complaint("c2", "CMP-BBBBBBBB");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[c1, c2]])
                .into_connection(),
        );

        let repo = ComplaintRepository::new(db);
        let filter = ComplaintFilter {
            campus_id: Some("campus1".to_string()),
            status: Some(ComplaintStatus::Pending),
            ..Default::default()
        };
        let result = repo.list(filter, 10, 0).await.unwrap();

        assert_eq!(result.len(), 2);
    }
}
