//! Complaint type repository.

use std::sync::Arc;

use crate::entities::{ComplaintType, complaint_type};
use campusfix_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

/// Complaint type repository for database operations.
#[derive(Clone)]
pub struct ComplaintTypeRepository {
    db: Arc<DatabaseConnection>,
}

impl ComplaintTypeRepository {
    /// Create a new complaint type repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Create a new complaint type.
    pub async fn create(
        &self,
        model: complaint_type::ActiveModel,
    ) -> AppResult<complaint_type::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a complaint type by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<complaint_type::Model>> {
        ComplaintType::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a complaint type by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<complaint_type::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Complaint type {id} not found")))
    }

    /// Find a complaint type by name.
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<complaint_type::Model>> {
        ComplaintType::find()
            .filter(complaint_type::Column::Name.eq(name))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List all complaint types ordered by name.
    pub async fn list(&self) -> AppResult<Vec<complaint_type::Model>> {
        ComplaintType::find()
            .order_by_asc(complaint_type::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
