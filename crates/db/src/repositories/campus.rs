//! Campus repository.

use std::sync::Arc;

use crate::entities::{Campus, campus};
use campusfix_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

/// Campus repository for database operations.
#[derive(Clone)]
pub struct CampusRepository {
    db: Arc<DatabaseConnection>,
}

impl CampusRepository {
    /// Create a new campus repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Create a new campus.
    pub async fn create(&self, model: campus::ActiveModel) -> AppResult<campus::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a campus by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<campus::Model>> {
        Campus::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a campus by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<campus::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Campus {id} not found")))
    }

    /// Find a campus by name.
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<campus::Model>> {
        Campus::find()
            .filter(campus::Column::Name.eq(name))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List all campuses ordered by name.
    pub async fn list(&self) -> AppResult<Vec<campus::Model>> {
        Campus::find()
            .order_by_asc(campus::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
