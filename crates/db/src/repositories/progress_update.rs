//! Progress update repository.

use std::sync::Arc;

use crate::entities::{ProgressUpdate, progress_update};
use campusfix_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

/// Progress update repository for database operations.
///
/// Progress updates are append-only; there are no update or delete methods.
#[derive(Clone)]
pub struct ProgressUpdateRepository {
    db: Arc<DatabaseConnection>,
}

impl ProgressUpdateRepository {
    /// Create a new progress update repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Append a progress update.
    pub async fn create(
        &self,
        model: progress_update::ActiveModel,
    ) -> AppResult<progress_update::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List all progress updates for a complaint, oldest first.
    pub async fn list_for_complaint(
        &self,
        complaint_id: &str,
    ) -> AppResult<Vec<progress_update::Model>> {
        ProgressUpdate::find()
            .filter(progress_update::Column::ComplaintId.eq(complaint_id))
            .order_by_asc(progress_update::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
