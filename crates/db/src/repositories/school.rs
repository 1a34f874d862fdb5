//! School repository. Reference data, read-only for the engine.

use std::sync::Arc;

use crate::entities::{School, school};
use sea_orm::{DatabaseConnection, EntityTrait};
use shule_common::{AppError, AppResult};

/// School repository for database operations.
#[derive(Clone)]
pub struct SchoolRepository {
    db: Arc<DatabaseConnection>,
}

impl SchoolRepository {
    /// Create a new school repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a school by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<school::Model>> {
        School::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a school by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<school::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("School not found".to_string()))
    }
}
