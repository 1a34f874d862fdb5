//! School class repository. Reference data, read-only for the engine.

use std::sync::Arc;

use crate::entities::{SchoolClass, school_class};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use shule_common::{AppError, AppResult};

/// School class repository for database operations.
#[derive(Clone)]
pub struct SchoolClassRepository {
    db: Arc<DatabaseConnection>,
}

impl SchoolClassRepository {
    /// Create a new school class repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a class by ID, scoped to a school.
    ///
    /// A class belonging to a different school is reported as absent.
    pub async fn find_by_id_and_school(
        &self,
        id: &str,
        school_id: &str,
    ) -> AppResult<Option<school_class::Model>> {
        SchoolClass::find_by_id(id)
            .filter(school_class::Column::SchoolId.eq(school_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a class by ID scoped to a school, erroring if absent.
    pub async fn get_by_id_and_school(
        &self,
        id: &str,
        school_id: &str,
    ) -> AppResult<school_class::Model> {
        self.find_by_id_and_school(id, school_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Class not found".to_string()))
    }
}
