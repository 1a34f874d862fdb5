//! Application repository.

use std::sync::Arc;

use crate::entities::{Application, application, application::ApplicationStatus};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use shule_common::{AppError, AppResult};

/// Application repository for database operations.
///
/// All tenant-facing finders are scoped to a `school_id`; a reference that
/// exists but belongs to a different school is reported as absent, never
/// as a distinct error.
#[derive(Clone)]
pub struct ApplicationRepository {
    db: Arc<DatabaseConnection>,
}

impl ApplicationRepository {
    /// Create a new application repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an application by ID, scoped to a school.
    pub async fn find_by_id_and_school(
        &self,
        id: &str,
        school_id: &str,
    ) -> AppResult<Option<application::Model>> {
        Application::find_by_id(id)
            .filter(application::Column::SchoolId.eq(school_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an application by ID, scoped to a school, erroring if absent.
    pub async fn get_by_id_and_school(
        &self,
        id: &str,
        school_id: &str,
    ) -> AppResult<application::Model> {
        self.find_by_id_and_school(id, school_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Application not found".to_string()))
    }

    /// Find an application by reference, scoped to a school.
    pub async fn find_by_reference_and_school(
        &self,
        reference: &str,
        school_id: &str,
    ) -> AppResult<Option<application::Model>> {
        Application::find()
            .filter(application::Column::Reference.eq(reference))
            .filter(application::Column::SchoolId.eq(school_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Uniqueness probe: does any application carry this reference?
    ///
    /// Deliberately unscoped — references are unique system-wide.
    pub async fn reference_exists(&self, reference: &str) -> AppResult<bool> {
        let found = Application::find()
            .filter(application::Column::Reference.eq(reference))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(found.is_some())
    }

    /// Uniqueness probe: does any application carry this PIN?
    pub async fn pin_exists(&self, pin: &str) -> AppResult<bool> {
        let found = Application::find()
            .filter(application::Column::Pin.eq(pin))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(found.is_some())
    }

    /// Create a new application.
    pub async fn create(&self, model: application::ActiveModel) -> AppResult<application::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Conditionally apply an update to an application still in `draft`.
    ///
    /// Same single-statement pattern as [`Self::reject_submitted`]: the
    /// `status = 'draft'` filter runs with the write, so a stale submit
    /// or payment can never overwrite an application that has already
    /// been submitted or reviewed. Returns the number of rows affected;
    /// zero means the application had already left `draft`.
    pub async fn update_draft(
        &self,
        id: &str,
        update: application::ActiveModel,
    ) -> AppResult<u64> {
        let result = Application::update_many()
            .set(update)
            .filter(application::Column::Id.eq(id))
            .filter(application::Column::Status.eq(ApplicationStatus::Draft))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Conditionally move a submitted application to `rejected`.
    ///
    /// The `status = 'submitted'` filter runs in the same statement as the
    /// write, so two concurrent reviews resolve to exactly one winner.
    /// Returns the number of rows affected: zero means the application was
    /// no longer in `submitted`.
    pub async fn reject_submitted(
        &self,
        id: &str,
        school_id: &str,
        reviewer_id: &str,
        reason: &str,
    ) -> AppResult<u64> {
        let now = chrono::Utc::now();

        let update = application::ActiveModel {
            status: Set(ApplicationStatus::Rejected),
            reviewed_by: Set(Some(reviewer_id.to_string())),
            reviewed_at: Set(Some(now.into())),
            rejection_reason: Set(Some(reason.to_string())),
            updated_at: Set(Some(now.into())),
            ..Default::default()
        };

        let result = Application::update_many()
            .set(update)
            .filter(application::Column::Id.eq(id))
            .filter(application::Column::SchoolId.eq(school_id))
            .filter(application::Column::Status.eq(ApplicationStatus::Submitted))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::application::ApplicationCategory;
    use chrono::{NaiveDate, Utc};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_application(id: &str, school_id: &str) -> application::Model {
        application::Model {
            id: id.to_string(),
            school_id: school_id.to_string(),
            reference: "APP-2026-A1B2C3".to_string(),
            pin: "042917".to_string(),
            category: ApplicationCategory::Jss,
            class_level: Some("jss-2".to_string()),
            first_name: "Ama".to_string(),
            last_name: "Sesay".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(2012, 3, 14).unwrap(),
            gender: "female".to_string(),
            address: "12 Harbour Road".to_string(),
            email: None,
            phone: None,
            guardian_name: "Kadiatu Sesay".to_string(),
            guardian_phone: "+23276000000".to_string(),
            guardian_email: None,
            previous_school: Some("Harbour Primary".to_string()),
            bece_index_number: None,
            subject_interests: None,
            status: ApplicationStatus::Submitted,
            payment_status: None,
            payment_method: None,
            submitted_at: Some(Utc::now().into()),
            reviewed_at: None,
            reviewed_by: None,
            rejection_reason: None,
            generated_email: None,
            generated_password: None,
            student_id: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_reference_scoped_to_school() {
        let app = create_test_application("app1", "school7");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[app.clone()]])
                .into_connection(),
        );

        let repo = ApplicationRepository::new(db);
        let result = repo
            .find_by_reference_and_school("APP-2026-A1B2C3", "school7")
            .await
            .unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().id, "app1");
    }

    #[tokio::test]
    async fn test_find_by_reference_wrong_school_is_absent() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<application::Model>::new()])
                .into_connection(),
        );

        let repo = ApplicationRepository::new(db);
        let result = repo
            .find_by_reference_and_school("APP-2026-A1B2C3", "other-school")
            .await
            .unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_get_by_id_and_school_not_found_returns_error() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<application::Model>::new()])
                .into_connection(),
        );

        let repo = ApplicationRepository::new(db);
        let result = repo.get_by_id_and_school("missing", "school7").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_reject_submitted_reports_rows_affected() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = ApplicationRepository::new(db);
        let rows = repo
            .reject_submitted("app1", "school7", "principal3", "Incomplete records")
            .await
            .unwrap();

        assert_eq!(rows, 1);
    }

    #[tokio::test]
    async fn test_update_draft_reports_rows_affected() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let update = application::ActiveModel {
            status: Set(ApplicationStatus::Submitted),
            ..Default::default()
        };

        let repo = ApplicationRepository::new(db);
        let rows = repo.update_draft("app1", update).await.unwrap();

        assert_eq!(rows, 1);
    }

    #[tokio::test]
    async fn test_update_draft_after_submission_affects_no_rows() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let update = application::ActiveModel {
            status: Set(ApplicationStatus::Submitted),
            ..Default::default()
        };

        let repo = ApplicationRepository::new(db);
        let rows = repo.update_draft("app1", update).await.unwrap();

        assert_eq!(rows, 0);
    }

    #[tokio::test]
    async fn test_reject_already_reviewed_affects_no_rows() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = ApplicationRepository::new(db);
        let rows = repo
            .reject_submitted("app1", "school7", "principal3", "Incomplete records")
            .await
            .unwrap();

        assert_eq!(rows, 0);
    }
}
