//! Enrollment service: the `submitted -> approved` transition.
//!
//! Approval is the only multi-entity write in the engine. It provisions a
//! login account and a student record, then stamps the application, all
//! inside one transaction so a failure at any step leaves no partial
//! enrollment behind.

use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, Set, TransactionTrait,
};
use shule_common::{AppError, AppResult, Config, IdGenerator};
use std::sync::Arc;

use shule_db::{
    entities::{
        Student, application,
        application::ApplicationStatus,
        student, user,
        user::UserRole,
    },
    repositories::{
        ApplicationRepository, SchoolClassRepository, SchoolRepository, UserRepository,
    },
};

use crate::types::{OneTimeCredentials, ReviewerContext};

/// Enrollment service: provisions accounts and student records on approval.
#[derive(Clone)]
pub struct EnrollmentService {
    db: Arc<DatabaseConnection>,
    application_repo: ApplicationRepository,
    school_repo: SchoolRepository,
    class_repo: SchoolClassRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
    max_generation_attempts: u32,
    temp_password_length: usize,
}

impl EnrollmentService {
    /// Create a new enrollment service.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>, config: &Config) -> Self {
        Self {
            application_repo: ApplicationRepository::new(db.clone()),
            school_repo: SchoolRepository::new(db.clone()),
            class_repo: SchoolClassRepository::new(db.clone()),
            user_repo: UserRepository::new(db.clone()),
            db,
            id_gen: IdGenerator::new(),
            max_generation_attempts: config.admissions.max_generation_attempts,
            temp_password_length: config.admissions.temp_password_length,
        }
    }

    /// Approve a submitted application and enroll the applicant.
    ///
    /// Provisions a student login account and a student record assigned to
    /// `class_id`, then moves the application to `approved`, in a single
    /// transaction. The final status write is conditional on
    /// `status = 'submitted'`, so of two concurrent reviews exactly one
    /// commits; the other observes zero affected rows and fails with
    /// `StateConflict` before its inserts are committed.
    ///
    /// Returns the approved application together with the one-time
    /// cleartext credentials for the principal to hand over.
    pub async fn approve(
        &self,
        ctx: &ReviewerContext,
        application_id: &str,
        class_id: &str,
    ) -> AppResult<(application::Model, OneTimeCredentials)> {
        ctx.ensure_official()?;

        let app = self
            .application_repo
            .get_by_id_and_school(application_id, &ctx.school_id)
            .await?;

        if app.status != ApplicationStatus::Submitted {
            return Err(AppError::StateConflict(format!(
                "Application cannot be approved from the '{}' state",
                status_label(&app.status)
            )));
        }

        let school = self.school_repo.get_by_id(&ctx.school_id).await?;
        let class = self
            .class_repo
            .get_by_id_and_school(class_id, &ctx.school_id)
            .await?;

        // Credential derivation happens before the transaction; the unique
        // indexes on user.email and student.index_number remain the final
        // arbiter under concurrency.
        let email = self.choose_email(&app, &school.email_domain).await?;
        let password = self.id_gen.temp_password(self.temp_password_length);
        let password_hash = self.hash_password(&password)?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        match self
            .provision(&txn, ctx, &app, &class, &email, &password, &password_hash)
            .await
        {
            Ok(()) => {
                txn.commit()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!(error = %rollback_err, "Enrollment rollback failed");
                }
                return Err(match e {
                    AppError::StateConflict(_) | AppError::GenerationExhausted(_) => e,
                    other => {
                        tracing::error!(
                            application_id = application_id,
                            error = %other,
                            "Enrollment provisioning failed, rolled back"
                        );
                        AppError::ProvisioningFailed(
                            "Could not provision the enrollment".to_string(),
                        )
                    }
                });
            }
        }

        let approved = self
            .application_repo
            .get_by_id_and_school(application_id, &ctx.school_id)
            .await?;

        tracing::info!(
            application_id = application_id,
            school_id = %ctx.school_id,
            class_id = class_id,
            reviewed_by = %ctx.user_id,
            "Application approved and student enrolled"
        );

        Ok((approved, OneTimeCredentials { email, password }))
    }

    /// The transactional body of an approval: insert the account and
    /// student, then conditionally stamp the application.
    #[allow(clippy::too_many_arguments)]
    async fn provision(
        &self,
        txn: &DatabaseTransaction,
        ctx: &ReviewerContext,
        app: &application::Model,
        class: &shule_db::entities::school_class::Model,
        email: &str,
        password: &str,
        password_hash: &str,
    ) -> AppResult<()> {
        let now = Utc::now();
        let index_number = self.generate_unique_index_number(txn).await?;

        let account = user::ActiveModel {
            id: Set(crate::generate_id()),
            email: Set(email.to_string()),
            password_hash: Set(password_hash.to_string()),
            role: Set(UserRole::Student),
            school_id: Set(app.school_id.clone()),
            token: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(None),
        }
        .insert(txn)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        let enrolled = student::ActiveModel {
            id: Set(crate::generate_id()),
            school_id: Set(app.school_id.clone()),
            user_id: Set(account.id),
            school_class_id: Set(class.id.clone()),
            first_name: Set(app.first_name.clone()),
            last_name: Set(app.last_name.clone()),
            date_of_birth: Set(app.date_of_birth),
            gender: Set(app.gender.clone()),
            index_number: Set(index_number),
            created_at: Set(now.into()),
        }
        .insert(txn)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        let stamp = application::ActiveModel {
            status: Set(ApplicationStatus::Approved),
            reviewed_by: Set(Some(ctx.user_id.clone())),
            reviewed_at: Set(Some(now.into())),
            generated_email: Set(Some(email.to_string())),
            generated_password: Set(Some(password.to_string())),
            student_id: Set(Some(enrolled.id)),
            updated_at: Set(Some(now.into())),
            ..Default::default()
        };

        let result = application::Entity::update_many()
            .set(stamp)
            .filter(application::Column::Id.eq(app.id.as_str()))
            .filter(application::Column::Status.eq(ApplicationStatus::Submitted))
            .exec(txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            // A concurrent review won; abort so the inserts roll back.
            return Err(AppError::StateConflict(
                "Application has already been reviewed".to_string(),
            ));
        }

        Ok(())
    }

    /// Pick the login email: the applicant's own address when available
    /// and unclaimed, otherwise one derived from the applicant's name
    /// under the school's student domain.
    async fn choose_email(
        &self,
        app: &application::Model,
        email_domain: &str,
    ) -> AppResult<String> {
        if let Some(applicant_email) = &app.email {
            if !self.user_repo.email_exists(applicant_email).await? {
                return Ok(applicant_email.clone());
            }
            tracing::debug!(
                application_id = %app.id,
                "Applicant email already claimed, deriving one"
            );
        }

        let username = derive_username(&app.first_name, &app.last_name);
        for _ in 0..self.max_generation_attempts {
            let candidate = format!(
                "{username}{}@{email_domain}",
                self.id_gen.username_suffix()
            );
            if !self.user_repo.email_exists(&candidate).await? {
                return Ok(candidate);
            }
        }

        Err(AppError::GenerationExhausted(
            "Could not derive an unclaimed login email".to_string(),
        ))
    }

    async fn generate_unique_index_number(
        &self,
        txn: &DatabaseTransaction,
    ) -> AppResult<String> {
        for _ in 0..self.max_generation_attempts {
            let candidate = self.id_gen.student_index_number();
            let taken = Student::find()
                .filter(student::Column::IndexNumber.eq(candidate.as_str()))
                .one(txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?
                .is_some();
            if !taken {
                return Ok(candidate);
            }
        }

        Err(AppError::GenerationExhausted(
            "Could not generate a unique student index number".to_string(),
        ))
    }

    fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
    }
}

/// Lowercase alphanumeric username from the applicant's name.
fn derive_username(first_name: &str, last_name: &str) -> String {
    format!("{first_name}{last_name}")
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect::<String>()
        .to_lowercase()
}

const fn status_label(status: &ApplicationStatus) -> &'static str {
    match status {
        ApplicationStatus::Draft => "draft",
        ApplicationStatus::Submitted => "submitted",
        ApplicationStatus::Approved => "approved",
        ApplicationStatus::Rejected => "rejected",
    }
}
