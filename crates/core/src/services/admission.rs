//! Admission service: the application state machine.
//!
//! Owns every lifecycle transition except approval:
//! `draft -> submitted` (applicant, reference+PIN scoped, payment-gated)
//! and `submitted -> rejected` (school official). Approval, which
//! provisions credentials and records, lives in
//! [`crate::EnrollmentService`].

use chrono::{NaiveDate, Utc};
use sea_orm::Set;
use serde::Deserialize;
use shule_common::{AppError, AppResult, Config, IdGenerator};
use shule_db::{
    entities::application::{self, ApplicationStatus, PaymentStatus},
    repositories::{ApplicationRepository, SchoolRepository},
};
use validator::Validate;

use crate::types::{CategoryDetails, ReviewerContext};

/// Admission service for application lifecycle logic.
#[derive(Clone)]
pub struct AdmissionService {
    application_repo: ApplicationRepository,
    school_repo: SchoolRepository,
    id_gen: IdGenerator,
    max_generation_attempts: u32,
}

/// Input for creating a draft application.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDraftInput {
    /// Admission category, immutable once set.
    pub category: shule_db::entities::application::ApplicationCategory,

    #[validate(length(min = 1, max = 128))]
    pub first_name: String,

    #[validate(length(min = 1, max = 128))]
    pub last_name: String,

    pub date_of_birth: NaiveDate,

    #[validate(length(min = 1, max = 16))]
    pub gender: String,

    #[validate(length(min = 1, max = 1024))]
    pub address: String,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(length(max = 32))]
    pub phone: Option<String>,

    #[validate(length(min = 1, max = 256))]
    pub guardian_name: String,

    #[validate(length(min = 1, max = 32))]
    pub guardian_phone: String,

    #[validate(email)]
    pub guardian_email: Option<String>,
}

/// Input for submitting a draft application.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitInput {
    /// Category-conditional academic fields. Must match the stored,
    /// immutable category of the application.
    #[serde(flatten)]
    pub details: CategoryDetails,

    /// Optional grade/class label within the category, e.g. "jss-2".
    #[validate(length(min = 1, max = 32))]
    pub class_level: Option<String>,
}

impl AdmissionService {
    /// Create a new admission service.
    #[must_use]
    pub fn new(
        application_repo: ApplicationRepository,
        school_repo: SchoolRepository,
        config: &Config,
    ) -> Self {
        Self {
            application_repo,
            school_repo,
            id_gen: IdGenerator::new(),
            max_generation_attempts: config.admissions.max_generation_attempts,
        }
    }

    /// Create a draft application for a school.
    ///
    /// Generates the unique reference and PIN, probing the store and
    /// regenerating on collision up to the configured retry budget.
    pub async fn create_draft(
        &self,
        school_id: &str,
        input: CreateDraftInput,
    ) -> AppResult<application::Model> {
        input.validate()?;

        // The school must exist; everything downstream is scoped to it.
        let school = self.school_repo.get_by_id(school_id).await?;

        let reference = self.generate_unique_reference().await?;
        let pin = self.generate_unique_pin().await?;

        let now = Utc::now();
        let model = application::ActiveModel {
            id: Set(crate::generate_id()),
            school_id: Set(school.id),
            reference: Set(reference.clone()),
            pin: Set(pin),
            category: Set(input.category),
            class_level: Set(None),
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            date_of_birth: Set(input.date_of_birth),
            gender: Set(input.gender),
            address: Set(input.address),
            email: Set(input.email.map(|e| e.to_lowercase())),
            phone: Set(input.phone),
            guardian_name: Set(input.guardian_name),
            guardian_phone: Set(input.guardian_phone),
            guardian_email: Set(input.guardian_email),
            previous_school: Set(None),
            bece_index_number: Set(None),
            subject_interests: Set(None),
            status: Set(ApplicationStatus::Draft),
            payment_status: Set(Some(PaymentStatus::Pending)),
            payment_method: Set(None),
            submitted_at: Set(None),
            reviewed_at: Set(None),
            reviewed_by: Set(None),
            rejection_reason: Set(None),
            generated_email: Set(None),
            generated_password: Set(None),
            student_id: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(None),
        };

        let created = self.application_repo.create(model).await?;

        tracing::info!(
            application_id = %created.id,
            school_id = %created.school_id,
            reference = %created.reference,
            category = ?created.category,
            "Draft application created"
        );

        Ok(created)
    }

    /// Record payment of the admission fee.
    ///
    /// Legal only while the application is still a draft; payment is the
    /// gate for the `draft -> submitted` transition.
    pub async fn record_payment(
        &self,
        school_id: &str,
        reference: &str,
        pin: &str,
        method: &str,
    ) -> AppResult<application::Model> {
        if method.trim().is_empty() {
            return Err(AppError::Validation(
                "paymentMethod must not be empty".to_string(),
            ));
        }

        let app = self.lookup(school_id, reference, pin).await?;

        if app.status != ApplicationStatus::Draft {
            return Err(AppError::StateConflict(
                "Application is no longer a draft".to_string(),
            ));
        }

        let update = application::ActiveModel {
            payment_status: Set(Some(PaymentStatus::Paid)),
            payment_method: Set(Some(method.to_string())),
            updated_at: Set(Some(Utc::now().into())),
            ..Default::default()
        };

        // Conditional on `status = 'draft'` so a stale request cannot
        // touch an application that has moved on.
        let rows = self.application_repo.update_draft(&app.id, update).await?;
        if rows == 0 {
            return Err(AppError::StateConflict(
                "Application is no longer a draft".to_string(),
            ));
        }

        let updated = self
            .application_repo
            .get_by_id_and_school(&app.id, school_id)
            .await?;

        tracing::info!(
            application_id = %updated.id,
            method = method,
            "Admission fee payment recorded"
        );

        Ok(updated)
    }

    /// Submit a draft application for review.
    ///
    /// Guards: the application is still a draft, payment has been
    /// recorded, and the category-conditional academic fields match the
    /// stored category and are complete.
    pub async fn submit(
        &self,
        school_id: &str,
        reference: &str,
        pin: &str,
        input: SubmitInput,
    ) -> AppResult<application::Model> {
        input.validate()?;
        input.details.validate()?;

        let app = self.lookup(school_id, reference, pin).await?;

        if app.status != ApplicationStatus::Draft {
            return Err(AppError::StateConflict(
                "Application has already been submitted".to_string(),
            ));
        }

        if !app.is_paid() {
            return Err(AppError::Validation(
                "Admission fee has not been paid".to_string(),
            ));
        }

        // The stored category is immutable; the payload must match it.
        if input.details.category() != app.category {
            return Err(AppError::Validation(
                "Academic details do not match the application category".to_string(),
            ));
        }

        let now = Utc::now();
        let details = input.details;

        let mut update = application::ActiveModel {
            previous_school: Set(details.previous_school().map(String::from)),
            bece_index_number: Set(details.bece_index_number().map(String::from)),
            subject_interests: Set(details.subject_interests_json()),
            status: Set(ApplicationStatus::Submitted),
            submitted_at: Set(Some(now.into())),
            updated_at: Set(Some(now.into())),
            ..Default::default()
        };
        if input.class_level.is_some() {
            update.class_level = Set(input.class_level);
        }

        // Conditional on `status = 'draft'`: a duplicate submit that read
        // the draft before a concurrent review committed affects zero rows
        // instead of rewriting a terminal state.
        let rows = self.application_repo.update_draft(&app.id, update).await?;
        if rows == 0 {
            return Err(AppError::StateConflict(
                "Application has already been submitted".to_string(),
            ));
        }

        let updated = self
            .application_repo
            .get_by_id_and_school(&app.id, school_id)
            .await?;

        tracing::info!(
            application_id = %updated.id,
            school_id = %updated.school_id,
            "Application submitted for review"
        );

        Ok(updated)
    }

    /// Reject a submitted application with a reason.
    ///
    /// Pure state update with no cross-entity side effects. The write is
    /// conditional on `status = 'submitted'` so a concurrent review
    /// resolves to exactly one winner; the loser sees `StateConflict`.
    pub async fn reject(
        &self,
        ctx: &ReviewerContext,
        application_id: &str,
        reason: &str,
    ) -> AppResult<application::Model> {
        ctx.ensure_official()?;

        if reason.trim().is_empty() {
            return Err(AppError::Validation(
                "rejectionReason must not be empty".to_string(),
            ));
        }

        let app = self
            .application_repo
            .get_by_id_and_school(application_id, &ctx.school_id)
            .await?;

        if app.status != ApplicationStatus::Submitted {
            return Err(AppError::StateConflict(
                "Application has already been reviewed".to_string(),
            ));
        }

        let rows = self
            .application_repo
            .reject_submitted(application_id, &ctx.school_id, &ctx.user_id, reason)
            .await?;

        if rows == 0 {
            // Lost the race to a concurrent reviewer.
            return Err(AppError::StateConflict(
                "Application has already been reviewed".to_string(),
            ));
        }

        let rejected = self
            .application_repo
            .get_by_id_and_school(application_id, &ctx.school_id)
            .await?;

        tracing::info!(
            application_id = application_id,
            reviewed_by = %ctx.user_id,
            "Application rejected"
        );

        Ok(rejected)
    }

    /// Look up an application by reference and PIN, scoped to a school.
    ///
    /// A reference belonging to a different school, or a wrong PIN, is
    /// `NotFound` — deliberately indistinguishable from a missing record.
    pub async fn lookup(
        &self,
        school_id: &str,
        reference: &str,
        pin: &str,
    ) -> AppResult<application::Model> {
        let app = self
            .application_repo
            .find_by_reference_and_school(reference, school_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Application not found".to_string()))?;

        if app.pin != pin {
            return Err(AppError::NotFound("Application not found".to_string()));
        }

        Ok(app)
    }

    async fn generate_unique_reference(&self) -> AppResult<String> {
        for _ in 0..self.max_generation_attempts {
            let candidate = self.id_gen.application_reference();
            if !self.application_repo.reference_exists(&candidate).await? {
                return Ok(candidate);
            }
            tracing::debug!(candidate = %candidate, "Reference collision, regenerating");
        }

        Err(AppError::GenerationExhausted(
            "Could not generate a unique application reference".to_string(),
        ))
    }

    async fn generate_unique_pin(&self) -> AppResult<String> {
        for _ in 0..self.max_generation_attempts {
            let candidate = self.id_gen.application_pin();
            if !self.application_repo.pin_exists(&candidate).await? {
                return Ok(candidate);
            }
            tracing::debug!("PIN collision, regenerating");
        }

        Err(AppError::GenerationExhausted(
            "Could not generate a unique application PIN".to_string(),
        ))
    }
}
