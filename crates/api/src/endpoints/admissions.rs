//! Admission lifecycle endpoints.
//!
//! Two surfaces share these routes: the applicant-facing surface keyed by
//! school, reference and PIN (no account required), and the review surface
//! keyed by application ID behind bearer-token authentication.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shule_common::AppResult;
use shule_core::{CreateDraftInput, OneTimeCredentials, SubmitInput};
use shule_db::entities::application::{
    self, ApplicationCategory, ApplicationStatus, PaymentStatus,
};
use validator::Validate;

use crate::{extractors::AuthUser, middleware::AppState, response::{ApiResponse, created}};

/// Public view of an application. Excludes the PIN and the one-time
/// password; the PIN is disclosed only in the creation response, the
/// password only in the approval response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationView {
    pub id: String,
    pub school_id: String,
    pub reference: String,
    pub category: ApplicationCategory,
    pub class_level: Option<String>,
    pub status: ApplicationStatus,
    pub payment_status: Option<PaymentStatus>,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub submitted_at: Option<chrono::DateTime<chrono::FixedOffset>>,
    pub reviewed_at: Option<chrono::DateTime<chrono::FixedOffset>>,
    pub rejection_reason: Option<String>,
    pub generated_email: Option<String>,
    pub student_id: Option<String>,
}

impl From<application::Model> for ApplicationView {
    fn from(model: application::Model) -> Self {
        Self {
            id: model.id,
            school_id: model.school_id,
            reference: model.reference,
            category: model.category,
            class_level: model.class_level,
            status: model.status,
            payment_status: model.payment_status,
            first_name: model.first_name,
            last_name: model.last_name,
            date_of_birth: model.date_of_birth,
            submitted_at: model.submitted_at,
            reviewed_at: model.reviewed_at,
            rejection_reason: model.rejection_reason,
            generated_email: model.generated_email,
            student_id: model.student_id,
        }
    }
}

/// Draft creation response. The only place the PIN is ever disclosed.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDraftResponse {
    pub reference: String,
    pub pin: String,
    pub application: ApplicationView,
}

/// Create a draft application.
async fn create_draft(
    State(state): State<AppState>,
    Path(school_id): Path<String>,
    Json(req): Json<CreateDraftInput>,
) -> AppResult<impl IntoResponse> {
    let app = state.admission_service.create_draft(&school_id, req).await?;

    Ok(created(CreateDraftResponse {
        reference: app.reference.clone(),
        pin: app.pin.clone(),
        application: app.into(),
    }))
}

/// Lookup query parameters.
#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    pub pin: String,
}

/// Look up an application by reference and PIN.
async fn lookup(
    State(state): State<AppState>,
    Path((school_id, reference)): Path<(String, String)>,
    Query(query): Query<LookupQuery>,
) -> AppResult<ApiResponse<ApplicationView>> {
    let app = state
        .admission_service
        .lookup(&school_id, &reference, &query.pin)
        .await?;

    Ok(ApiResponse::ok(app.into()))
}

/// Payment request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub pin: String,

    #[validate(length(min = 1, max = 32))]
    pub payment_method: String,
}

/// Record payment of the admission fee for a draft application.
async fn record_payment(
    State(state): State<AppState>,
    Path((school_id, reference)): Path<(String, String)>,
    Json(req): Json<PaymentRequest>,
) -> AppResult<ApiResponse<ApplicationView>> {
    req.validate()?;

    let app = state
        .admission_service
        .record_payment(&school_id, &reference, &req.pin, &req.payment_method)
        .await?;

    Ok(ApiResponse::ok(app.into()))
}

/// Submission request: the PIN plus the category-conditional academic
/// fields.
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub pin: String,

    #[serde(flatten)]
    pub input: SubmitInput,
}

/// Submit a draft application for review.
async fn submit(
    State(state): State<AppState>,
    Path((school_id, reference)): Path<(String, String)>,
    Json(req): Json<SubmitRequest>,
) -> AppResult<ApiResponse<ApplicationView>> {
    let app = state
        .admission_service
        .submit(&school_id, &reference, &req.pin, req.input)
        .await?;

    Ok(ApiResponse::ok(app.into()))
}

/// Approval request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ApproveRequest {
    /// Class the enrolled student is assigned to. Must belong to the
    /// reviewing official's school.
    #[validate(length(min = 1))]
    pub class_id: String,
}

/// Approval response. The only place the temporary password is ever
/// disclosed.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveResponse {
    pub application: ApplicationView,
    pub credentials: OneTimeCredentials,
}

/// Approve a submitted application and enroll the applicant.
async fn approve(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ApproveRequest>,
) -> AppResult<ApiResponse<ApproveResponse>> {
    req.validate()?;

    let ctx = auth.reviewer_context();
    let (app, credentials) = state
        .enrollment_service
        .approve(&ctx, &id, &req.class_id)
        .await?;

    Ok(ApiResponse::ok(ApproveResponse {
        application: app.into(),
        credentials,
    }))
}

/// Rejection request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RejectRequest {
    #[validate(length(min = 1, max = 1024))]
    pub reason: String,
}

/// Reject a submitted application with a reason.
async fn reject(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<RejectRequest>,
) -> AppResult<ApiResponse<ApplicationView>> {
    req.validate()?;

    let ctx = auth.reviewer_context();
    let app = state.admission_service.reject(&ctx, &id, &req.reason).await?;

    Ok(ApiResponse::ok(app.into()))
}

/// Applicant-facing routes, nested under `/schools/{school_id}/admissions`.
pub fn applicant_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_draft))
        .route("/{reference}", get(lookup))
        .route("/{reference}/payment", post(record_payment))
        .route("/{reference}/submit", post(submit))
}

/// Review routes, nested under `/admissions`. Require an authenticated
/// school official.
pub fn review_router() -> Router<AppState> {
    Router::new()
        .route("/{id}/approve", post(approve))
        .route("/{id}/reject", post(reject))
}
