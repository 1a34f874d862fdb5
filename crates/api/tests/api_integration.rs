//! API integration tests.
//!
//! These tests drive the full router with a mock database to verify
//! routing, status codes and the auth boundary.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
    middleware,
};
use chrono::{NaiveDate, Utc};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
use shule_api::{middleware::AppState, router as api_router};
use shule_common::config::{AdmissionsConfig, Config, DatabaseConfig, ServerConfig};
use shule_core::{AdmissionService, EnrollmentService};
use shule_db::entities::{
    application::{self, ApplicationCategory, ApplicationStatus, PaymentStatus},
    school, user,
    user::UserRole,
};
use shule_db::repositories::{ApplicationRepository, SchoolRepository, UserRepository};
use std::sync::Arc;
use tower::ServiceExt;

/// Create a test configuration.
fn create_test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
        },
        database: DatabaseConfig {
            url: "postgres://localhost/test".to_string(),
            max_connections: 10,
            min_connections: 1,
        },
        admissions: AdmissionsConfig::default(),
    }
}

fn test_school() -> school::Model {
    school::Model {
        id: "school7".to_string(),
        name: "St. Mary's Secondary".to_string(),
        email_domain: "students.stmarys.edu.gh".to_string(),
        created_at: Utc::now().into(),
    }
}

fn test_application(status: ApplicationStatus, payment: PaymentStatus) -> application::Model {
    application::Model {
        id: "app1".to_string(),
        school_id: "school7".to_string(),
        reference: "APP-2026-A1B2C3".to_string(),
        pin: "042917".to_string(),
        category: ApplicationCategory::Jss,
        class_level: None,
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
        previous_school: None,
        bece_index_number: None,
        subject_interests: None,
        status,
        payment_status: Some(payment),
        payment_method: None,
        submitted_at: None,
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

fn test_student_user() -> user::Model {
    user::Model {
        id: "user1".to_string(),
        email: "ama.sesay412@students.stmarys.edu.gh".to_string(),
        password_hash: "$argon2id$test".to_string(),
        role: UserRole::Student,
        school_id: "school7".to_string(),
        token: Some("student-token".to_string()),
        created_at: Utc::now().into(),
        updated_at: None,
    }
}

/// Create the test router with the given mock database behind it.
fn create_test_router(db: DatabaseConnection) -> Router {
    let db = Arc::new(db);
    let config = create_test_config();

    let state = AppState {
        admission_service: AdmissionService::new(
            ApplicationRepository::new(Arc::clone(&db)),
            SchoolRepository::new(Arc::clone(&db)),
            &config,
        ),
        enrollment_service: EnrollmentService::new(Arc::clone(&db), &config),
        user_repo: UserRepository::new(db),
    };

    api_router()
        .layer(middleware::from_fn_with_state(
            state.clone(),
            shule_api::middleware::auth_middleware,
        ))
        .with_state(state)
}

fn empty_mock_db() -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres).into_connection()
}

#[tokio::test]
async fn test_unknown_endpoint_returns_404() {
    let app = create_test_router(empty_mock_db());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/nonexistent/endpoint")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_draft_with_invalid_json_returns_error() {
    let app = create_test_router(empty_mock_db());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/schools/school7/admissions")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from("invalid json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(
        response.status() == StatusCode::BAD_REQUEST
            || response.status() == StatusCode::UNPROCESSABLE_ENTITY
    );
}

#[tokio::test]
async fn test_create_draft_returns_created_with_reference_and_pin() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[test_school()]])
        // Reference and PIN probes find no collision
        .append_query_results([Vec::<application::Model>::new()])
        .append_query_results([Vec::<application::Model>::new()])
        .append_query_results([[test_application(
            ApplicationStatus::Draft,
            PaymentStatus::Pending,
        )]])
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();

    let app = create_test_router(db);

    let body = serde_json::json!({
        "category": "jss",
        "firstName": "Ama",
        "lastName": "Sesay",
        "dateOfBirth": "2012-03-14",
        "gender": "female",
        "address": "12 Harbour Road",
        "guardianName": "Kadiatu Sesay",
        "guardianPhone": "+23276000000",
    });

    let response = app
        .oneshot(
            Request::builder()
                .uri("/schools/school7/admissions")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["data"]["reference"], "APP-2026-A1B2C3");
    assert_eq!(json["data"]["pin"], "042917");
    assert_eq!(json["data"]["application"]["status"], "draft");
}

#[tokio::test]
async fn test_lookup_without_pin_returns_error() {
    let app = create_test_router(empty_mock_db());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/schools/school7/admissions/APP-2026-A1B2C3")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(
        response.status() == StatusCode::BAD_REQUEST
            || response.status() == StatusCode::UNPROCESSABLE_ENTITY
    );
}

#[tokio::test]
async fn test_lookup_wrong_pin_returns_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[test_application(
            ApplicationStatus::Draft,
            PaymentStatus::Pending,
        )]])
        .into_connection();

    let app = create_test_router(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/schools/school7/admissions/APP-2026-A1B2C3?pin=999999")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_submit_before_payment_returns_error() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[test_application(
            ApplicationStatus::Draft,
            PaymentStatus::Pending,
        )]])
        .into_connection();

    let app = create_test_router(db);

    let body = serde_json::json!({
        "pin": "042917",
        "category": "jss",
        "previousSchool": "Harbour Primary",
    });

    let response = app
        .oneshot(
            Request::builder()
                .uri("/schools/school7/admissions/APP-2026-A1B2C3/submit")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_approve_without_token_returns_unauthorized() {
    let app = create_test_router(empty_mock_db());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/admissions/app1/approve")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from(r#"{"classId":"class12"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_reject_with_student_token_returns_forbidden() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        // Token resolution finds a student account
        .append_query_results([[test_student_user()]])
        .into_connection();

    let app = create_test_router(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/admissions/app1/reject")
                .method("POST")
                .header("Content-Type", "application/json")
                .header("Authorization", "Bearer student-token")
                .body(Body::from(r#"{"reason":"Incomplete records"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_already_reviewed_application_returns_conflict() {
    let mut principal = test_student_user();
    principal.id = "principal3".to_string();
    principal.role = UserRole::Principal;
    principal.token = Some("principal-token".to_string());

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[principal]])
        .append_query_results([[test_application(
            ApplicationStatus::Rejected,
            PaymentStatus::Paid,
        )]])
        .into_connection();

    let app = create_test_router(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/admissions/app1/approve")
                .method("POST")
                .header("Content-Type", "application/json")
                .header("Authorization", "Bearer principal-token")
                .body(Body::from(r#"{"classId":"class12"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}
