//! Error types for shule-rs.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Application result type.
pub type AppResult<T> = Result<T, AppError>;

/// Application error type.
///
/// The admission lifecycle maps onto this taxonomy as follows:
/// validation is rejected at the boundary before any state change,
/// [`AppError::StateConflict`] signals a transition attempted from an
/// illegal source state (and guarantees no side effects occurred), and
/// [`AppError::ProvisioningFailed`] signals that the enrollment
/// transaction rolled back with the application left untouched.
#[derive(Debug, Error)]
pub enum AppError {
    // === Client Errors ===
    /// The record does not exist, or belongs to a different school.
    /// Deliberately indistinguishable to avoid leaking cross-tenant
    /// existence information.
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Transition attempted from an illegal source state, e.g. approving
    /// an already-approved application. No side effects occurred.
    #[error("Already processed: {0}")]
    StateConflict(String),

    // === Server Errors ===
    /// Identifier generation failed to find a unique value within the
    /// retry budget. Extremely rare given the identifier space sizes.
    #[error("Identifier generation exhausted: {0}")]
    GenerationExhausted(String),

    /// The enrollment transaction failed and rolled back; the application
    /// is unchanged and the approval call may be retried safely.
    #[error("Provisioning failed: {0}")]
    ProvisioningFailed(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            // 4xx Client Errors
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::StateConflict(_) => StatusCode::CONFLICT,

            // 5xx Server Errors
            Self::GenerationExhausted(_)
            | Self::ProvisioningFailed(_)
            | Self::Database(_)
            | Self::Config(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::StateConflict(_) => "STATE_CONFLICT",
            Self::GenerationExhausted(_) => "GENERATION_EXHAUSTED",
            Self::ProvisioningFailed(_) => "PROVISIONING_FAILED",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns whether this error should be logged at error level.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        // Log server errors
        if self.is_server_error() {
            tracing::error!(error = %self, code = code, "Server error occurred");
        } else {
            tracing::debug!(error = %self, code = code, "Client error occurred");
        }

        let body = Json(json!({
            "error": {
                "code": code,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

// === From implementations ===

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}
