//! Core business logic for shule-rs.
//!
//! Home of the admission & enrollment lifecycle engine: the application
//! state machine ([`AdmissionService`]) and the approval transaction
//! coordinator ([`EnrollmentService`]).

pub mod services;
pub mod types;

pub use services::*;
pub use types::{CategoryDetails, OneTimeCredentials, ReviewerContext};

/// Generate a unique ID using ULID.
#[must_use]
pub fn generate_id() -> String {
    ulid::Ulid::new().to_string().to_lowercase()
}
