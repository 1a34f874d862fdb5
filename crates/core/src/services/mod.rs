//! Core services.

pub mod admission;
pub mod enrollment;

pub use admission::{AdmissionService, CreateDraftInput, SubmitInput};
pub use enrollment::EnrollmentService;
