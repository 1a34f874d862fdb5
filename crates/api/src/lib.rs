//! HTTP API layer for shule-rs.
//!
//! This crate provides the REST API for the admission & enrollment
//! lifecycle:
//!
//! - **Endpoints**: applicant-facing admission routes and
//!   official-facing review routes
//! - **Extractors**: bearer-token authentication
//! - **Middleware**: application state and token resolution
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
