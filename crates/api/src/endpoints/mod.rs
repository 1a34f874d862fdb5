//! API endpoints.

mod admissions;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest(
            "/schools/{school_id}/admissions",
            admissions::applicant_router(),
        )
        .nest("/admissions", admissions::review_router())
}
