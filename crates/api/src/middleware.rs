//! API middleware.

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use shule_core::{AdmissionService, EnrollmentService};
use shule_db::repositories::UserRepository;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub admission_service: AdmissionService,
    pub enrollment_service: EnrollmentService,
    pub user_repo: UserRepository,
}

/// Authentication middleware.
///
/// Resolves a bearer token to an account and stashes it in the request
/// extensions. Applicant-facing routes need no account, so a missing or
/// unknown token falls through; protected handlers reject via the
/// `AuthUser` extractor.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
        && let Ok(Some(user)) = state.user_repo.find_by_token(token).await
    {
        req.extensions_mut().insert(user);
    }

    next.run(req).await
}
