//! Request extractors.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use shule_core::ReviewerContext;
use shule_db::entities::user;

/// Authenticated user extractor.
#[derive(Debug, Clone)]
pub struct AuthUser(pub user::Model);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get user from request extensions (set by auth middleware)
        parts
            .extensions
            .get::<user::Model>()
            .cloned()
            .map(AuthUser)
            .ok_or((StatusCode::UNAUTHORIZED, "Unauthorized"))
    }
}

impl AuthUser {
    /// The caller's identity as a review context, scoped to the school
    /// their account belongs to.
    #[must_use]
    pub fn reviewer_context(&self) -> ReviewerContext {
        ReviewerContext {
            user_id: self.0.id.clone(),
            school_id: self.0.school_id.clone(),
            role: self.0.role,
        }
    }
}
