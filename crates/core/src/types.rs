//! Shared admission-engine types.

use serde::{Deserialize, Serialize};
use shule_common::{AppError, AppResult};
use shule_db::entities::{application::ApplicationCategory, user::UserRole};

/// Category-conditional academic fields, supplied at submission.
///
/// Modeled as a tagged union so the category rules are enforced by the
/// type system: a `sss` payload without a BECE index number does not
/// deserialize, rather than failing a runtime field-presence check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "lowercase")]
pub enum CategoryDetails {
    /// Primary admission: no prior academic record required.
    Primary,
    /// Junior secondary: requires the previous school attended.
    #[serde(rename_all = "camelCase")]
    Jss {
        /// Previous school attended.
        previous_school: String,
    },
    /// Senior secondary: requires previous school, BECE index number and
    /// subject interests.
    #[serde(rename_all = "camelCase")]
    Sss {
        /// Previous school attended.
        previous_school: String,
        /// BECE examination index number.
        bece_index_number: String,
        /// Subjects the applicant wants to pursue.
        subject_interests: Vec<String>,
    },
}

impl CategoryDetails {
    /// The category this payload belongs to.
    #[must_use]
    pub const fn category(&self) -> ApplicationCategory {
        match self {
            Self::Primary => ApplicationCategory::Primary,
            Self::Jss { .. } => ApplicationCategory::Jss,
            Self::Sss { .. } => ApplicationCategory::Sss,
        }
    }

    /// Reject payloads whose required fields are present but empty.
    pub fn validate(&self) -> AppResult<()> {
        match self {
            Self::Primary => Ok(()),
            Self::Jss { previous_school } => {
                if previous_school.trim().is_empty() {
                    return Err(AppError::Validation(
                        "previousSchool must not be empty".to_string(),
                    ));
                }
                Ok(())
            }
            Self::Sss {
                previous_school,
                bece_index_number,
                subject_interests,
            } => {
                if previous_school.trim().is_empty() {
                    return Err(AppError::Validation(
                        "previousSchool must not be empty".to_string(),
                    ));
                }
                if bece_index_number.trim().is_empty() {
                    return Err(AppError::Validation(
                        "beceIndexNumber must not be empty".to_string(),
                    ));
                }
                if subject_interests.is_empty() {
                    return Err(AppError::Validation(
                        "subjectInterests must not be empty".to_string(),
                    ));
                }
                Ok(())
            }
        }
    }

    /// Previous school, where the category carries one.
    #[must_use]
    pub fn previous_school(&self) -> Option<&str> {
        match self {
            Self::Primary => None,
            Self::Jss { previous_school }
            | Self::Sss {
                previous_school, ..
            } => Some(previous_school),
        }
    }

    /// BECE index number (sss only).
    #[must_use]
    pub fn bece_index_number(&self) -> Option<&str> {
        match self {
            Self::Sss {
                bece_index_number, ..
            } => Some(bece_index_number),
            _ => None,
        }
    }

    /// Subject interests as a JSON array (sss only).
    #[must_use]
    pub fn subject_interests_json(&self) -> Option<serde_json::Value> {
        match self {
            Self::Sss {
                subject_interests, ..
            } => Some(serde_json::json!(subject_interests)),
            _ => None,
        }
    }
}

/// Explicit caller identity for review operations.
///
/// Replaces ambient request/session state: every state-machine operation
/// receives the reviewing official's identity and authorized school scope
/// as an argument.
#[derive(Debug, Clone)]
pub struct ReviewerContext {
    /// The reviewing official's user ID.
    pub user_id: String,
    /// The school the caller is authorized for. All lookups are scoped
    /// to this school.
    pub school_id: String,
    /// The caller's role.
    pub role: UserRole,
}

impl ReviewerContext {
    /// Ensure the caller may review applications.
    pub fn ensure_official(&self) -> AppResult<()> {
        match self.role {
            UserRole::Principal | UserRole::Admin => Ok(()),
            UserRole::Student => Err(AppError::Forbidden(
                "Only school officials may review applications".to_string(),
            )),
        }
    }
}

/// Credentials returned exactly once, from a successful approval.
///
/// The password is cleartext here for the one-time principal-facing
/// display; the account record stores only the argon2 hash.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OneTimeCredentials {
    /// Login email for the new account.
    pub email: String,
    /// Temporary cleartext password.
    pub password: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sss_without_bece_index_does_not_deserialize() {
        let payload = serde_json::json!({
            "category": "sss",
            "previousSchool": "Harbour JSS",
            "subjectInterests": ["physics", "chemistry"],
        });

        let result: Result<CategoryDetails, _> = serde_json::from_value(payload);
        assert!(result.is_err());
    }

    #[test]
    fn test_sss_with_all_fields_deserializes() {
        let payload = serde_json::json!({
            "category": "sss",
            "previousSchool": "Harbour JSS",
            "beceIndexNumber": "102034567",
            "subjectInterests": ["physics", "chemistry"],
        });

        let details: CategoryDetails = serde_json::from_value(payload).unwrap();
        assert_eq!(details.category(), ApplicationCategory::Sss);
        assert!(details.validate().is_ok());
        assert_eq!(details.bece_index_number(), Some("102034567"));
    }

    #[test]
    fn test_jss_requires_previous_school() {
        let payload = serde_json::json!({ "category": "jss" });
        let result: Result<CategoryDetails, _> = serde_json::from_value(payload);
        assert!(result.is_err());

        let payload = serde_json::json!({
            "category": "jss",
            "previousSchool": "Harbour Primary",
        });
        let details: CategoryDetails = serde_json::from_value(payload).unwrap();
        assert_eq!(details.previous_school(), Some("Harbour Primary"));
    }

    #[test]
    fn test_primary_requires_nothing() {
        let payload = serde_json::json!({ "category": "primary" });
        let details: CategoryDetails = serde_json::from_value(payload).unwrap();
        assert_eq!(details.category(), ApplicationCategory::Primary);
        assert!(details.validate().is_ok());
        assert!(details.previous_school().is_none());
    }

    #[test]
    fn test_empty_required_field_fails_validation() {
        let details = CategoryDetails::Jss {
            previous_school: "   ".to_string(),
        };
        assert!(matches!(
            details.validate(),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_student_role_cannot_review() {
        let ctx = ReviewerContext {
            user_id: "user1".to_string(),
            school_id: "school7".to_string(),
            role: UserRole::Student,
        };
        assert!(matches!(
            ctx.ensure_official(),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_principal_role_can_review() {
        let ctx = ReviewerContext {
            user_id: "principal3".to_string(),
            school_id: "school7".to_string(),
            role: UserRole::Principal,
        };
        assert!(ctx.ensure_official().is_ok());
    }
}
