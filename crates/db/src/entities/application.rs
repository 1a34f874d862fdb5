//! Admission application entity.
//!
//! The central record of the admission lifecycle. `reference` and `pin`
//! are unique system-wide for the lifetime of the system; the status
//! column drives the `draft -> submitted -> {approved | rejected}` state
//! machine enforced by the admission and enrollment services.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle status of an admission application.
///
/// `Approved` and `Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum ApplicationStatus {
    #[sea_orm(string_value = "draft")]
    #[default]
    Draft,
    #[sea_orm(string_value = "submitted")]
    Submitted,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

/// Admission category. Immutable once set; determines which academic
/// fields are mandatory at submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum ApplicationCategory {
    #[sea_orm(string_value = "primary")]
    Primary,
    #[sea_orm(string_value = "jss")]
    Jss,
    #[sea_orm(string_value = "sss")]
    Sss,
}

/// Payment status of the admission fee. Informational flag, but gates
/// the `draft -> submitted` transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "paid")]
    Paid,
}

/// Admission application record.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "application")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Owning school. Immutable after creation.
    pub school_id: String,

    /// Human-facing unique code: `APP-<year>-<6 uppercase alphanumerics>`.
    #[sea_orm(unique)]
    pub reference: String,

    /// Second, independent lookup/verification secret (6-digit numeric).
    #[sea_orm(unique)]
    pub pin: String,

    /// Admission category. Immutable after creation.
    pub category: ApplicationCategory,

    /// More specific grade/class label within the category (e.g. "jss-2").
    #[sea_orm(nullable)]
    pub class_level: Option<String>,

    pub first_name: String,

    pub last_name: String,

    pub date_of_birth: Date,

    pub gender: String,

    #[sea_orm(column_type = "Text")]
    pub address: String,

    /// Applicant-supplied contact email (optional). Preferred for the
    /// generated account if still unregistered at approval time.
    #[sea_orm(nullable)]
    pub email: Option<String>,

    #[sea_orm(nullable)]
    pub phone: Option<String>,

    pub guardian_name: String,

    pub guardian_phone: String,

    #[sea_orm(nullable)]
    pub guardian_email: Option<String>,

    /// Previous school attended. Required for jss/sss at submission.
    #[sea_orm(nullable)]
    pub previous_school: Option<String>,

    /// BECE index number. Required for sss at submission.
    #[sea_orm(nullable)]
    pub bece_index_number: Option<String>,

    /// Subject interests (JSON array of strings). Required for sss.
    #[sea_orm(nullable)]
    pub subject_interests: Option<Json>,

    pub status: ApplicationStatus,

    #[sea_orm(nullable)]
    pub payment_status: Option<PaymentStatus>,

    #[sea_orm(nullable)]
    pub payment_method: Option<String>,

    #[sea_orm(nullable)]
    pub submitted_at: Option<DateTimeWithTimeZone>,

    #[sea_orm(nullable)]
    pub reviewed_at: Option<DateTimeWithTimeZone>,

    /// The official (user id) who reviewed the application.
    #[sea_orm(nullable)]
    pub reviewed_by: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub rejection_reason: Option<String>,

    /// Login email handed to the new account. Write-once, on approval.
    #[sea_orm(nullable)]
    pub generated_email: Option<String>,

    /// Cleartext temporary password retained for one-time principal-facing
    /// display. The account itself stores only the argon2 hash; keeping the
    /// cleartext here is a known, deliberate exposure trade-off.
    #[sea_orm(nullable)]
    pub generated_password: Option<String>,

    /// Set exactly once, on approval, linking to the new student record.
    #[sea_orm(nullable)]
    pub student_id: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::school::Entity",
        from = "Column::SchoolId",
        to = "super::school::Column::Id"
    )]
    School,

    #[sea_orm(
        belongs_to = "super::student::Entity",
        from = "Column::StudentId",
        to = "super::student::Column::Id"
    )]
    Student,
}

impl Related<super::school::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::School.def()
    }
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Whether the application is in a terminal state.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self.status,
            ApplicationStatus::Approved | ApplicationStatus::Rejected
        )
    }

    /// Whether the admission fee has been recorded as paid.
    #[must_use]
    pub fn is_paid(&self) -> bool {
        self.payment_status == Some(PaymentStatus::Paid)
    }
}
