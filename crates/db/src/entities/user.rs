//! Login account entity.
//!
//! Append-only from the admission engine's perspective: approval inserts
//! a new account, never updates an existing one.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Role attached to a login account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[sea_orm(string_value = "student")]
    Student,
    #[sea_orm(string_value = "principal")]
    Principal,
    #[sea_orm(string_value = "admin")]
    Admin,
}

/// Login account.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Login email, unique system-wide.
    #[sea_orm(unique)]
    pub email: String,

    /// Argon2 password hash. Never serialized to API responses.
    #[serde(skip_serializing)]
    pub password_hash: String,

    pub role: UserRole,

    pub school_id: String,

    /// Bearer token for API access.
    #[sea_orm(unique, nullable)]
    pub token: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::student::Entity")]
    Student,
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
