//! Student entity. School-scoped academic record created on approval.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "student")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub school_id: String,

    /// Owning login account, 1:1.
    #[sea_orm(unique)]
    pub user_id: String,

    pub school_class_id: String,

    pub first_name: String,

    pub last_name: String,

    pub date_of_birth: Date,

    pub gender: String,

    /// `STU-<year>-<4 digits>`, unique system-wide.
    #[sea_orm(unique)]
    pub index_number: String,

    pub created_at: DateTimeWithTimeZone,
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
        belongs_to = "super::school_class::Entity",
        from = "Column::SchoolClassId",
        to = "super::school_class::Column::Id"
    )]
    Class,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::school::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::School.def()
    }
}

impl Related<super::school_class::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Class.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
