//! Create student table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Student::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Student::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Student::SchoolId).string_len(32).not_null())
                    .col(ColumnDef::new(Student::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Student::SchoolClassId).string_len(32).not_null())
                    .col(ColumnDef::new(Student::FirstName).string_len(128).not_null())
                    .col(ColumnDef::new(Student::LastName).string_len(128).not_null())
                    .col(ColumnDef::new(Student::DateOfBirth).date().not_null())
                    .col(ColumnDef::new(Student::Gender).string_len(16).not_null())
                    .col(ColumnDef::new(Student::IndexNumber).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Student::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: index_number (system-wide)
        manager
            .create_index(
                Index::create()
                    .name("idx_student_index_number")
                    .table(Student::Table)
                    .col(Student::IndexNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Unique index: user_id (a student owns exactly one account)
        manager
            .create_index(
                Index::create()
                    .name("idx_student_user_id")
                    .table(Student::Table)
                    .col(Student::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: (school_id, school_class_id) for roster queries
        manager
            .create_index(
                Index::create()
                    .name("idx_student_school_class")
                    .table(Student::Table)
                    .col(Student::SchoolId)
                    .col(Student::SchoolClassId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Student::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Student {
    Table,
    Id,
    SchoolId,
    UserId,
    SchoolClassId,
    FirstName,
    LastName,
    DateOfBirth,
    Gender,
    IndexNumber,
    CreatedAt,
}
