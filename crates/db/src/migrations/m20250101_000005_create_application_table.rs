//! Create application table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Application::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Application::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Application::SchoolId).string_len(32).not_null())
                    .col(ColumnDef::new(Application::Reference).string_len(32).not_null())
                    .col(ColumnDef::new(Application::Pin).string_len(16).not_null())
                    .col(ColumnDef::new(Application::Category).string_len(16).not_null())
                    .col(ColumnDef::new(Application::ClassLevel).string_len(32))
                    .col(ColumnDef::new(Application::FirstName).string_len(128).not_null())
                    .col(ColumnDef::new(Application::LastName).string_len(128).not_null())
                    .col(ColumnDef::new(Application::DateOfBirth).date().not_null())
                    .col(ColumnDef::new(Application::Gender).string_len(16).not_null())
                    .col(ColumnDef::new(Application::Address).text().not_null())
                    .col(ColumnDef::new(Application::Email).string_len(256))
                    .col(ColumnDef::new(Application::Phone).string_len(32))
                    .col(ColumnDef::new(Application::GuardianName).string_len(256).not_null())
                    .col(ColumnDef::new(Application::GuardianPhone).string_len(32).not_null())
                    .col(ColumnDef::new(Application::GuardianEmail).string_len(256))
                    .col(ColumnDef::new(Application::PreviousSchool).string_len(256))
                    .col(ColumnDef::new(Application::BeceIndexNumber).string_len(32))
                    .col(ColumnDef::new(Application::SubjectInterests).json_binary())
                    .col(
                        ColumnDef::new(Application::Status)
                            .string_len(16)
                            .not_null()
                            .default("draft"),
                    )
                    .col(ColumnDef::new(Application::PaymentStatus).string_len(16))
                    .col(ColumnDef::new(Application::PaymentMethod).string_len(32))
                    .col(ColumnDef::new(Application::SubmittedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Application::ReviewedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Application::ReviewedBy).string_len(32))
                    .col(ColumnDef::new(Application::RejectionReason).text())
                    .col(ColumnDef::new(Application::GeneratedEmail).string_len(256))
                    .col(ColumnDef::new(Application::GeneratedPassword).string_len(64))
                    .col(ColumnDef::new(Application::StudentId).string_len(32))
                    .col(
                        ColumnDef::new(Application::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Application::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Unique index: reference (system-wide, never reused)
        manager
            .create_index(
                Index::create()
                    .name("idx_application_reference")
                    .table(Application::Table)
                    .col(Application::Reference)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Unique index: pin (system-wide)
        manager
            .create_index(
                Index::create()
                    .name("idx_application_pin")
                    .table(Application::Table)
                    .col(Application::Pin)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: (school_id, status) for the principal's review queue
        manager
            .create_index(
                Index::create()
                    .name("idx_application_school_status")
                    .table(Application::Table)
                    .col(Application::SchoolId)
                    .col(Application::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Application::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Application {
    Table,
    Id,
    SchoolId,
    Reference,
    Pin,
    Category,
    ClassLevel,
    FirstName,
    LastName,
    DateOfBirth,
    Gender,
    Address,
    Email,
    Phone,
    GuardianName,
    GuardianPhone,
    GuardianEmail,
    PreviousSchool,
    BeceIndexNumber,
    SubjectInterests,
    Status,
    PaymentStatus,
    PaymentMethod,
    SubmittedAt,
    ReviewedAt,
    ReviewedBy,
    RejectionReason,
    GeneratedEmail,
    GeneratedPassword,
    StudentId,
    CreatedAt,
    UpdatedAt,
}
