//! Create school class table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SchoolClass::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(SchoolClass::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(SchoolClass::SchoolId).string_len(32).not_null())
                    .col(ColumnDef::new(SchoolClass::Name).string_len(128).not_null())
                    .col(ColumnDef::new(SchoolClass::Level).string_len(32).not_null())
                    .col(
                        ColumnDef::new(SchoolClass::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: school_id (classes are always listed per school)
        manager
            .create_index(
                Index::create()
                    .name("idx_school_class_school_id")
                    .table(SchoolClass::Table)
                    .col(SchoolClass::SchoolId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SchoolClass::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum SchoolClass {
    Table,
    Id,
    SchoolId,
    Name,
    Level,
    CreatedAt,
}
