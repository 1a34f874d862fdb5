//! Create school table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(School::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(School::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(School::Name).string_len(256).not_null())
                    .col(ColumnDef::new(School::EmailDomain).string_len(256).not_null())
                    .col(
                        ColumnDef::new(School::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(School::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum School {
    Table,
    Id,
    Name,
    EmailDomain,
    CreatedAt,
}
