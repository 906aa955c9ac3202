//! Create contest table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Contest::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Contest::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Contest::Prompt).string_len(256).not_null())
                    .col(
                        ColumnDef::new(Contest::StartDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Contest::EndDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Contest::IsActive)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: is_active + end_date (rotation and ensure-active scans)
        manager
            .create_index(
                Index::create()
                    .name("idx_contest_active_end_date")
                    .table(Contest::Table)
                    .col(Contest::IsActive)
                    .col(Contest::EndDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Contest::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Contest {
    Table,
    Id,
    Prompt,
    StartDate,
    EndDate,
    IsActive,
}
