//! Create contest entry table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ContestEntry::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ContestEntry::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ContestEntry::ContestId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ContestEntry::PhotoId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ContestEntry::SubmittedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ContestEntry::Votes)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contest_entry_contest")
                            .from(ContestEntry::Table, ContestEntry::ContestId)
                            .to(Contest::Table, Contest::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contest_entry_photo")
                            .from(ContestEntry::Table, ContestEntry::PhotoId)
                            .to(Photo::Table, Photo::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (contest_id, photo_id) - one entry per photo per contest
        manager
            .create_index(
                Index::create()
                    .name("idx_contest_entry_contest_photo")
                    .table(ContestEntry::Table)
                    .col(ContestEntry::ContestId)
                    .col(ContestEntry::PhotoId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: contest_id + votes (leaderboard scan)
        manager
            .create_index(
                Index::create()
                    .name("idx_contest_entry_contest_votes")
                    .table(ContestEntry::Table)
                    .col(ContestEntry::ContestId)
                    .col(ContestEntry::Votes)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ContestEntry::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ContestEntry {
    Table,
    Id,
    ContestId,
    PhotoId,
    SubmittedAt,
    Votes,
}

#[derive(Iden)]
enum Contest {
    Table,
    Id,
}

#[derive(Iden)]
enum Photo {
    Table,
    Id,
}
