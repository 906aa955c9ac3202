//! Create photo table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Photo::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Photo::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Photo::PetId).string_len(32).not_null())
                    .col(ColumnDef::new(Photo::UploadedBy).string_len(32).not_null())
                    .col(ColumnDef::new(Photo::ImageKey).string_len(512).not_null())
                    .col(ColumnDef::new(Photo::Privacy).string_len(16).not_null())
                    .col(
                        ColumnDef::new(Photo::VoteCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Photo::UploadedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_photo_pet")
                            .from(Photo::Table, Photo::PetId)
                            .to(Pet::Table, Pet::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_photo_uploader")
                            .from(Photo::Table, Photo::UploadedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: uploaded_by + privacy (friends feed scan)
        manager
            .create_index(
                Index::create()
                    .name("idx_photo_uploader_privacy")
                    .table(Photo::Table)
                    .col(Photo::UploadedBy)
                    .col(Photo::Privacy)
                    .to_owned(),
            )
            .await?;

        // Index: privacy + uploaded_at (global feed scan)
        manager
            .create_index(
                Index::create()
                    .name("idx_photo_privacy_uploaded_at")
                    .table(Photo::Table)
                    .col(Photo::Privacy)
                    .col(Photo::UploadedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Photo::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Photo {
    Table,
    Id,
    PetId,
    UploadedBy,
    ImageKey,
    Privacy,
    VoteCount,
    UploadedAt,
}

#[derive(Iden)]
enum Pet {
    Table,
    Id,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
