//! Create guardian request table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GuardianRequest::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GuardianRequest::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(GuardianRequest::GuardianId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GuardianRequest::OwnerId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GuardianRequest::PetId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GuardianRequest::Status)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GuardianRequest::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_guardian_request_guardian")
                            .from(GuardianRequest::Table, GuardianRequest::GuardianId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_guardian_request_owner")
                            .from(GuardianRequest::Table, GuardianRequest::OwnerId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_guardian_request_pet")
                            .from(GuardianRequest::Table, GuardianRequest::PetId)
                            .to(Pet::Table, Pet::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: guardian_id + pet_id + status (duplicate-request check)
        manager
            .create_index(
                Index::create()
                    .name("idx_guardian_request_guardian_pet")
                    .table(GuardianRequest::Table)
                    .col(GuardianRequest::GuardianId)
                    .col(GuardianRequest::PetId)
                    .col(GuardianRequest::Status)
                    .to_owned(),
            )
            .await?;

        // Index: owner_id + status (pending-request inbox scan)
        manager
            .create_index(
                Index::create()
                    .name("idx_guardian_request_owner_status")
                    .table(GuardianRequest::Table)
                    .col(GuardianRequest::OwnerId)
                    .col(GuardianRequest::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GuardianRequest::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum GuardianRequest {
    Table,
    Id,
    GuardianId,
    OwnerId,
    PetId,
    Status,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}

#[derive(Iden)]
enum Pet {
    Table,
    Id,
}
