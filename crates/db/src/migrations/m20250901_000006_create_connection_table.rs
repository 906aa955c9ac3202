//! Create connection table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Connection::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Connection::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Connection::RequesterId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Connection::RecipientId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Connection::Status).string_len(16).not_null())
                    .col(
                        ColumnDef::new(Connection::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_connection_requester")
                            .from(Connection::Table, Connection::RequesterId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_connection_recipient")
                            .from(Connection::Table, Connection::RecipientId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: requester_id + status
        manager
            .create_index(
                Index::create()
                    .name("idx_connection_requester_status")
                    .table(Connection::Table)
                    .col(Connection::RequesterId)
                    .col(Connection::Status)
                    .to_owned(),
            )
            .await?;

        // Index: recipient_id + status (pending-request inbox scan)
        manager
            .create_index(
                Index::create()
                    .name("idx_connection_recipient_status")
                    .table(Connection::Table)
                    .col(Connection::RecipientId)
                    .col(Connection::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Connection::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Connection {
    Table,
    Id,
    RequesterId,
    RecipientId,
    Status,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
