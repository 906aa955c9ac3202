//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250901_000001_create_user_table;
mod m20250901_000002_create_pet_table;
mod m20250901_000003_create_photo_table;
mod m20250901_000004_create_contest_table;
mod m20250901_000005_create_contest_entry_table;
mod m20250901_000006_create_connection_table;
mod m20250901_000007_create_guardian_request_table;
mod m20250901_000008_create_vote_table;
mod m20250901_000009_create_notification_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250901_000001_create_user_table::Migration),
            Box::new(m20250901_000002_create_pet_table::Migration),
            Box::new(m20250901_000003_create_photo_table::Migration),
            Box::new(m20250901_000004_create_contest_table::Migration),
            Box::new(m20250901_000005_create_contest_entry_table::Migration),
            Box::new(m20250901_000006_create_connection_table::Migration),
            Box::new(m20250901_000007_create_guardian_request_table::Migration),
            Box::new(m20250901_000008_create_vote_table::Migration),
            Box::new(m20250901_000009_create_notification_table::Migration),
        ]
    }
}
