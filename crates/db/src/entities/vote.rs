//! Vote entity (the exactly-once-per-user vote ledger).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vote")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// The voting user
    #[sea_orm(indexed)]
    pub user_id: String,

    /// The photo voted for; unique per (user, photo)
    #[sea_orm(indexed)]
    pub photo_id: String,

    /// Contest entry the vote also counted toward, when the photo was
    /// entered in the active contest at vote time
    #[sea_orm(nullable, indexed)]
    pub contest_entry_id: Option<String>,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,

    #[sea_orm(
        belongs_to = "super::photo::Entity",
        from = "Column::PhotoId",
        to = "super::photo::Column::Id",
        on_delete = "Cascade"
    )]
    Photo,

    #[sea_orm(
        belongs_to = "super::contest_entry::Entity",
        from = "Column::ContestEntryId",
        to = "super::contest_entry::Column::Id",
        on_delete = "SetNull"
    )]
    ContestEntry,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::photo::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Photo.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
