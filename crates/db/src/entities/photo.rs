//! Photo entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Photo privacy levels.
///
/// Privacy determines feed eligibility: `public` photos appear in the global
/// and contest feeds, `friends_only` photos appear in friends feeds of
/// connected users, `private` photos never leave the owner's gallery.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum Privacy {
    #[sea_orm(string_value = "public")]
    Public,
    #[sea_orm(string_value = "friends_only")]
    FriendsOnly,
    #[sea_orm(string_value = "private")]
    Private,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "photo")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Pet shown in the photo
    #[sea_orm(indexed)]
    pub pet_id: String,

    /// Uploading user ID
    #[sea_orm(indexed)]
    pub uploaded_by: String,

    /// Blob-store key for the image
    pub image_key: String,

    /// Privacy level
    pub privacy: Privacy,

    /// Vote count (denormalized, maintained by the vote ledger)
    #[sea_orm(default_value = 0)]
    pub vote_count: i32,

    pub uploaded_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::pet::Entity",
        from = "Column::PetId",
        to = "super::pet::Column::Id",
        on_delete = "Cascade"
    )]
    Pet,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UploadedBy",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Uploader,

    #[sea_orm(has_many = "super::contest_entry::Entity")]
    ContestEntries,

    #[sea_orm(has_many = "super::vote::Entity")]
    Votes,
}

impl Related<super::pet::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pet.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Uploader.def()
    }
}

impl Related<super::contest_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ContestEntries.def()
    }
}

impl Related<super::vote::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Votes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
