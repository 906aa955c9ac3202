//! Guardian request entity (pet co-ownership invitation).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub use super::connection::RequestStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "guardian_request")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// The user asking to become a guardian
    #[sea_orm(indexed)]
    pub guardian_id: String,

    /// The pet's owner, who approves or rejects
    #[sea_orm(indexed)]
    pub owner_id: String,

    /// The pet the request is scoped to
    #[sea_orm(indexed)]
    pub pet_id: String,

    pub status: RequestStatus,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::GuardianId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Guardian,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Owner,

    #[sea_orm(
        belongs_to = "super::pet::Entity",
        from = "Column::PetId",
        to = "super::pet::Column::Id",
        on_delete = "Cascade"
    )]
    Pet,
}

impl ActiveModelBehavior for ActiveModel {}
