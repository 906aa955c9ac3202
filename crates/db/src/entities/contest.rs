//! Contest entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contest")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Theme prompt ("Sleepiest Sunday", ...)
    pub prompt: String,

    pub start_date: DateTimeWithTimeZone,

    pub end_date: DateTimeWithTimeZone,

    /// Whether this contest is the active one.
    ///
    /// Invariant: at most one contest has `is_active = true` with an
    /// `end_date` in the future. Enforced by `ensure_active` and the
    /// rotation pass, not by the schema.
    #[sea_orm(indexed, default_value = false)]
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::contest_entry::Entity")]
    Entries,
}

impl Related<super::contest_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Entries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
