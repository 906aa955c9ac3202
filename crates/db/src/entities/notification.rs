//! Notification entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Notification types.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum NotificationType {
    #[sea_orm(string_value = "connectionRequest")]
    ConnectionRequest,
    #[sea_orm(string_value = "connectionAccepted")]
    ConnectionAccepted,
    #[sea_orm(string_value = "guardianRequest")]
    GuardianRequest,
    #[sea_orm(string_value = "guardianAccepted")]
    GuardianAccepted,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notification")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// The user receiving the notification
    #[sea_orm(indexed)]
    pub recipient_id: String,

    /// The user who triggered the notification
    #[sea_orm(nullable)]
    pub sender_id: Option<String>,

    /// Sender display name (denormalized for rendering)
    #[sea_orm(nullable)]
    pub sender_name: Option<String>,

    pub notification_type: NotificationType,

    /// Human-readable message
    pub message: String,

    /// Deep-link payload (entity references keyed by role)
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub action_data: Option<Json>,

    /// Has this notification been read?
    #[sea_orm(default_value = false)]
    pub is_read: bool,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::RecipientId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Recipient,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::SenderId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Sender,
}

impl ActiveModelBehavior for ActiveModel {}
