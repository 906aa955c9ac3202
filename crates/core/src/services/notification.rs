//! Notification service.
//!
//! The notification sink for cross-cutting events. Creation is
//! fire-and-forget from the caller's point of view: relationship
//! transitions log a warning when a notification fails and carry on.

use pawgram_common::{AppResult, Clock, EntityRef, IdGenerator, RefKind};
use pawgram_db::{
    entities::{
        notification::{self, NotificationType},
        user,
    },
    repositories::NotificationRepository,
};
use sea_orm::Set;
use serde_json::json;

/// Notification service for business logic.
#[derive(Clone)]
pub struct NotificationService {
    notification_repo: NotificationRepository,
    clock: Clock,
    id_gen: IdGenerator,
}

impl NotificationService {
    /// Create a new notification service.
    #[must_use]
    pub const fn new(notification_repo: NotificationRepository, clock: Clock) -> Self {
        Self {
            notification_repo,
            clock,
            id_gen: IdGenerator::new(),
        }
    }

    /// Notify a user that someone sent them a friend request.
    pub async fn notify_connection_request(
        &self,
        recipient_id: &str,
        sender: &user::Model,
        connection_id: &str,
    ) -> AppResult<notification::Model> {
        self.create_internal(
            recipient_id,
            sender,
            NotificationType::ConnectionRequest,
            format!("{} sent you a friend request", sender.nickname),
            json!({
                "connection": EntityRef::new(RefKind::Connection, connection_id),
                "sender": EntityRef::new(RefKind::User, sender.id.clone()),
            }),
        )
        .await
    }

    /// Notify a user that their friend request was accepted.
    pub async fn notify_connection_accepted(
        &self,
        recipient_id: &str,
        sender: &user::Model,
        connection_id: &str,
    ) -> AppResult<notification::Model> {
        self.create_internal(
            recipient_id,
            sender,
            NotificationType::ConnectionAccepted,
            format!("{} accepted your friend request", sender.nickname),
            json!({
                "connection": EntityRef::new(RefKind::Connection, connection_id),
                "sender": EntityRef::new(RefKind::User, sender.id.clone()),
            }),
        )
        .await
    }

    /// Notify a pet's owner that someone asked to become a guardian.
    pub async fn notify_guardian_request(
        &self,
        recipient_id: &str,
        sender: &user::Model,
        request_id: &str,
        pet_id: &str,
        pet_name: &str,
    ) -> AppResult<notification::Model> {
        self.create_internal(
            recipient_id,
            sender,
            NotificationType::GuardianRequest,
            format!("{} wants to help care for {pet_name}", sender.nickname),
            json!({
                "guardianRequest": EntityRef::new(RefKind::GuardianRequest, request_id),
                "pet": EntityRef::new(RefKind::Pet, pet_id),
            }),
        )
        .await
    }

    /// Notify a user that their guardian request was approved.
    pub async fn notify_guardian_accepted(
        &self,
        recipient_id: &str,
        sender: &user::Model,
        request_id: &str,
        pet_id: &str,
        pet_name: &str,
    ) -> AppResult<notification::Model> {
        self.create_internal(
            recipient_id,
            sender,
            NotificationType::GuardianAccepted,
            format!("{} made you a guardian of {pet_name}", sender.nickname),
            json!({
                "guardianRequest": EntityRef::new(RefKind::GuardianRequest, request_id),
                "pet": EntityRef::new(RefKind::Pet, pet_id),
            }),
        )
        .await
    }

    /// Internal helper to create notifications.
    async fn create_internal(
        &self,
        recipient_id: &str,
        sender: &user::Model,
        notification_type: NotificationType,
        message: String,
        action_data: serde_json::Value,
    ) -> AppResult<notification::Model> {
        let model = notification::ActiveModel {
            id: Set(self.id_gen.generate()),
            recipient_id: Set(recipient_id.to_string()),
            sender_id: Set(Some(sender.id.clone())),
            sender_name: Set(Some(sender.nickname.clone())),
            notification_type: Set(notification_type),
            message: Set(message),
            action_data: Set(Some(action_data)),
            is_read: Set(false),
            created_at: Set(self.clock.now().into()),
        };

        self.notification_repo.create(model).await
    }

    /// Get notifications for a user.
    pub async fn get_notifications(
        &self,
        user_id: &str,
        limit: u64,
        until_id: Option<&str>,
        unread_only: bool,
    ) -> AppResult<Vec<notification::Model>> {
        self.notification_repo
            .find_by_recipient(user_id, limit, until_id, unread_only)
            .await
    }

    /// Mark a notification as read.
    pub async fn mark_as_read(&self, user_id: &str, notification_id: &str) -> AppResult<()> {
        // Verify the notification belongs to the user
        let notification = self.notification_repo.find_by_id(notification_id).await?;
        if let Some(n) = notification
            && n.recipient_id == user_id
        {
            self.notification_repo.mark_as_read(notification_id).await?;
        }
        Ok(())
    }

    /// Mark all notifications as read for a user.
    pub async fn mark_all_as_read(&self, user_id: &str) -> AppResult<u64> {
        self.notification_repo.mark_all_as_read(user_id).await
    }

    /// Count unread notifications for a user.
    pub async fn count_unread(&self, user_id: &str) -> AppResult<u64> {
        self.notification_repo.count_unread(user_id).await
    }
}
