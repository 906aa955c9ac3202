//! Connection service (friend requests and friendships).

use crate::services::notification::NotificationService;
use pawgram_common::{AppError, AppResult, Clock, IdGenerator};
use pawgram_db::{
    entities::connection::{self, RequestStatus},
    repositories::{ConnectionRepository, UserRepository},
};
use sea_orm::Set;

/// Connection service for business logic.
///
/// Connections move `pending -> approved | rejected`; an approved
/// connection can later be removed, which deletes the record and returns
/// the pair to "no relationship".
#[derive(Clone)]
pub struct ConnectionService {
    connection_repo: ConnectionRepository,
    user_repo: UserRepository,
    notifications: Option<NotificationService>,
    clock: Clock,
    id_gen: IdGenerator,
}

impl ConnectionService {
    /// Create a new connection service.
    #[must_use]
    pub const fn new(
        connection_repo: ConnectionRepository,
        user_repo: UserRepository,
        clock: Clock,
    ) -> Self {
        Self {
            connection_repo,
            user_repo,
            notifications: None,
            clock,
            id_gen: IdGenerator::new(),
        }
    }

    /// Set the notification service.
    pub fn set_notifications(&mut self, notifications: NotificationService) {
        self.notifications = Some(notifications);
    }

    /// Send a friend request.
    ///
    /// At most one live (pending or approved) connection may exist per
    /// unordered user pair, in either direction. A rejected request does
    /// not block a new one.
    pub async fn request(
        &self,
        requester_id: &str,
        recipient_id: &str,
    ) -> AppResult<connection::Model> {
        if requester_id == recipient_id {
            return Err(AppError::BadRequest(
                "Cannot send a friend request to yourself".to_string(),
            ));
        }

        let requester = self.user_repo.get_by_id(requester_id).await?;
        let _recipient = self.user_repo.get_by_id(recipient_id).await?;

        if let Some(existing) = self
            .connection_repo
            .find_live_between(requester_id, recipient_id)
            .await?
        {
            let message = match existing.status {
                RequestStatus::Approved => "Already connected",
                _ => "Friend request already pending",
            };
            return Err(AppError::Conflict(message.to_string()));
        }

        let model = connection::ActiveModel {
            id: Set(self.id_gen.generate()),
            requester_id: Set(requester_id.to_string()),
            recipient_id: Set(recipient_id.to_string()),
            status: Set(RequestStatus::Pending),
            created_at: Set(self.clock.now().into()),
        };

        let created = self.connection_repo.create(model).await?;

        if let Some(ref notifications) = self.notifications
            && let Err(e) = notifications
                .notify_connection_request(recipient_id, &requester, &created.id)
                .await
        {
            tracing::warn!(error = %e, "Failed to create connection request notification");
        }

        tracing::debug!(
            connection_id = %created.id,
            requester_id = %requester_id,
            recipient_id = %recipient_id,
            "Created friend request"
        );
        Ok(created)
    }

    /// Approve a pending friend request. Only the recipient may approve.
    /// A notification is sent to the original requester; a failure there
    /// never fails the approval.
    pub async fn approve(
        &self,
        connection_id: &str,
        acting_user_id: &str,
    ) -> AppResult<connection::Model> {
        let existing = self.connection_repo.get_by_id(connection_id).await?;

        if existing.recipient_id != acting_user_id {
            return Err(AppError::Forbidden(
                "Only the recipient can approve a friend request".to_string(),
            ));
        }
        if existing.status != RequestStatus::Pending {
            return Err(AppError::InvalidState(format!(
                "Cannot approve a connection that is already {:?}",
                existing.status
            )));
        }

        let requester_id = existing.requester_id.clone();
        let mut active: connection::ActiveModel = existing.into();
        active.status = Set(RequestStatus::Approved);
        let approved = self.connection_repo.update(active).await?;

        if let Some(ref notifications) = self.notifications {
            match self.user_repo.get_by_id(acting_user_id).await {
                Ok(approver) => {
                    if let Err(e) = notifications
                        .notify_connection_accepted(&requester_id, &approver, &approved.id)
                        .await
                    {
                        tracing::warn!(error = %e, "Failed to create connection accepted notification");
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to load approver for notification");
                }
            }
        }

        tracing::debug!(connection_id = %approved.id, "Approved friend request");
        Ok(approved)
    }

    /// Reject a pending friend request. Terminal; only the recipient may
    /// reject.
    pub async fn reject(
        &self,
        connection_id: &str,
        acting_user_id: &str,
    ) -> AppResult<connection::Model> {
        let existing = self.connection_repo.get_by_id(connection_id).await?;

        if existing.recipient_id != acting_user_id {
            return Err(AppError::Forbidden(
                "Only the recipient can reject a friend request".to_string(),
            ));
        }
        if existing.status != RequestStatus::Pending {
            return Err(AppError::InvalidState(format!(
                "Cannot reject a connection that is already {:?}",
                existing.status
            )));
        }

        let mut active: connection::ActiveModel = existing.into();
        active.status = Set(RequestStatus::Rejected);
        let rejected = self.connection_repo.update(active).await?;

        tracing::debug!(connection_id = %rejected.id, "Rejected friend request");
        Ok(rejected)
    }

    /// Remove an approved connection. Either party may remove; the record
    /// is deleted and a later request starts a brand-new pending record.
    pub async fn remove(&self, connection_id: &str, acting_user_id: &str) -> AppResult<()> {
        let existing = self.connection_repo.get_by_id(connection_id).await?;

        if existing.requester_id != acting_user_id && existing.recipient_id != acting_user_id {
            return Err(AppError::Forbidden(
                "Only a member of the connection can remove it".to_string(),
            ));
        }
        if existing.status != RequestStatus::Approved {
            return Err(AppError::InvalidState(
                "Only approved connections can be removed".to_string(),
            ));
        }

        self.connection_repo.delete(&existing.id).await?;

        tracing::debug!(connection_id = %connection_id, "Removed connection");
        Ok(())
    }

    /// All connection records involving a user.
    pub async fn fetch_for_subject(&self, user_id: &str) -> AppResult<Vec<connection::Model>> {
        self.connection_repo.find_for_user(user_id).await
    }

    /// Pending requests awaiting the user's decision.
    pub async fn fetch_pending_for_recipient(
        &self,
        user_id: &str,
    ) -> AppResult<Vec<connection::Model>> {
        self.connection_repo.find_pending_for_recipient(user_id).await
    }

    /// Approved connections involving a user.
    pub async fn fetch_approved_for_subject(
        &self,
        user_id: &str,
    ) -> AppResult<Vec<connection::Model>> {
        self.connection_repo.find_approved_for_user(user_id).await
    }
}
