//! Guardianship service (pet co-ownership requests).
//!
//! The same pending -> approved | rejected machine as connections, scoped
//! to a (guardian, pet) pair instead of a user pair. Approval grants the
//! guardian read/maintain rights over the pet; enforcing those rights is
//! the pet module's concern, not this service's.

use crate::services::notification::NotificationService;
use pawgram_common::{AppError, AppResult, Clock, IdGenerator};
use pawgram_db::{
    entities::guardian_request::{self, RequestStatus},
    repositories::{GuardianRequestRepository, PetRepository, UserRepository},
};
use sea_orm::Set;

/// Guardianship service for business logic.
#[derive(Clone)]
pub struct GuardianshipService {
    guardian_repo: GuardianRequestRepository,
    pet_repo: PetRepository,
    user_repo: UserRepository,
    notifications: Option<NotificationService>,
    clock: Clock,
    id_gen: IdGenerator,
}

impl GuardianshipService {
    /// Create a new guardianship service.
    #[must_use]
    pub const fn new(
        guardian_repo: GuardianRequestRepository,
        pet_repo: PetRepository,
        user_repo: UserRepository,
        clock: Clock,
    ) -> Self {
        Self {
            guardian_repo,
            pet_repo,
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

    /// Ask to become a guardian of a pet. The request goes to the pet's
    /// owner; at most one live request may exist per (guardian, pet) pair.
    pub async fn request(
        &self,
        guardian_id: &str,
        pet_id: &str,
    ) -> AppResult<guardian_request::Model> {
        let pet = self.pet_repo.get_by_id(pet_id).await?;

        if pet.owner_id == guardian_id {
            return Err(AppError::BadRequest(
                "Cannot request guardianship of your own pet".to_string(),
            ));
        }

        let guardian = self.user_repo.get_by_id(guardian_id).await?;

        if self
            .guardian_repo
            .find_live_for_guardian_and_pet(guardian_id, pet_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "Guardian request already exists for this pet".to_string(),
            ));
        }

        let model = guardian_request::ActiveModel {
            id: Set(self.id_gen.generate()),
            guardian_id: Set(guardian_id.to_string()),
            owner_id: Set(pet.owner_id.clone()),
            pet_id: Set(pet.id.clone()),
            status: Set(RequestStatus::Pending),
            created_at: Set(self.clock.now().into()),
        };

        let created = self.guardian_repo.create(model).await?;

        if let Some(ref notifications) = self.notifications
            && let Err(e) = notifications
                .notify_guardian_request(&pet.owner_id, &guardian, &created.id, &pet.id, &pet.name)
                .await
        {
            tracing::warn!(error = %e, "Failed to create guardian request notification");
        }

        tracing::debug!(
            request_id = %created.id,
            guardian_id = %guardian_id,
            pet_id = %pet_id,
            "Created guardian request"
        );
        Ok(created)
    }

    /// Approve a pending guardian request. Only the pet's owner may
    /// approve. The new guardian is notified; a notification failure never
    /// fails the approval.
    pub async fn approve(
        &self,
        request_id: &str,
        acting_user_id: &str,
    ) -> AppResult<guardian_request::Model> {
        let existing = self.guardian_repo.get_by_id(request_id).await?;

        if existing.owner_id != acting_user_id {
            return Err(AppError::Forbidden(
                "Only the pet's owner can approve a guardian request".to_string(),
            ));
        }
        if existing.status != RequestStatus::Pending {
            return Err(AppError::InvalidState(format!(
                "Cannot approve a guardian request that is already {:?}",
                existing.status
            )));
        }

        let guardian_id = existing.guardian_id.clone();
        let pet_id = existing.pet_id.clone();
        let mut active: guardian_request::ActiveModel = existing.into();
        active.status = Set(RequestStatus::Approved);
        let approved = self.guardian_repo.update(active).await?;

        if let Some(ref notifications) = self.notifications {
            let owner = self.user_repo.get_by_id(acting_user_id).await;
            let pet = self.pet_repo.find_by_id(&pet_id).await;
            match (owner, pet) {
                (Ok(owner), Ok(Some(pet))) => {
                    if let Err(e) = notifications
                        .notify_guardian_accepted(
                            &guardian_id,
                            &owner,
                            &approved.id,
                            &pet.id,
                            &pet.name,
                        )
                        .await
                    {
                        tracing::warn!(error = %e, "Failed to create guardian accepted notification");
                    }
                }
                _ => {
                    tracing::warn!(request_id = %approved.id, "Skipped guardian accepted notification");
                }
            }
        }

        tracing::debug!(request_id = %approved.id, "Approved guardian request");
        Ok(approved)
    }

    /// Reject a pending guardian request. Terminal; only the pet's owner
    /// may reject.
    pub async fn reject(
        &self,
        request_id: &str,
        acting_user_id: &str,
    ) -> AppResult<guardian_request::Model> {
        let existing = self.guardian_repo.get_by_id(request_id).await?;

        if existing.owner_id != acting_user_id {
            return Err(AppError::Forbidden(
                "Only the pet's owner can reject a guardian request".to_string(),
            ));
        }
        if existing.status != RequestStatus::Pending {
            return Err(AppError::InvalidState(format!(
                "Cannot reject a guardian request that is already {:?}",
                existing.status
            )));
        }

        let mut active: guardian_request::ActiveModel = existing.into();
        active.status = Set(RequestStatus::Rejected);
        let rejected = self.guardian_repo.update(active).await?;

        tracing::debug!(request_id = %rejected.id, "Rejected guardian request");
        Ok(rejected)
    }

    /// All requests sent by a user.
    pub async fn fetch_for_subject(
        &self,
        guardian_id: &str,
    ) -> AppResult<Vec<guardian_request::Model>> {
        self.guardian_repo.find_for_guardian(guardian_id).await
    }

    /// Pending requests awaiting an owner's decision.
    pub async fn fetch_pending_for_recipient(
        &self,
        owner_id: &str,
    ) -> AppResult<Vec<guardian_request::Model>> {
        self.guardian_repo.find_pending_for_owner(owner_id).await
    }

    /// Approved guardianships held by a user.
    pub async fn fetch_approved_for_subject(
        &self,
        guardian_id: &str,
    ) -> AppResult<Vec<guardian_request::Model>> {
        self.guardian_repo
            .find_approved_for_guardian(guardian_id)
            .await
    }
}
