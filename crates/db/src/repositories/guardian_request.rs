//! Guardian request repository.

use std::sync::Arc;

use crate::entities::{
    guardian_request::{self, RequestStatus},
    GuardianRequest,
};
use pawgram_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

/// Guardian request repository for database operations.
#[derive(Clone)]
pub struct GuardianRequestRepository {
    db: Arc<DatabaseConnection>,
}

impl GuardianRequestRepository {
    /// Create a new guardian request repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a request by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<guardian_request::Model>> {
        GuardianRequest::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a request by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<guardian_request::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Guardian request not found: {id}")))
    }

    /// Create a new request record.
    pub async fn create(
        &self,
        model: guardian_request::ActiveModel,
    ) -> AppResult<guardian_request::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a request record.
    pub async fn update(
        &self,
        model: guardian_request::ActiveModel,
    ) -> AppResult<guardian_request::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the live (pending or approved) request a guardian has for a pet.
    pub async fn find_live_for_guardian_and_pet(
        &self,
        guardian_id: &str,
        pet_id: &str,
    ) -> AppResult<Option<guardian_request::Model>> {
        GuardianRequest::find()
            .filter(guardian_request::Column::GuardianId.eq(guardian_id))
            .filter(guardian_request::Column::PetId.eq(pet_id))
            .filter(
                guardian_request::Column::Status
                    .is_in([RequestStatus::Pending, RequestStatus::Approved]),
            )
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All requests sent by a guardian, newest first.
    pub async fn find_for_guardian(
        &self,
        guardian_id: &str,
    ) -> AppResult<Vec<guardian_request::Model>> {
        GuardianRequest::find()
            .filter(guardian_request::Column::GuardianId.eq(guardian_id))
            .order_by_desc(guardian_request::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Pending requests awaiting an owner's decision, newest first.
    pub async fn find_pending_for_owner(
        &self,
        owner_id: &str,
    ) -> AppResult<Vec<guardian_request::Model>> {
        GuardianRequest::find()
            .filter(guardian_request::Column::OwnerId.eq(owner_id))
            .filter(guardian_request::Column::Status.eq(RequestStatus::Pending))
            .order_by_desc(guardian_request::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Approved guardianships held by a user.
    pub async fn find_approved_for_guardian(
        &self,
        guardian_id: &str,
    ) -> AppResult<Vec<guardian_request::Model>> {
        GuardianRequest::find()
            .filter(guardian_request::Column::GuardianId.eq(guardian_id))
            .filter(guardian_request::Column::Status.eq(RequestStatus::Approved))
            .order_by_desc(guardian_request::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
