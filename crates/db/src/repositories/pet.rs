//! Pet repository.

use std::sync::Arc;

use crate::entities::{pet, Pet};
use pawgram_common::{AppError, AppResult};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

/// Pet repository for database operations.
#[derive(Clone)]
pub struct PetRepository {
    db: Arc<DatabaseConnection>,
}

impl PetRepository {
    /// Create a new pet repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a pet by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<pet::Model>> {
        Pet::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a pet by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<pet::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::PetNotFound(id.to_string()))
    }

    /// Find pets owned by a user.
    pub async fn find_by_owner(&self, owner_id: &str) -> AppResult<Vec<pet::Model>> {
        Pet::find()
            .filter(pet::Column::OwnerId.eq(owner_id))
            .order_by_asc(pet::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
