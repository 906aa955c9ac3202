//! Connection repository.

use std::sync::Arc;

use crate::entities::{
    connection::{self, RequestStatus},
    Connection,
};
use pawgram_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder,
};

/// Connection repository for database operations.
#[derive(Clone)]
pub struct ConnectionRepository {
    db: Arc<DatabaseConnection>,
}

impl ConnectionRepository {
    /// Create a new connection repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a connection by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<connection::Model>> {
        Connection::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a connection by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<connection::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Connection not found: {id}")))
    }

    /// Create a new connection record.
    pub async fn create(&self, model: connection::ActiveModel) -> AppResult<connection::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a connection record.
    pub async fn update(&self, model: connection::ActiveModel) -> AppResult<connection::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a connection record.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let connection = self.find_by_id(id).await?;
        if let Some(c) = connection {
            c.delete(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }

    /// Find the live (pending or approved) record for an unordered user
    /// pair, in either direction.
    pub async fn find_live_between(
        &self,
        user_a: &str,
        user_b: &str,
    ) -> AppResult<Option<connection::Model>> {
        Connection::find()
            .filter(
                Condition::any()
                    .add(
                        Condition::all()
                            .add(connection::Column::RequesterId.eq(user_a))
                            .add(connection::Column::RecipientId.eq(user_b)),
                    )
                    .add(
                        Condition::all()
                            .add(connection::Column::RequesterId.eq(user_b))
                            .add(connection::Column::RecipientId.eq(user_a)),
                    ),
            )
            .filter(
                connection::Column::Status
                    .is_in([RequestStatus::Pending, RequestStatus::Approved]),
            )
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All records where the user is either party, newest first.
    pub async fn find_for_user(&self, user_id: &str) -> AppResult<Vec<connection::Model>> {
        Connection::find()
            .filter(
                Condition::any()
                    .add(connection::Column::RequesterId.eq(user_id))
                    .add(connection::Column::RecipientId.eq(user_id)),
            )
            .order_by_desc(connection::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Pending requests awaiting this recipient's decision, newest first.
    pub async fn find_pending_for_recipient(
        &self,
        recipient_id: &str,
    ) -> AppResult<Vec<connection::Model>> {
        Connection::find()
            .filter(connection::Column::RecipientId.eq(recipient_id))
            .filter(connection::Column::Status.eq(RequestStatus::Pending))
            .order_by_desc(connection::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Approved connections where the user is either party.
    pub async fn find_approved_for_user(
        &self,
        user_id: &str,
    ) -> AppResult<Vec<connection::Model>> {
        Connection::find()
            .filter(
                Condition::any()
                    .add(connection::Column::RequesterId.eq(user_id))
                    .add(connection::Column::RecipientId.eq(user_id)),
            )
            .filter(connection::Column::Status.eq(RequestStatus::Approved))
            .order_by_desc(connection::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
