//! Contest repository.

use std::sync::Arc;

use crate::entities::{contest, Contest};
use chrono::{DateTime, Utc};
use pawgram_common::{AppError, AppResult};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};

/// Contest repository for database operations.
#[derive(Clone)]
pub struct ContestRepository {
    db: Arc<DatabaseConnection>,
}

impl ContestRepository {
    /// Create a new contest repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a contest by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<contest::Model>> {
        Contest::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a contest by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<contest::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::ContestNotFound(id.to_string()))
    }

    /// Create a new contest.
    pub async fn create(&self, model: contest::ActiveModel) -> AppResult<contest::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Contests whose `end_date` is still in the future, earliest start
    /// first. A read-time view: more than one row means concurrent writers
    /// raced the single-active invariant.
    pub async fn find_unexpired(&self, now: DateTime<Utc>) -> AppResult<Vec<contest::Model>> {
        Contest::find()
            .filter(contest::Column::EndDate.gt(now))
            .order_by_asc(contest::Column::StartDate)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// The first active, unexpired contest, if any.
    pub async fn find_active_unexpired(
        &self,
        now: DateTime<Utc>,
    ) -> AppResult<Option<contest::Model>> {
        Contest::find()
            .filter(contest::Column::IsActive.eq(true))
            .filter(contest::Column::EndDate.gt(now))
            .order_by_asc(contest::Column::StartDate)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Return the active unexpired contest, creating `candidate` when there
    /// is none. The check and the insert run in one transaction so two
    /// racing callers on this connection cannot both create a contest.
    pub async fn ensure_active(
        &self,
        candidate: contest::ActiveModel,
        now: DateTime<Utc>,
    ) -> AppResult<(contest::Model, bool)> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let existing = Contest::find()
            .filter(contest::Column::IsActive.eq(true))
            .filter(contest::Column::EndDate.gt(now))
            .order_by_asc(contest::Column::StartDate)
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let (contest, created) = match existing {
            Some(contest) => (contest, false),
            None => {
                let created = candidate
                    .insert(&txn)
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
                (created, true)
            }
        };

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok((contest, created))
    }

    /// Flip `is_active` off on every contest whose `end_date` has elapsed.
    /// Returns the number of contests rotated out.
    pub async fn deactivate_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = Contest::update_many()
            .col_expr(contest::Column::IsActive, Expr::value(false))
            .filter(contest::Column::IsActive.eq(true))
            .filter(contest::Column::EndDate.lte(now))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Manually deactivate a contest (supersession).
    pub async fn deactivate(&self, id: &str) -> AppResult<()> {
        let result = Contest::update_many()
            .col_expr(contest::Column::IsActive, Expr::value(false))
            .filter(contest::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(AppError::ContestNotFound(id.to_string()));
        }
        Ok(())
    }
}
