//! Vote repository (the exactly-once-per-user vote ledger).

use std::sync::Arc;

use crate::entities::{contest_entry, photo, vote, ContestEntry, Photo, Vote};
use chrono::{DateTime, Utc};
use pawgram_common::{AppError, AppResult};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter, Set,
    TransactionTrait,
};

/// Vote repository for database operations.
///
/// The ledger row and the denormalized counters are only ever touched
/// together, inside [`VoteRepository::toggle`]'s transaction, so the
/// counters cannot diverge from the number of ledger rows.
#[derive(Clone)]
pub struct VoteRepository {
    db: Arc<DatabaseConnection>,
}

impl VoteRepository {
    /// Create a new vote repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a vote by user and photo.
    pub async fn find_by_user_and_photo(
        &self,
        user_id: &str,
        photo_id: &str,
    ) -> AppResult<Option<vote::Model>> {
        Vote::find()
            .filter(vote::Column::UserId.eq(user_id))
            .filter(vote::Column::PhotoId.eq(photo_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check if a user has voted for a photo.
    pub async fn has_voted(&self, user_id: &str, photo_id: &str) -> AppResult<bool> {
        Ok(self
            .find_by_user_and_photo(user_id, photo_id)
            .await?
            .is_some())
    }

    /// IDs of all photos the user has voted for.
    pub async fn find_photo_ids_by_user(&self, user_id: &str) -> AppResult<Vec<String>> {
        let votes = Vote::find()
            .filter(vote::Column::UserId.eq(user_id))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(votes.into_iter().map(|v| v.photo_id).collect())
    }

    /// Toggle a user's vote on a photo.
    ///
    /// With no existing ledger row: inserts one (stamped with
    /// `contest_entry_id` when given), increments the photo's `vote_count`
    /// and the entry's `votes` by exactly 1, and returns `true`. With an
    /// existing row: deletes it, decrements the same counters (floored at
    /// 0, against the entry recorded on the row), and returns `false`.
    /// The whole step runs in one transaction.
    pub async fn toggle(
        &self,
        vote_id: &str,
        user_id: &str,
        photo_id: &str,
        contest_entry_id: Option<&str>,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let existing = Vote::find()
            .filter(vote::Column::UserId.eq(user_id))
            .filter(vote::Column::PhotoId.eq(photo_id))
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let voted = match existing {
            Some(vote) => {
                // Decrement against the entry recorded at vote time, not
                // whatever contest happens to be active now.
                let recorded_entry_id = vote.contest_entry_id.clone();

                vote.delete(&txn)
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;

                Photo::update_many()
                    .col_expr(
                        photo::Column::VoteCount,
                        Expr::cust("GREATEST(vote_count - 1, 0)"),
                    )
                    .filter(photo::Column::Id.eq(photo_id))
                    .exec(&txn)
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;

                if let Some(entry_id) = recorded_entry_id {
                    ContestEntry::update_many()
                        .col_expr(
                            contest_entry::Column::Votes,
                            Expr::cust("GREATEST(votes - 1, 0)"),
                        )
                        .filter(contest_entry::Column::Id.eq(entry_id))
                        .exec(&txn)
                        .await
                        .map_err(|e| AppError::Database(e.to_string()))?;
                }

                false
            }
            None => {
                let model = vote::ActiveModel {
                    id: Set(vote_id.to_string()),
                    user_id: Set(user_id.to_string()),
                    photo_id: Set(photo_id.to_string()),
                    contest_entry_id: Set(contest_entry_id.map(ToString::to_string)),
                    created_at: Set(now.into()),
                };

                model
                    .insert(&txn)
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;

                Photo::update_many()
                    .col_expr(
                        photo::Column::VoteCount,
                        Expr::col(photo::Column::VoteCount).add(1),
                    )
                    .filter(photo::Column::Id.eq(photo_id))
                    .exec(&txn)
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;

                if let Some(entry_id) = contest_entry_id {
                    ContestEntry::update_many()
                        .col_expr(
                            contest_entry::Column::Votes,
                            Expr::col(contest_entry::Column::Votes).add(1),
                        )
                        .filter(contest_entry::Column::Id.eq(entry_id))
                        .exec(&txn)
                        .await
                        .map_err(|e| AppError::Database(e.to_string()))?;
                }

                true
            }
        };

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(voted)
    }
}
