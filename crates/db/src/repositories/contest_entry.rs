//! Contest entry repository.

use std::sync::Arc;

use crate::entities::{contest_entry, ContestEntry};
use pawgram_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

/// Contest entry repository for database operations.
#[derive(Clone)]
pub struct ContestEntryRepository {
    db: Arc<DatabaseConnection>,
}

impl ContestEntryRepository {
    /// Create a new contest entry repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an entry by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<contest_entry::Model>> {
        ContestEntry::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new entry.
    pub async fn create(
        &self,
        model: contest_entry::ActiveModel,
    ) -> AppResult<contest_entry::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the entry for a (contest, photo) pair.
    pub async fn find_by_contest_and_photo(
        &self,
        contest_id: &str,
        photo_id: &str,
    ) -> AppResult<Option<contest_entry::Model>> {
        ContestEntry::find()
            .filter(contest_entry::Column::ContestId.eq(contest_id))
            .filter(contest_entry::Column::PhotoId.eq(photo_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All entries for a contest, newest submission first.
    pub async fn find_by_contest(
        &self,
        contest_id: &str,
    ) -> AppResult<Vec<contest_entry::Model>> {
        ContestEntry::find()
            .filter(contest_entry::Column::ContestId.eq(contest_id))
            .order_by_desc(contest_entry::Column::SubmittedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Top entries for a contest by vote count.
    ///
    /// Ties break on `submitted_at` ascending (earlier submission ranks
    /// higher), then on id via the ULID ordering of the primary key.
    pub async fn find_top_by_contest(
        &self,
        contest_id: &str,
        limit: u64,
    ) -> AppResult<Vec<contest_entry::Model>> {
        ContestEntry::find()
            .filter(contest_entry::Column::ContestId.eq(contest_id))
            .order_by_desc(contest_entry::Column::Votes)
            .order_by_asc(contest_entry::Column::SubmittedAt)
            .order_by_asc(contest_entry::Column::Id)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_entry(id: &str, contest_id: &str, photo_id: &str, votes: i32) -> contest_entry::Model {
        contest_entry::Model {
            id: id.to_string(),
            contest_id: contest_id.to_string(),
            photo_id: photo_id.to_string(),
            submitted_at: Utc::now().into(),
            votes,
        }
    }

    #[tokio::test]
    async fn test_find_by_contest_and_photo() {
        let entry = create_test_entry("e1", "c1", "ph1", 0);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[entry]])
                .into_connection(),
        );

        let repo = ContestEntryRepository::new(db);
        let result = repo.find_by_contest_and_photo("c1", "ph1").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().id, "e1");
    }

    #[tokio::test]
    async fn test_find_top_by_contest() {
        let e1 = create_test_entry("e1", "c1", "ph1", 30);
        let e2 = create_test_entry("e2", "c1", "ph2", 20);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[e1, e2]])
                .into_connection(),
        );

        let repo = ContestEntryRepository::new(db);
        let result = repo.find_top_by_contest("c1", 10).await.unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].votes, 30);
    }
}
