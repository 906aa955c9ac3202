//! Vote service (the exactly-once-per-user vote toggle).

use std::collections::HashSet;

use pawgram_common::{AppResult, Clock, IdGenerator};
use pawgram_db::repositories::{
    ContestEntryRepository, ContestRepository, PhotoRepository, VoteRepository,
};

/// Vote service for business logic.
///
/// The only mutation point behind every displayed vote count and
/// `has_voted` flag.
#[derive(Clone)]
pub struct VoteService {
    vote_repo: VoteRepository,
    photo_repo: PhotoRepository,
    contest_repo: ContestRepository,
    entry_repo: ContestEntryRepository,
    clock: Clock,
    id_gen: IdGenerator,
}

impl VoteService {
    /// Create a new vote service.
    #[must_use]
    pub const fn new(
        vote_repo: VoteRepository,
        photo_repo: PhotoRepository,
        contest_repo: ContestRepository,
        entry_repo: ContestEntryRepository,
        clock: Clock,
    ) -> Self {
        Self {
            vote_repo,
            photo_repo,
            contest_repo,
            entry_repo,
            clock,
            id_gen: IdGenerator::new(),
        }
    }

    /// Toggle a user's vote on a photo. Returns the new vote state:
    /// `true` when the vote was recorded, `false` when it was removed.
    ///
    /// Repeated toggles for a fixed (user, photo) pair alternate
    /// deterministically, and the photo's vote counter always matches the
    /// number of distinct users holding a vote for it. When the photo is
    /// entered in the current contest, the entry's counter moves with the
    /// photo's.
    pub async fn toggle_vote(&self, user_id: &str, photo_id: &str) -> AppResult<bool> {
        let photo = self.photo_repo.get_by_id(photo_id).await?;

        // Entry of the current contest this vote also counts toward, if any.
        let current_entry_id = match self
            .contest_repo
            .find_active_unexpired(self.clock.now())
            .await?
        {
            Some(contest) => self
                .entry_repo
                .find_by_contest_and_photo(&contest.id, &photo.id)
                .await?
                .map(|entry| entry.id),
            None => None,
        };

        let voted = self
            .vote_repo
            .toggle(
                &self.id_gen.generate(),
                user_id,
                &photo.id,
                current_entry_id.as_deref(),
                self.clock.now(),
            )
            .await?;

        tracing::debug!(user_id = %user_id, photo_id = %photo_id, voted, "Toggled vote");
        Ok(voted)
    }

    /// Whether a user currently holds a vote on a photo.
    pub async fn has_voted(&self, user_id: &str, photo_id: &str) -> AppResult<bool> {
        self.vote_repo.has_voted(user_id, photo_id).await
    }

    /// IDs of every photo the user has voted for. Feed builders pass this
    /// as their exclusion set.
    pub async fn voted_photo_ids(&self, user_id: &str) -> AppResult<HashSet<String>> {
        Ok(self
            .vote_repo
            .find_photo_ids_by_user(user_id)
            .await?
            .into_iter()
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pawgram_common::AppError;
    use pawgram_db::entities::{contest, photo, vote};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn fixed_clock() -> Clock {
        Clock::fixed(Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).single().unwrap())
    }

    fn create_test_photo(id: &str) -> photo::Model {
        photo::Model {
            id: id.to_string(),
            pet_id: "pet1".to_string(),
            uploaded_by: "u2".to_string(),
            image_key: format!("photos/{id}.jpg"),
            privacy: photo::Privacy::Public,
            vote_count: 0,
            uploaded_at: fixed_clock().now().into(),
        }
    }

    fn create_test_vote(id: &str, user_id: &str, photo_id: &str) -> vote::Model {
        vote::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            photo_id: photo_id.to_string(),
            contest_entry_id: None,
            created_at: fixed_clock().now().into(),
        }
    }

    fn exec_ok() -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }
    }

    fn conn(mock: MockDatabase) -> Arc<sea_orm::DatabaseConnection> {
        Arc::new(mock.into_connection())
    }

    fn empty() -> Arc<sea_orm::DatabaseConnection> {
        conn(MockDatabase::new(DatabaseBackend::Postgres))
    }

    #[tokio::test]
    async fn test_toggle_missing_photo_surfaces_error() {
        let photo_db = conn(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<photo::Model>::new()]),
        );

        let service = VoteService::new(
            VoteRepository::new(empty()),
            PhotoRepository::new(photo_db),
            ContestRepository::new(empty()),
            ContestEntryRepository::new(empty()),
            fixed_clock(),
        );

        let result = service.toggle_vote("u1", "ghost").await;

        assert!(matches!(result, Err(AppError::PhotoNotFound(_))));
    }

    #[tokio::test]
    async fn test_toggle_alternates_on_then_off() {
        let photo = create_test_photo("ph1");
        let ledger_row = create_test_vote("v1", "u1", "ph1");

        let photo_db = conn(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[photo.clone()]])
                .append_query_results([[photo]]),
        );
        // No active contest either time.
        let contest_db = conn(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<contest::Model>::new()])
                .append_query_results([Vec::<contest::Model>::new()]),
        );
        let vote_db = conn(
            MockDatabase::new(DatabaseBackend::Postgres)
                // First toggle: no row, insert, bump counter.
                .append_query_results([Vec::<vote::Model>::new()])
                .append_query_results([[ledger_row.clone()]])
                .append_exec_results([exec_ok()])
                // Second toggle: row exists, delete, drop counter.
                .append_query_results([[ledger_row]])
                .append_exec_results([exec_ok(), exec_ok()]),
        );

        let service = VoteService::new(
            VoteRepository::new(vote_db),
            PhotoRepository::new(photo_db),
            ContestRepository::new(contest_db),
            ContestEntryRepository::new(empty()),
            fixed_clock(),
        );

        assert!(service.toggle_vote("u1", "ph1").await.unwrap());
        assert!(!service.toggle_vote("u1", "ph1").await.unwrap());
    }

    #[tokio::test]
    async fn test_voted_photo_ids_builds_exclusion_set() {
        let vote_db = conn(MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[
            create_test_vote("v1", "u1", "ph1"),
            create_test_vote("v2", "u1", "ph2"),
        ]]));

        let service = VoteService::new(
            VoteRepository::new(vote_db),
            PhotoRepository::new(empty()),
            ContestRepository::new(empty()),
            ContestEntryRepository::new(empty()),
            fixed_clock(),
        );

        let ids = service.voted_photo_ids("u1").await.unwrap();

        assert_eq!(ids.len(), 2);
        assert!(ids.contains("ph1"));
        assert!(ids.contains("ph2"));
    }
}
