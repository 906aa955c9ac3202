//! Contest lifecycle service.
//!
//! Owns contest creation, the single-active-contest invariant, rotation of
//! expired contests, and photo submission into contests.

use crate::themes;
use chrono::Duration;
use pawgram_common::{AppError, AppResult, Clock, IdGenerator};
use pawgram_db::{
    entities::{contest, contest_entry},
    repositories::{ContestEntryRepository, ContestRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Input for creating a contest with an explicit prompt.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateContestInput {
    #[validate(length(min = 1, max = 256))]
    pub prompt: String,
    #[validate(range(min = 1))]
    pub duration_days: i64,
}

/// Contest service for business logic.
#[derive(Clone)]
pub struct ContestService {
    contest_repo: ContestRepository,
    entry_repo: ContestEntryRepository,
    clock: Clock,
    default_duration_days: i64,
    id_gen: IdGenerator,
}

impl ContestService {
    /// Create a new contest service.
    #[must_use]
    pub const fn new(
        contest_repo: ContestRepository,
        entry_repo: ContestEntryRepository,
        clock: Clock,
    ) -> Self {
        Self {
            contest_repo,
            entry_repo,
            clock,
            default_duration_days: 7,
            id_gen: IdGenerator::new(),
        }
    }

    /// Set the duration used for automatically created contests.
    pub fn set_default_duration_days(&mut self, days: i64) {
        self.default_duration_days = days;
    }

    /// Create a contest with an explicit prompt.
    ///
    /// Does not check whether another contest is already active; callers
    /// that need the single-active invariant go through
    /// [`ContestService::ensure_active_contest`].
    pub async fn create_contest(&self, input: CreateContestInput) -> AppResult<contest::Model> {
        input.validate()?;

        let contest = self
            .contest_repo
            .create(self.build_candidate(&input.prompt, input.duration_days))
            .await?;

        tracing::info!(contest_id = %contest.id, prompt = %contest.prompt, "Created contest");
        Ok(contest)
    }

    /// Create a contest with a prompt picked from the theme catalog.
    pub async fn create_from_theme(&self, duration_days: i64) -> AppResult<contest::Model> {
        self.create_contest(CreateContestInput {
            prompt: themes::random_theme().to_string(),
            duration_days,
        })
        .await
    }

    /// Return the active, unexpired contest, creating one from the theme
    /// catalog when none exists.
    ///
    /// Idempotent under non-concurrent execution: calling this twice in
    /// sequence creates at most one contest.
    pub async fn ensure_active_contest(&self) -> AppResult<contest::Model> {
        let candidate = self.build_candidate(themes::random_theme(), self.default_duration_days);

        let (contest, created) = self
            .contest_repo
            .ensure_active(candidate, self.clock.now())
            .await?;

        if created {
            tracing::info!(contest_id = %contest.id, prompt = %contest.prompt, "Started new contest");
        }
        Ok(contest)
    }

    /// Deactivate every contest whose end date has elapsed. Returns the
    /// number of contests rotated out; creates no replacement.
    pub async fn rotate_expired_contests(&self) -> AppResult<u64> {
        let rotated = self.contest_repo.deactivate_expired(self.clock.now()).await?;

        if rotated > 0 {
            tracing::info!(rotated, "Rotated expired contests");
        }
        Ok(rotated)
    }

    /// Contests whose end date is still in the future, earliest start
    /// first. More than one element means concurrent writers violated the
    /// single-active invariant; this is a read-time view, not an
    /// enforcement point.
    pub async fn fetch_active_contests(&self) -> AppResult<Vec<contest::Model>> {
        self.contest_repo.find_unexpired(self.clock.now()).await
    }

    /// The current contest, if any.
    pub async fn fetch_current_contest(&self) -> AppResult<Option<contest::Model>> {
        Ok(self.fetch_active_contests().await?.into_iter().next())
    }

    /// Get a contest by ID.
    pub async fn get(&self, contest_id: &str) -> AppResult<contest::Model> {
        self.contest_repo.get_by_id(contest_id).await
    }

    /// Manually deactivate a contest (supersession). A deactivated contest
    /// never becomes active again.
    pub async fn deactivate(&self, contest_id: &str) -> AppResult<()> {
        self.contest_repo.deactivate(contest_id).await?;
        tracing::info!(contest_id = %contest_id, "Deactivated contest");
        Ok(())
    }

    /// Submit a photo into a contest.
    ///
    /// The caller is responsible for having verified the photo is public;
    /// privacy is not re-validated here. One entry per (contest, photo)
    /// pair is enforced.
    pub async fn join_contest(
        &self,
        contest_id: &str,
        photo_id: &str,
    ) -> AppResult<contest_entry::Model> {
        let contest = self.contest_repo.get_by_id(contest_id).await?;

        if self
            .entry_repo
            .find_by_contest_and_photo(&contest.id, photo_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "Photo is already entered in this contest".to_string(),
            ));
        }

        let model = contest_entry::ActiveModel {
            id: Set(self.id_gen.generate()),
            contest_id: Set(contest.id.clone()),
            photo_id: Set(photo_id.to_string()),
            submitted_at: Set(self.clock.now().into()),
            votes: Set(0),
        };

        let entry = self.entry_repo.create(model).await?;

        tracing::debug!(contest_id = %contest.id, photo_id = %photo_id, "Photo joined contest");
        Ok(entry)
    }

    fn build_candidate(&self, prompt: &str, duration_days: i64) -> contest::ActiveModel {
        let now = self.clock.now();
        contest::ActiveModel {
            id: Set(self.id_gen.generate()),
            prompt: Set(prompt.to_string()),
            start_date: Set(now.into()),
            end_date: Set((now + Duration::days(duration_days)).into()),
            is_active: Set(true),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn fixed_clock() -> Clock {
        Clock::fixed(Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).single().unwrap())
    }

    fn create_test_contest(id: &str, prompt: &str, active: bool) -> contest::Model {
        let now = fixed_clock().now();
        contest::Model {
            id: id.to_string(),
            prompt: prompt.to_string(),
            start_date: now.into(),
            end_date: (now + Duration::days(7)).into(),
            is_active: active,
        }
    }

    fn create_test_entry(id: &str, contest_id: &str, photo_id: &str) -> contest_entry::Model {
        contest_entry::Model {
            id: id.to_string(),
            contest_id: contest_id.to_string(),
            photo_id: photo_id.to_string(),
            submitted_at: fixed_clock().now().into(),
            votes: 0,
        }
    }

    fn service_with(
        contest_db: Arc<sea_orm::DatabaseConnection>,
        entry_db: Arc<sea_orm::DatabaseConnection>,
    ) -> ContestService {
        ContestService::new(
            ContestRepository::new(contest_db),
            ContestEntryRepository::new(entry_db),
            fixed_clock(),
        )
    }

    fn empty_db() -> Arc<sea_orm::DatabaseConnection> {
        Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection())
    }

    #[tokio::test]
    async fn test_create_contest_rejects_empty_prompt() {
        let service = service_with(empty_db(), empty_db());

        let result = service
            .create_contest(CreateContestInput {
                prompt: String::new(),
                duration_days: 7,
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_contest_rejects_zero_duration() {
        let service = service_with(empty_db(), empty_db());

        let result = service
            .create_contest(CreateContestInput {
                prompt: "Best Costume".to_string(),
                duration_days: 0,
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_contest() {
        let created = create_test_contest("c1", "Best Costume", true);

        let contest_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[created]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let service = service_with(contest_db, empty_db());
        let contest = service
            .create_contest(CreateContestInput {
                prompt: "Best Costume".to_string(),
                duration_days: 7,
            })
            .await
            .unwrap();

        assert_eq!(contest.prompt, "Best Costume");
        assert!(contest.is_active);
    }

    #[tokio::test]
    async fn test_ensure_active_contest_returns_existing() {
        let existing = create_test_contest("c1", "Muddiest Paws", true);

        let contest_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[existing]])
                .into_connection(),
        );

        let service = service_with(contest_db, empty_db());
        let contest = service.ensure_active_contest().await.unwrap();

        assert_eq!(contest.id, "c1");
    }

    #[tokio::test]
    async fn test_rotate_expired_contests_reports_count() {
        let contest_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let service = service_with(contest_db, empty_db());
        let rotated = service.rotate_expired_contests().await.unwrap();

        assert_eq!(rotated, 1);
    }

    #[tokio::test]
    async fn test_fetch_current_contest_none() {
        let contest_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<contest::Model>::new()])
                .into_connection(),
        );

        let service = service_with(contest_db, empty_db());
        let current = service.fetch_current_contest().await.unwrap();

        assert!(current.is_none());
    }

    #[tokio::test]
    async fn test_fetch_current_contest_takes_earliest() {
        let c1 = create_test_contest("c1", "First", true);
        let c2 = create_test_contest("c2", "Second", true);

        let contest_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[c1, c2]])
                .into_connection(),
        );

        let service = service_with(contest_db, empty_db());
        let current = service.fetch_current_contest().await.unwrap();

        assert_eq!(current.unwrap().id, "c1");
    }

    #[tokio::test]
    async fn test_join_contest_duplicate_entry() {
        let contest = create_test_contest("c1", "Snack Time", true);
        let existing_entry = create_test_entry("e1", "c1", "ph1");

        let contest_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[contest]])
                .into_connection(),
        );
        let entry_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[existing_entry]])
                .into_connection(),
        );

        let service = service_with(contest_db, entry_db);
        let result = service.join_contest("c1", "ph1").await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_join_contest_missing_contest() {
        let contest_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<contest::Model>::new()])
                .into_connection(),
        );

        let service = service_with(contest_db, empty_db());
        let result = service.join_contest("ghost", "ph1").await;

        assert!(matches!(result, Err(AppError::ContestNotFound(_))));
    }

    #[tokio::test]
    async fn test_join_contest_creates_entry_with_zero_votes() {
        let contest = create_test_contest("c1", "Snack Time", true);
        let entry = create_test_entry("e1", "c1", "ph1");

        let contest_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[contest]])
                .into_connection(),
        );
        let entry_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<contest_entry::Model>::new()])
                .append_query_results([[entry]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let service = service_with(contest_db, entry_db);
        let created = service.join_contest("c1", "ph1").await.unwrap();

        assert_eq!(created.votes, 0);
        assert_eq!(created.contest_id, "c1");
    }
}
