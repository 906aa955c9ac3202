//! Leaderboard ranking over contest entries.

use futures::StreamExt;
use pawgram_common::{AppResult, Clock};
use pawgram_db::{
    entities::contest_entry,
    repositories::{ContestEntryRepository, ContestRepository, PetRepository, PhotoRepository, UserRepository},
};
use serde::Serialize;

/// Prompt reported when no contest is active.
pub const NO_ACTIVE_CONTEST: &str = "No Active Contest";

/// How many reference chains resolve concurrently.
const RESOLVE_CONCURRENCY: usize = 8;

/// One ranked leaderboard row.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    /// 1-based rank in the final, post-filter list.
    pub rank: u32,
    pub pet_name: String,
    pub owner_nickname: String,
    pub owner_id: String,
    pub image_url: String,
    pub votes: i32,
}

/// A computed leaderboard for the current contest.
///
/// `contest_id` is empty when no contest is active; callers must treat that
/// as "no contest", not as an error.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Leaderboard {
    pub contest_id: String,
    pub contest_prompt: String,
    pub leaderboard: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    fn no_active_contest() -> Self {
        Self {
            contest_id: String::new(),
            contest_prompt: NO_ACTIVE_CONTEST.to_string(),
            leaderboard: Vec::new(),
        }
    }
}

/// Leaderboard service for business logic.
#[derive(Clone)]
pub struct LeaderboardService {
    contest_repo: ContestRepository,
    entry_repo: ContestEntryRepository,
    photo_repo: PhotoRepository,
    pet_repo: PetRepository,
    user_repo: UserRepository,
    clock: Clock,
}

impl LeaderboardService {
    /// Create a new leaderboard service.
    #[must_use]
    pub const fn new(
        contest_repo: ContestRepository,
        entry_repo: ContestEntryRepository,
        photo_repo: PhotoRepository,
        pet_repo: PetRepository,
        user_repo: UserRepository,
        clock: Clock,
    ) -> Self {
        Self {
            contest_repo,
            entry_repo,
            photo_repo,
            pet_repo,
            user_repo,
            clock,
        }
    }

    /// Compute the top-`limit` leaderboard for the current contest.
    ///
    /// Entries are ordered by votes descending (ties broken by earliest
    /// submission). Entries whose photo, pet, or owner no longer exists are
    /// skipped, and ranks are assigned over the surviving list, so the
    /// result may hold fewer than `limit` rows even when more entries
    /// exist.
    pub async fn compute_leaderboard(&self, limit: u64) -> AppResult<Leaderboard> {
        let contests = self.contest_repo.find_unexpired(self.clock.now()).await?;
        let Some(contest) = contests.into_iter().next() else {
            return Ok(Leaderboard::no_active_contest());
        };

        let entries = self
            .entry_repo
            .find_top_by_contest(&contest.id, limit)
            .await?;

        let resolved: Vec<_> = futures::stream::iter(entries)
            .map(|entry| self.resolve_entry(entry))
            .buffered(RESOLVE_CONCURRENCY)
            .collect()
            .await;

        let leaderboard = resolved
            .into_iter()
            .flatten()
            .enumerate()
            .map(|(i, mut row)| {
                row.rank = u32::try_from(i).unwrap_or(u32::MAX).saturating_add(1);
                row
            })
            .collect();

        Ok(Leaderboard {
            contest_id: contest.id,
            contest_prompt: contest.prompt,
            leaderboard,
        })
    }

    /// The composition older clients consume: current contest plus its top
    /// ten entries.
    pub async fn legacy_leaderboard_response(&self) -> AppResult<Leaderboard> {
        self.compute_leaderboard(10).await
    }

    /// Resolve an entry's photo -> pet -> owner chain. A broken link drops
    /// the entry (returns `None`) instead of failing the whole leaderboard.
    async fn resolve_entry(&self, entry: contest_entry::Model) -> Option<LeaderboardEntry> {
        let photo = match self.photo_repo.find_by_id(&entry.photo_id).await {
            Ok(Some(photo)) => photo,
            Ok(None) => {
                tracing::debug!(entry_id = %entry.id, photo_id = %entry.photo_id, "Skipping entry with missing photo");
                return None;
            }
            Err(e) => {
                tracing::warn!(entry_id = %entry.id, error = %e, "Skipping entry after photo lookup failure");
                return None;
            }
        };

        let pet = match self.pet_repo.find_by_id(&photo.pet_id).await {
            Ok(Some(pet)) => pet,
            Ok(None) => {
                tracing::debug!(entry_id = %entry.id, pet_id = %photo.pet_id, "Skipping entry with missing pet");
                return None;
            }
            Err(e) => {
                tracing::warn!(entry_id = %entry.id, error = %e, "Skipping entry after pet lookup failure");
                return None;
            }
        };

        let owner = match self.user_repo.find_by_id(&pet.owner_id).await {
            Ok(Some(owner)) => owner,
            Ok(None) => {
                tracing::debug!(entry_id = %entry.id, owner_id = %pet.owner_id, "Skipping entry with missing owner");
                return None;
            }
            Err(e) => {
                tracing::warn!(entry_id = %entry.id, error = %e, "Skipping entry after owner lookup failure");
                return None;
            }
        };

        Some(LeaderboardEntry {
            rank: 0, // assigned after the surviving entries are known
            pet_name: pet.name,
            owner_nickname: owner.nickname,
            owner_id: owner.id,
            image_url: photo.image_key,
            votes: entry.votes,
        })
    }
}
