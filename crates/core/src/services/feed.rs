//! Feed aggregation.
//!
//! Three read-models built per request and never persisted: the friends
//! feed, the contest feed, and the global feed. All three share the same
//! shape of work: fetch candidate photos, drop the ones the requesting
//! user already voted for, join pet and owner metadata, and annotate
//! contest participation. A photo whose pet or owner no longer resolves is
//! dropped from the feed; the fetch itself never fails over one broken
//! item.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, FixedOffset};
use futures::StreamExt;
use pawgram_common::{AppResult, Clock};
use pawgram_db::{
    entities::{connection, contest_entry, pet, photo, user},
    repositories::{
        ConnectionRepository, ContestEntryRepository, ContestRepository, PetRepository,
        PhotoRepository, UserRepository,
    },
};
use serde::Serialize;

/// Upper bound on photos considered per feed build.
const FEED_LIMIT: u64 = 100;

/// How many pet/owner chains resolve concurrently.
const RESOLVE_CONCURRENCY: usize = 8;

/// An item in a user's friends feed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendsFeedItem {
    pub photo_id: String,
    pub pet_name: String,
    pub pet_profile_photo: Option<String>,
    pub owner_nickname: String,
    pub owner_id: String,
    pub image_url: String,
    pub votes: i32,
    pub posted_at: DateTime<FixedOffset>,
    /// Always `false` by construction: voted photos are excluded up front.
    pub has_voted: bool,
    pub is_contest_photo: bool,
    pub contest_tag: Option<String>,
}

/// An item in a contest feed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContestFeedItem {
    pub photo_id: String,
    pub pet_name: String,
    pub pet_profile_photo: Option<String>,
    pub owner_nickname: String,
    pub owner_id: String,
    pub image_url: String,
    pub votes: i32,
    pub posted_at: DateTime<FixedOffset>,
    pub has_voted: bool,
    pub contest_tag: String,
    /// Secondary ranking signal; unused for now and reported as 0.
    pub score: i32,
}

/// An item in the global feed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalFeedItem {
    pub photo_id: String,
    pub pet_name: String,
    pub pet_profile_photo: Option<String>,
    pub owner_nickname: String,
    pub owner_id: String,
    pub image_url: String,
    pub votes: i32,
    pub posted_at: DateTime<FixedOffset>,
    pub has_voted: bool,
    pub is_from_friend: bool,
    pub is_contest_photo: bool,
    pub contest_tag: Option<String>,
}

/// Feed service for business logic.
#[derive(Clone)]
pub struct FeedService {
    connection_repo: ConnectionRepository,
    photo_repo: PhotoRepository,
    pet_repo: PetRepository,
    user_repo: UserRepository,
    contest_repo: ContestRepository,
    entry_repo: ContestEntryRepository,
    clock: Clock,
}

impl FeedService {
    /// Create a new feed service.
    #[must_use]
    pub const fn new(
        connection_repo: ConnectionRepository,
        photo_repo: PhotoRepository,
        pet_repo: PetRepository,
        user_repo: UserRepository,
        contest_repo: ContestRepository,
        entry_repo: ContestEntryRepository,
        clock: Clock,
    ) -> Self {
        Self {
            connection_repo,
            photo_repo,
            pet_repo,
            user_repo,
            contest_repo,
            entry_repo,
            clock,
        }
    }

    /// Build the friends feed: photos uploaded by the user's approved
    /// connections with `public` or `friends_only` privacy, newest first,
    /// minus the photos in `exclude_voted`.
    pub async fn build_friends_feed(
        &self,
        user_id: &str,
        exclude_voted: &HashSet<String>,
    ) -> AppResult<Vec<FriendsFeedItem>> {
        let friend_ids = self.approved_friend_ids(user_id).await?;
        if friend_ids.is_empty() {
            return Ok(vec![]);
        }

        let uploader_ids: Vec<String> = friend_ids.iter().cloned().collect();
        let photos = self
            .photo_repo
            .find_friend_visible_by_uploaders(&uploader_ids, FEED_LIMIT)
            .await?;

        let photos: Vec<photo::Model> = photos
            .into_iter()
            .filter(|p| !exclude_voted.contains(&p.id))
            .collect();
        if photos.is_empty() {
            return Ok(vec![]);
        }

        let contest_tags = self.current_contest_tags().await?;

        let items: Vec<_> = futures::stream::iter(photos)
            .map(|photo| self.friends_item(photo, &contest_tags))
            .buffered(RESOLVE_CONCURRENCY)
            .collect()
            .await;

        Ok(items.into_iter().flatten().collect())
    }

    async fn friends_item(
        &self,
        photo: photo::Model,
        contest_tags: &HashMap<String, String>,
    ) -> Option<FriendsFeedItem> {
        let (pet, owner) = self.resolve_photo_chain(&photo).await?;
        let contest_tag = contest_tags.get(&photo.id).cloned();
        Some(FriendsFeedItem {
            photo_id: photo.id,
            pet_name: pet.name,
            pet_profile_photo: pet.profile_photo_url,
            owner_nickname: owner.nickname,
            owner_id: owner.id,
            image_url: photo.image_key,
            votes: photo.vote_count,
            posted_at: photo.uploaded_at,
            has_voted: false,
            is_contest_photo: contest_tag.is_some(),
            contest_tag,
        })
    }

    /// Build the feed of a contest's entries, minus the photos in
    /// `exclude_voted`, newest submission first.
    pub async fn build_contest_feed(
        &self,
        _user_id: &str,
        contest_id: &str,
        exclude_voted: &HashSet<String>,
    ) -> AppResult<Vec<ContestFeedItem>> {
        let contest = self.contest_repo.get_by_id(contest_id).await?;
        let entries = self.entry_repo.find_by_contest(&contest.id).await?;

        let entries: Vec<_> = entries
            .into_iter()
            .filter(|e| !exclude_voted.contains(&e.photo_id))
            .collect();
        if entries.is_empty() {
            return Ok(vec![]);
        }

        let items: Vec<_> = futures::stream::iter(entries)
            .map(|entry| self.contest_item(entry, &contest.prompt))
            .buffered(RESOLVE_CONCURRENCY)
            .collect()
            .await;

        Ok(items.into_iter().flatten().collect())
    }

    async fn contest_item(
        &self,
        entry: contest_entry::Model,
        prompt: &str,
    ) -> Option<ContestFeedItem> {
        let photo = match self.photo_repo.find_by_id(&entry.photo_id).await {
            Ok(Some(photo)) => photo,
            Ok(None) => {
                tracing::debug!(entry_id = %entry.id, "Skipping entry with missing photo");
                return None;
            }
            Err(e) => {
                tracing::warn!(entry_id = %entry.id, error = %e, "Skipping entry after photo lookup failure");
                return None;
            }
        };
        let (pet, owner) = self.resolve_photo_chain(&photo).await?;
        Some(ContestFeedItem {
            photo_id: photo.id,
            pet_name: pet.name,
            pet_profile_photo: pet.profile_photo_url,
            owner_nickname: owner.nickname,
            owner_id: owner.id,
            image_url: photo.image_key,
            votes: entry.votes,
            posted_at: photo.uploaded_at,
            has_voted: false,
            contest_tag: prompt.to_string(),
            score: 0,
        })
    }

    /// Build the global feed: every public photo, newest first, minus the
    /// photos in `exclude_voted`, annotated with whether the uploader is a
    /// friend of the requesting user and whether the photo is in the
    /// current contest.
    pub async fn build_global_feed(
        &self,
        user_id: &str,
        exclude_voted: &HashSet<String>,
    ) -> AppResult<Vec<GlobalFeedItem>> {
        let photos = self.photo_repo.find_public(FEED_LIMIT).await?;

        let photos: Vec<photo::Model> = photos
            .into_iter()
            .filter(|p| !exclude_voted.contains(&p.id))
            .collect();
        if photos.is_empty() {
            return Ok(vec![]);
        }

        let friend_ids = self.approved_friend_ids(user_id).await?;
        let contest_tags = self.current_contest_tags().await?;

        let items: Vec<_> = futures::stream::iter(photos)
            .map(|photo| self.global_item(photo, &friend_ids, &contest_tags))
            .buffered(RESOLVE_CONCURRENCY)
            .collect()
            .await;

        Ok(items.into_iter().flatten().collect())
    }

    async fn global_item(
        &self,
        photo: photo::Model,
        friend_ids: &HashSet<String>,
        contest_tags: &HashMap<String, String>,
    ) -> Option<GlobalFeedItem> {
        let (pet, owner) = self.resolve_photo_chain(&photo).await?;
        let contest_tag = contest_tags.get(&photo.id).cloned();
        Some(GlobalFeedItem {
            photo_id: photo.id,
            pet_name: pet.name,
            pet_profile_photo: pet.profile_photo_url,
            owner_nickname: owner.nickname,
            owner_id: owner.id,
            image_url: photo.image_key,
            votes: photo.vote_count,
            posted_at: photo.uploaded_at,
            has_voted: false,
            is_from_friend: friend_ids.contains(&photo.uploaded_by),
            is_contest_photo: contest_tag.is_some(),
            contest_tag,
        })
    }

    /// IDs of users connected to `user_id` through an approved connection.
    async fn approved_friend_ids(&self, user_id: &str) -> AppResult<HashSet<String>> {
        let connections = self.connection_repo.find_approved_for_user(user_id).await?;

        Ok(connections
            .into_iter()
            .map(|c| other_party(&c, user_id))
            .collect())
    }

    /// Map of photo id -> contest prompt for the current contest's entries.
    async fn current_contest_tags(&self) -> AppResult<HashMap<String, String>> {
        let contests = self.contest_repo.find_unexpired(self.clock.now()).await?;
        let Some(contest) = contests.into_iter().next() else {
            return Ok(HashMap::new());
        };

        let entries = self.entry_repo.find_by_contest(&contest.id).await?;

        Ok(entries
            .into_iter()
            .map(|e| (e.photo_id, contest.prompt.clone()))
            .collect())
    }

    /// Resolve a photo's pet and owner. A broken link drops the item.
    async fn resolve_photo_chain(
        &self,
        photo: &photo::Model,
    ) -> Option<(pet::Model, user::Model)> {
        let pet = match self.pet_repo.find_by_id(&photo.pet_id).await {
            Ok(Some(pet)) => pet,
            Ok(None) => {
                tracing::debug!(photo_id = %photo.id, pet_id = %photo.pet_id, "Skipping photo with missing pet");
                return None;
            }
            Err(e) => {
                tracing::warn!(photo_id = %photo.id, error = %e, "Skipping photo after pet lookup failure");
                return None;
            }
        };

        let owner = match self.user_repo.find_by_id(&pet.owner_id).await {
            Ok(Some(owner)) => owner,
            Ok(None) => {
                tracing::debug!(photo_id = %photo.id, owner_id = %pet.owner_id, "Skipping photo with missing owner");
                return None;
            }
            Err(e) => {
                tracing::warn!(photo_id = %photo.id, error = %e, "Skipping photo after owner lookup failure");
                return None;
            }
        };

        Some((pet, owner))
    }
}

/// The other user in a connection, from `user_id`'s point of view.
fn other_party(connection: &connection::Model, user_id: &str) -> String {
    if connection.requester_id == user_id {
        connection.recipient_id.clone()
    } else {
        connection.requester_id.clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use pawgram_db::entities::{connection::RequestStatus, contest, contest_entry};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn fixed_clock() -> Clock {
        Clock::fixed(Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).single().unwrap())
    }

    fn create_test_connection(id: &str, requester: &str, recipient: &str) -> connection::Model {
        connection::Model {
            id: id.to_string(),
            requester_id: requester.to_string(),
            recipient_id: recipient.to_string(),
            status: RequestStatus::Approved,
            created_at: fixed_clock().now().into(),
        }
    }

    fn create_test_photo(id: &str, uploaded_by: &str, privacy: photo::Privacy) -> photo::Model {
        photo::Model {
            id: id.to_string(),
            pet_id: format!("pet_{id}"),
            uploaded_by: uploaded_by.to_string(),
            image_key: format!("photos/{id}.jpg"),
            privacy,
            vote_count: 3,
            uploaded_at: fixed_clock().now().into(),
        }
    }

    fn create_test_pet(id: &str, owner_id: &str, name: &str) -> pet::Model {
        pet::Model {
            id: id.to_string(),
            owner_id: owner_id.to_string(),
            name: name.to_string(),
            species: "cat".to_string(),
            profile_photo_url: Some(format!("pets/{id}.jpg")),
            created_at: fixed_clock().now().into(),
        }
    }

    fn create_test_user(id: &str, nickname: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: nickname.to_lowercase(),
            nickname: nickname.to_string(),
            avatar_url: None,
            token: None,
            created_at: fixed_clock().now().into(),
            updated_at: None,
        }
    }

    fn create_test_contest(id: &str, prompt: &str) -> contest::Model {
        let now = fixed_clock().now();
        contest::Model {
            id: id.to_string(),
            prompt: prompt.to_string(),
            start_date: now.into(),
            end_date: (now + Duration::days(7)).into(),
            is_active: true,
        }
    }

    fn create_test_entry(id: &str, contest_id: &str, photo_id: &str, votes: i32) -> contest_entry::Model {
        contest_entry::Model {
            id: id.to_string(),
            contest_id: contest_id.to_string(),
            photo_id: photo_id.to_string(),
            submitted_at: fixed_clock().now().into(),
            votes,
        }
    }

    fn conn(mock: MockDatabase) -> Arc<sea_orm::DatabaseConnection> {
        Arc::new(mock.into_connection())
    }

    fn empty() -> Arc<sea_orm::DatabaseConnection> {
        conn(MockDatabase::new(DatabaseBackend::Postgres))
    }

    struct Mocks {
        connection_db: Arc<sea_orm::DatabaseConnection>,
        photo_db: Arc<sea_orm::DatabaseConnection>,
        pet_db: Arc<sea_orm::DatabaseConnection>,
        user_db: Arc<sea_orm::DatabaseConnection>,
        contest_db: Arc<sea_orm::DatabaseConnection>,
        entry_db: Arc<sea_orm::DatabaseConnection>,
    }

    impl Mocks {
        fn into_service(self) -> FeedService {
            FeedService::new(
                ConnectionRepository::new(self.connection_db),
                PhotoRepository::new(self.photo_db),
                PetRepository::new(self.pet_db),
                UserRepository::new(self.user_db),
                ContestRepository::new(self.contest_db),
                ContestEntryRepository::new(self.entry_db),
                fixed_clock(),
            )
        }
    }

    #[tokio::test]
    async fn test_friends_feed_includes_friend_photo() {
        let service = Mocks {
            connection_db: conn(
                MockDatabase::new(DatabaseBackend::Postgres)
                    .append_query_results([[create_test_connection("c1", "friend", "me")]]),
            ),
            photo_db: conn(MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[
                create_test_photo("ph1", "friend", photo::Privacy::Public),
            ]])),
            pet_db: conn(
                MockDatabase::new(DatabaseBackend::Postgres)
                    .append_query_results([[create_test_pet("pet_ph1", "friend", "Maple")]]),
            ),
            user_db: conn(
                MockDatabase::new(DatabaseBackend::Postgres)
                    .append_query_results([[create_test_user("friend", "Casey")]]),
            ),
            contest_db: conn(
                MockDatabase::new(DatabaseBackend::Postgres)
                    .append_query_results([Vec::<contest::Model>::new()]),
            ),
            entry_db: empty(),
        }
        .into_service();

        let feed = service
            .build_friends_feed("me", &HashSet::new())
            .await
            .unwrap();

        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].photo_id, "ph1");
        assert_eq!(feed[0].pet_name, "Maple");
        assert_eq!(feed[0].owner_nickname, "Casey");
        assert!(!feed[0].has_voted);
        assert!(!feed[0].is_contest_photo);
    }

    #[tokio::test]
    async fn test_friends_feed_excludes_voted_photo() {
        let service = Mocks {
            connection_db: conn(
                MockDatabase::new(DatabaseBackend::Postgres)
                    .append_query_results([[create_test_connection("c1", "friend", "me")]]),
            ),
            photo_db: conn(MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[
                create_test_photo("ph1", "friend", photo::Privacy::Public),
            ]])),
            pet_db: empty(),
            user_db: empty(),
            contest_db: empty(),
            entry_db: empty(),
        }
        .into_service();

        let excluded: HashSet<String> = ["ph1".to_string()].into_iter().collect();
        let feed = service.build_friends_feed("me", &excluded).await.unwrap();

        assert!(feed.is_empty());
    }

    #[tokio::test]
    async fn test_friends_feed_no_friends_short_circuits() {
        let service = Mocks {
            connection_db: conn(
                MockDatabase::new(DatabaseBackend::Postgres)
                    .append_query_results([Vec::<connection::Model>::new()]),
            ),
            photo_db: empty(),
            pet_db: empty(),
            user_db: empty(),
            contest_db: empty(),
            entry_db: empty(),
        }
        .into_service();

        let feed = service
            .build_friends_feed("me", &HashSet::new())
            .await
            .unwrap();

        assert!(feed.is_empty());
    }

    #[tokio::test]
    async fn test_friends_feed_drops_broken_chain() {
        let service = Mocks {
            connection_db: conn(
                MockDatabase::new(DatabaseBackend::Postgres)
                    .append_query_results([[create_test_connection("c1", "friend", "me")]]),
            ),
            photo_db: conn(MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[
                create_test_photo("ph1", "friend", photo::Privacy::Public),
                create_test_photo("ph2", "friend", photo::Privacy::FriendsOnly),
            ]])),
            // ph1's pet is gone; ph2 resolves.
            pet_db: conn(
                MockDatabase::new(DatabaseBackend::Postgres)
                    .append_query_results([Vec::<pet::Model>::new()])
                    .append_query_results([[create_test_pet("pet_ph2", "friend", "Rex")]]),
            ),
            user_db: conn(
                MockDatabase::new(DatabaseBackend::Postgres)
                    .append_query_results([[create_test_user("friend", "Casey")]]),
            ),
            contest_db: conn(
                MockDatabase::new(DatabaseBackend::Postgres)
                    .append_query_results([Vec::<contest::Model>::new()]),
            ),
            entry_db: empty(),
        }
        .into_service();

        let feed = service
            .build_friends_feed("me", &HashSet::new())
            .await
            .unwrap();

        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].photo_id, "ph2");
    }

    #[tokio::test]
    async fn test_contest_feed_annotates_prompt_and_excludes_voted() {
        let service = Mocks {
            connection_db: empty(),
            photo_db: conn(MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[
                create_test_photo("ph2", "u2", photo::Privacy::Public),
            ]])),
            pet_db: conn(
                MockDatabase::new(DatabaseBackend::Postgres)
                    .append_query_results([[create_test_pet("pet_ph2", "u2", "Rex")]]),
            ),
            user_db: conn(
                MockDatabase::new(DatabaseBackend::Postgres)
                    .append_query_results([[create_test_user("u2", "Jordan")]]),
            ),
            contest_db: conn(
                MockDatabase::new(DatabaseBackend::Postgres)
                    .append_query_results([[create_test_contest("c1", "Snack Time")]]),
            ),
            entry_db: conn(MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[
                create_test_entry("e1", "c1", "ph1", 10),
                create_test_entry("e2", "c1", "ph2", 5),
            ]])),
        }
        .into_service();

        let excluded: HashSet<String> = ["ph1".to_string()].into_iter().collect();
        let feed = service
            .build_contest_feed("me", "c1", &excluded)
            .await
            .unwrap();

        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].photo_id, "ph2");
        assert_eq!(feed[0].contest_tag, "Snack Time");
        assert_eq!(feed[0].votes, 5);
        assert_eq!(feed[0].score, 0);
    }

    #[tokio::test]
    async fn test_global_feed_annotates_friend_and_contest() {
        let service = Mocks {
            connection_db: conn(
                MockDatabase::new(DatabaseBackend::Postgres)
                    .append_query_results([[create_test_connection("c1", "me", "friend")]]),
            ),
            photo_db: conn(MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[
                create_test_photo("ph1", "friend", photo::Privacy::Public),
                create_test_photo("ph2", "stranger", photo::Privacy::Public),
            ]])),
            pet_db: conn(
                MockDatabase::new(DatabaseBackend::Postgres)
                    .append_query_results([[create_test_pet("pet_ph1", "friend", "Maple")]])
                    .append_query_results([[create_test_pet("pet_ph2", "stranger", "Biscuit")]]),
            ),
            user_db: conn(
                MockDatabase::new(DatabaseBackend::Postgres)
                    .append_query_results([[create_test_user("friend", "Casey")]])
                    .append_query_results([[create_test_user("stranger", "Alex")]]),
            ),
            contest_db: conn(
                MockDatabase::new(DatabaseBackend::Postgres)
                    .append_query_results([[create_test_contest("c1", "Snack Time")]]),
            ),
            entry_db: conn(
                MockDatabase::new(DatabaseBackend::Postgres)
                    .append_query_results([[create_test_entry("e1", "c1", "ph1", 10)]]),
            ),
        }
        .into_service();

        let feed = service
            .build_global_feed("me", &HashSet::new())
            .await
            .unwrap();

        assert_eq!(feed.len(), 2);
        assert!(feed[0].is_from_friend);
        assert!(feed[0].is_contest_photo);
        assert_eq!(feed[0].contest_tag.as_deref(), Some("Snack Time"));
        assert!(!feed[1].is_from_friend);
        assert!(!feed[1].is_contest_photo);
    }

    #[tokio::test]
    async fn test_global_feed_exclusion_invariant() {
        let service = Mocks {
            connection_db: conn(
                MockDatabase::new(DatabaseBackend::Postgres)
                    .append_query_results([Vec::<connection::Model>::new()]),
            ),
            photo_db: conn(MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[
                create_test_photo("ph1", "u1", photo::Privacy::Public),
                create_test_photo("ph2", "u2", photo::Privacy::Public),
            ]])),
            pet_db: conn(
                MockDatabase::new(DatabaseBackend::Postgres)
                    .append_query_results([[create_test_pet("pet_ph2", "u2", "Rex")]]),
            ),
            user_db: conn(
                MockDatabase::new(DatabaseBackend::Postgres)
                    .append_query_results([[create_test_user("u2", "Jordan")]]),
            ),
            contest_db: conn(
                MockDatabase::new(DatabaseBackend::Postgres)
                    .append_query_results([Vec::<contest::Model>::new()]),
            ),
            entry_db: empty(),
        }
        .into_service();

        let excluded: HashSet<String> = ["ph1".to_string()].into_iter().collect();
        let feed = service.build_global_feed("me", &excluded).await.unwrap();

        assert_eq!(feed.len(), 1);
        assert!(!excluded.contains(&feed[0].photo_id));
    }
}
