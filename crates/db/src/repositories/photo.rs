//! Photo repository.

use std::sync::Arc;

use crate::entities::{
    photo::{self, Privacy},
    Photo,
};
use pawgram_common::{AppError, AppResult};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};

/// Photo repository for database operations.
#[derive(Clone)]
pub struct PhotoRepository {
    db: Arc<DatabaseConnection>,
}

impl PhotoRepository {
    /// Create a new photo repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a photo by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<photo::Model>> {
        Photo::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a photo by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<photo::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::PhotoNotFound(id.to_string()))
    }

    /// Photos uploaded by any of the given users, visible to friends
    /// (privacy `public` or `friends_only`), newest first.
    pub async fn find_friend_visible_by_uploaders(
        &self,
        uploader_ids: &[String],
        limit: u64,
    ) -> AppResult<Vec<photo::Model>> {
        if uploader_ids.is_empty() {
            return Ok(vec![]);
        }

        Photo::find()
            .filter(photo::Column::UploadedBy.is_in(uploader_ids.to_vec()))
            .filter(photo::Column::Privacy.is_in([Privacy::Public, Privacy::FriendsOnly]))
            .order_by_desc(photo::Column::UploadedAt)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All public photos, newest first.
    pub async fn find_public(&self, limit: u64) -> AppResult<Vec<photo::Model>> {
        Photo::find()
            .filter(photo::Column::Privacy.eq(Privacy::Public))
            .order_by_desc(photo::Column::UploadedAt)
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

    fn create_test_photo(id: &str, uploaded_by: &str, privacy: Privacy) -> photo::Model {
        photo::Model {
            id: id.to_string(),
            pet_id: "pet1".to_string(),
            uploaded_by: uploaded_by.to_string(),
            image_key: format!("photos/{id}.jpg"),
            privacy,
            vote_count: 0,
            uploaded_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<photo::Model>::new()])
                .into_connection(),
        );

        let repo = PhotoRepository::new(db);
        let result = repo.get_by_id("missing").await;

        match result {
            Err(AppError::PhotoNotFound(id)) => assert_eq!(id, "missing"),
            _ => panic!("Expected PhotoNotFound error"),
        }
    }

    #[tokio::test]
    async fn test_find_friend_visible_empty_uploaders_skips_query() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let repo = PhotoRepository::new(db);
        let result = repo
            .find_friend_visible_by_uploaders(&[], 100)
            .await
            .unwrap();

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_find_public() {
        let p1 = create_test_photo("ph1", "u1", Privacy::Public);
        let p2 = create_test_photo("ph2", "u2", Privacy::Public);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[p1, p2]])
                .into_connection(),
        );

        let repo = PhotoRepository::new(db);
        let result = repo.find_public(50).await.unwrap();

        assert_eq!(result.len(), 2);
    }
}
