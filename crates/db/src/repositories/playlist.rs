//! Playlist repository.

use std::collections::HashMap;
use std::sync::Arc;

use crate::entities::{Playlist, PlaylistVideo, playlist, playlist_video};
use crate::repositories::query::{PageRequest, Paginated, fetch_page};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter,
    QueryOrder, Set,
};
use vidshare_common::{AppError, AppResult};

/// Playlist repository for database operations.
#[derive(Clone)]
pub struct PlaylistRepository {
    db: Arc<DatabaseConnection>,
}

impl PlaylistRepository {
    /// Create a new playlist repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a playlist by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<playlist::Model>> {
        Playlist::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a playlist by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<playlist::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Playlist does not exist".to_string()))
    }

    /// Create a new playlist.
    pub async fn create(&self, model: playlist::ActiveModel) -> AppResult<playlist::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a playlist.
    pub async fn update(&self, model: playlist::ActiveModel) -> AppResult<playlist::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a playlist and its entries.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Playlist::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Page through a user's playlists, newest first.
    pub async fn find_page_by_owner(
        &self,
        owner_id: &str,
        page: PageRequest,
    ) -> AppResult<Paginated<playlist::Model>> {
        let query = Playlist::find()
            .filter(playlist::Column::OwnerId.eq(owner_id))
            .order_by_desc(playlist::Column::CreatedAt)
            .order_by_desc(playlist::Column::Id);

        fetch_page(self.db.as_ref(), query, page).await
    }

    /// Video IDs of each playlist, in playlist order.
    pub async fn find_video_ids(
        &self,
        playlist_ids: &[String],
    ) -> AppResult<HashMap<String, Vec<String>>> {
        if playlist_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let entries = PlaylistVideo::find()
            .filter(playlist_video::Column::PlaylistId.is_in(playlist_ids.to_vec()))
            .order_by_asc(playlist_video::Column::PlaylistId)
            .order_by_asc(playlist_video::Column::Position)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut grouped: HashMap<String, Vec<String>> = HashMap::new();
        for entry in entries {
            grouped.entry(entry.playlist_id).or_default().push(entry.video_id);
        }
        Ok(grouped)
    }

    /// Append a video to the end of a playlist.
    pub async fn append_video(
        &self,
        id: String,
        playlist_id: &str,
        video_id: &str,
    ) -> AppResult<playlist_video::Model> {
        // Get max position
        let max_position: Option<i32> = PlaylistVideo::find()
            .filter(playlist_video::Column::PlaylistId.eq(playlist_id))
            .order_by(playlist_video::Column::Position, Order::Desc)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .map(|entry| entry.position);

        let entry = playlist_video::ActiveModel {
            id: Set(id),
            playlist_id: Set(playlist_id.to_string()),
            video_id: Set(video_id.to_string()),
            position: Set(max_position.map_or(0, |p| p + 1)),
            created_at: Set(Utc::now().into()),
        };

        entry
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Remove every occurrence of a video from a playlist.
    pub async fn remove_video(&self, playlist_id: &str, video_id: &str) -> AppResult<u64> {
        let result = PlaylistVideo::delete_many()
            .filter(playlist_video::Column::PlaylistId.eq(playlist_id))
            .filter(playlist_video::Column::VideoId.eq(video_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_entry(id: &str, playlist_id: &str, video_id: &str, position: i32) -> playlist_video::Model {
        playlist_video::Model {
            id: id.to_string(),
            playlist_id: playlist_id.to_string(),
            video_id: video_id.to_string(),
            position,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<playlist::Model>::new()])
                .into_connection(),
        );

        let repo = PlaylistRepository::new(db);
        assert_eq!(
            repo.get_by_id("p1").await.unwrap_err().to_string(),
            "Playlist does not exist"
        );
    }

    #[tokio::test]
    async fn test_find_video_ids_groups_in_order() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    create_test_entry("e1", "p1", "v1", 0),
                    create_test_entry("e2", "p1", "v2", 1),
                    create_test_entry("e3", "p1", "v1", 2),
                    create_test_entry("e4", "p2", "v3", 0),
                ]])
                .into_connection(),
        );

        let repo = PlaylistRepository::new(db);
        let ids = repo
            .find_video_ids(&["p1".to_string(), "p2".to_string()])
            .await
            .unwrap();

        assert_eq!(ids["p1"], vec!["v1", "v2", "v1"]);
        assert_eq!(ids["p2"], vec!["v3"]);
    }

    #[tokio::test]
    async fn test_append_video_after_last_position() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_entry("e1", "p1", "v1", 4)]])
                .append_query_results([[create_test_entry("e2", "p1", "v2", 5)]])
                .into_connection(),
        );

        let repo = PlaylistRepository::new(db);
        let entry = repo.append_video("e2".to_string(), "p1", "v2").await.unwrap();
        assert_eq!(entry.position, 5);
    }

    #[tokio::test]
    async fn test_remove_video_counts_rows() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 2,
                }])
                .into_connection(),
        );

        let repo = PlaylistRepository::new(db);
        assert_eq!(repo.remove_video("p1", "v1").await.unwrap(), 2);
    }
}
