//! Watch history repository.

use std::sync::Arc;

use crate::entities::{Video, WatchHistory, video, watch_history};
use crate::repositories::query::{PageRequest, Paginated, fetch_page};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    QueryTrait,
};
use vidshare_common::{AppError, AppResult};

/// Watch history repository for database operations.
#[derive(Clone)]
pub struct WatchHistoryRepository {
    db: Arc<DatabaseConnection>,
}

impl WatchHistoryRepository {
    /// Create a new watch history repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Record a view. Watching a video again moves it to the top.
    pub async fn record(&self, model: watch_history::ActiveModel) -> AppResult<()> {
        WatchHistory::insert(model)
            .on_conflict(
                OnConflict::columns([
                    watch_history::Column::UserId,
                    watch_history::Column::VideoId,
                ])
                .update_column(watch_history::Column::WatchedAt)
                .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Page through a user's history, most recent first.
    ///
    /// Videos that have since been unpublished by someone else are skipped.
    pub async fn find_page_by_user(
        &self,
        user_id: &str,
        page: PageRequest,
    ) -> AppResult<Paginated<watch_history::Model>> {
        let visible_videos = Video::find()
            .select_only()
            .column(video::Column::Id)
            .filter(
                Condition::any()
                    .add(video::Column::IsPublished.eq(true))
                    .add(video::Column::OwnerId.eq(user_id)),
            )
            .into_query();

        let query = WatchHistory::find()
            .filter(watch_history::Column::UserId.eq(user_id))
            .filter(watch_history::Column::VideoId.in_subquery(visible_videos))
            .order_by_desc(watch_history::Column::WatchedAt)
            .order_by_desc(watch_history::Column::Id);

        fetch_page(self.db.as_ref(), query, page).await
    }
}
