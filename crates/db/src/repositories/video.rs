//! Video repository.

use std::collections::HashMap;
use std::sync::Arc;

use crate::entities::like::{self, LikeTargetType};
use crate::entities::{Comment, Video, comment, video};
use crate::repositories::like::{delete_likes, likes_on};
use crate::repositories::query::{PageRequest, Paginated, SortDirection, fetch_page};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, FromQueryResult,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, QueryTrait, TransactionTrait,
    sea_query::{Expr, Func, LikeExpr},
};
use vidshare_common::{AppError, AppResult};

/// Column a video listing is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VideoSortKey {
    #[default]
    CreatedAt,
    Views,
    Duration,
    Title,
}

impl VideoSortKey {
    /// Parse the `sortBy` query value. Unknown keys sort by creation time.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("views") => Self::Views,
            Some("duration") => Self::Duration,
            Some("title") => Self::Title,
            _ => Self::CreatedAt,
        }
    }

    const fn column(self) -> video::Column {
        match self {
            Self::CreatedAt => video::Column::CreatedAt,
            Self::Views => video::Column::Views,
            Self::Duration => video::Column::Duration,
            Self::Title => video::Column::Title,
        }
    }
}

/// Filters for the public video listing.
#[derive(Debug, Clone, Default)]
pub struct VideoListFilter {
    /// Case-insensitive substring matched against title and description.
    pub query: Option<String>,
    /// Only videos of this channel.
    pub owner_id: Option<String>,
    /// Unpublished videos of this user are included as well.
    pub viewer_id: Option<String>,
    pub sort: VideoSortKey,
    pub direction: SortDirection,
}

#[derive(FromQueryResult)]
struct ViewsTotal {
    total: i64,
}

/// Video repository for database operations.
#[derive(Clone)]
pub struct VideoRepository {
    db: Arc<DatabaseConnection>,
}

impl VideoRepository {
    /// Create a new video repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a video by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<video::Model>> {
        Video::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a video by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<video::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Video does not exist".to_string()))
    }

    /// Find a video `viewer_id` may see. Other users' drafts are reported missing.
    pub async fn get_visible(&self, id: &str, viewer_id: Option<&str>) -> AppResult<video::Model> {
        self.find_by_id(id)
            .await?
            .filter(|v| v.is_visible_to(viewer_id))
            .ok_or_else(|| AppError::NotFound("Video does not exist".to_string()))
    }

    /// Find videos by IDs, keyed by ID.
    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<HashMap<String, video::Model>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let videos = Video::find()
            .filter(video::Column::Id.is_in(ids.to_vec()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(videos.into_iter().map(|v| (v.id.clone(), v)).collect())
    }

    /// Create a new video.
    pub async fn create(&self, model: video::ActiveModel) -> AppResult<video::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a video.
    pub async fn update(&self, model: video::ActiveModel) -> AppResult<video::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a video with its likes and the likes of its comments, in one
    /// transaction. Comments and playlist entries go with the row.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let comment_ids = Comment::find()
            .select_only()
            .column(comment::Column::Id)
            .filter(comment::Column::VideoId.eq(id))
            .into_query();
        let targets = Condition::any()
            .add(likes_on(LikeTargetType::Video, id))
            .add(
                Condition::all()
                    .add(like::Column::TargetType.eq(LikeTargetType::Comment))
                    .add(like::Column::TargetId.in_subquery(comment_ids)),
            );

        let removed = delete_likes(&txn, targets)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Video::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::debug!(video_id = %id, likes = removed, "Deleted video rows");
        Ok(())
    }

    /// Increment the view count atomically (single UPDATE query, no fetch).
    pub async fn increment_views(&self, id: &str) -> AppResult<()> {
        Video::update_many()
            .col_expr(video::Column::Views, Expr::col(video::Column::Views).add(1))
            .filter(video::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Page through videos matching `filter`.
    pub async fn find_page(
        &self,
        filter: &VideoListFilter,
        page: PageRequest,
    ) -> AppResult<Paginated<video::Model>> {
        let mut visibility = Condition::any().add(video::Column::IsPublished.eq(true));
        if let Some(viewer_id) = &filter.viewer_id {
            visibility = visibility.add(video::Column::OwnerId.eq(viewer_id.as_str()));
        }

        let mut query = Video::find().filter(visibility);

        if let Some(owner_id) = &filter.owner_id {
            query = query.filter(video::Column::OwnerId.eq(owner_id.as_str()));
        }

        if let Some(text) = filter.query.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            let pattern = contains_pattern(text);
            query = query.filter(
                Condition::any()
                    .add(
                        Expr::expr(Func::lower(Expr::col(video::Column::Title)))
                            .like(LikeExpr::new(pattern.as_str()).escape('\\')),
                    )
                    .add(
                        Expr::expr(Func::lower(Expr::col(video::Column::Description)))
                            .like(LikeExpr::new(pattern.as_str()).escape('\\')),
                    ),
            );
        }

        let order = filter.direction.order();
        let query = query
            .order_by(filter.sort.column(), order.clone())
            .order_by(video::Column::Id, order);

        fetch_page(self.db.as_ref(), query, page).await
    }

    /// Page through every video of an owner, published or not, newest first.
    pub async fn find_page_by_owner(
        &self,
        owner_id: &str,
        page: PageRequest,
    ) -> AppResult<Paginated<video::Model>> {
        let query = Video::find()
            .filter(video::Column::OwnerId.eq(owner_id))
            .order_by_desc(video::Column::CreatedAt)
            .order_by_desc(video::Column::Id);

        fetch_page(self.db.as_ref(), query, page).await
    }

    /// Count videos of an owner.
    pub async fn count_by_owner(&self, owner_id: &str) -> AppResult<u64> {
        Video::find()
            .filter(video::Column::OwnerId.eq(owner_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Sum of view counts over an owner's videos (0 without videos).
    pub async fn sum_views_by_owner(&self, owner_id: &str) -> AppResult<i64> {
        let result = Video::find()
            .select_only()
            .column_as(Expr::cust("CAST(COALESCE(SUM(\"views\"), 0) AS BIGINT)"), "total")
            .filter(video::Column::OwnerId.eq(owner_id))
            .into_model::<ViewsTotal>()
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.map_or(0, |r| r.total))
    }
}

/// Case-insensitive substring pattern with LIKE wildcards escaped.
fn contains_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.to_lowercase().chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
