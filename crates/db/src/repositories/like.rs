//! Like repository.

use std::sync::Arc;

use crate::conflict_or_db;
use crate::entities::like::LikeTargetType;
use crate::entities::{Like, Video, like, video};
use crate::repositories::query::{PageRequest, Paginated, fetch_page};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, QueryTrait,
};
use vidshare_common::{AppError, AppResult};

/// The thing a like points at.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LikeTarget {
    Video(String),
    Comment(String),
    Tweet(String),
}

impl LikeTarget {
    /// Stored discriminator.
    #[must_use]
    pub const fn kind(&self) -> LikeTargetType {
        match self {
            Self::Video(_) => LikeTargetType::Video,
            Self::Comment(_) => LikeTargetType::Comment,
            Self::Tweet(_) => LikeTargetType::Tweet,
        }
    }

    /// ID of the liked row.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Video(id) | Self::Comment(id) | Self::Tweet(id) => id,
        }
    }
}

/// Likes of one kind whose target ID matches `id`.
pub(crate) fn likes_on<V>(kind: LikeTargetType, id: V) -> Condition
where
    V: Into<sea_orm::Value>,
{
    Condition::all()
        .add(like::Column::TargetType.eq(kind))
        .add(like::Column::TargetId.eq(id))
}

/// Delete the likes matching `targets`, on whatever connection or transaction
/// the owning row is being deleted with.
pub(crate) async fn delete_likes<C>(conn: &C, targets: Condition) -> Result<u64, DbErr>
where
    C: ConnectionTrait,
{
    let result = Like::delete_many().filter(targets).exec(conn).await?;
    Ok(result.rows_affected)
}

/// Like repository for database operations.
#[derive(Clone)]
pub struct LikeRepository {
    db: Arc<DatabaseConnection>,
}

impl LikeRepository {
    /// Create a new like repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Insert a like. An existing like for the same user and target is a conflict.
    pub async fn insert(&self, model: like::ActiveModel) -> AppResult<like::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| conflict_or_db(e, "Already liked"))
    }

    /// Delete the like `user_id` left on `target` in a single statement.
    ///
    /// Returns whether a row was removed.
    pub async fn delete_link(&self, user_id: &str, target: &LikeTarget) -> AppResult<bool> {
        let result = Like::delete_many()
            .filter(like::Column::LikedById.eq(user_id))
            .filter(like::Column::TargetType.eq(target.kind()))
            .filter(like::Column::TargetId.eq(target.id()))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }

    /// Count likes on all videos owned by `owner_id`.
    pub async fn count_video_likes_for_owner(&self, owner_id: &str) -> AppResult<u64> {
        let owned_videos = Video::find()
            .select_only()
            .column(video::Column::Id)
            .filter(video::Column::OwnerId.eq(owner_id))
            .into_query();

        Like::find()
            .filter(like::Column::TargetType.eq(LikeTargetType::Video))
            .filter(like::Column::TargetId.in_subquery(owned_videos))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Page through the video likes of a user, most recent first.
    ///
    /// Likes on drafts of other channels are skipped.
    pub async fn find_page_video_likes(
        &self,
        user_id: &str,
        page: PageRequest,
    ) -> AppResult<Paginated<like::Model>> {
        let visible_videos = Video::find()
            .select_only()
            .column(video::Column::Id)
            .filter(
                Condition::any()
                    .add(video::Column::IsPublished.eq(true))
                    .add(video::Column::OwnerId.eq(user_id)),
            )
            .into_query();

        let query = Like::find()
            .filter(like::Column::LikedById.eq(user_id))
            .filter(like::Column::TargetType.eq(LikeTargetType::Video))
            .filter(like::Column::TargetId.in_subquery(visible_videos))
            .order_by_desc(like::Column::CreatedAt)
            .order_by_desc(like::Column::Id);

        fetch_page(self.db.as_ref(), query, page).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};
    use std::collections::BTreeMap;

    fn create_test_like(id: &str, target: &LikeTarget, user_id: &str) -> like::Model {
        like::Model {
            id: id.to_string(),
            target_type: target.kind(),
            target_id: target.id().to_string(),
            liked_by_id: user_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[test]
    fn test_like_target_parts() {
        let target = LikeTarget::Comment("c1".to_string());
        assert_eq!(target.kind(), LikeTargetType::Comment);
        assert_eq!(target.id(), "c1");
    }

    #[tokio::test]
    async fn test_insert_returns_model() {
        let target = LikeTarget::Video("v1".to_string());
        let model = create_test_like("l1", &target, "u1");
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[model.clone()]])
                .into_connection(),
        );

        let repo = LikeRepository::new(db);
        let active: like::ActiveModel = model.clone().into();
        let inserted = repo.insert(active.reset_all()).await.unwrap();
        assert_eq!(inserted, model);
        assert_eq!(inserted.target_type, LikeTargetType::Video);
    }

    #[tokio::test]
    async fn test_delete_link_reports_removal() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 0,
                    },
                ])
                .into_connection(),
        );

        let repo = LikeRepository::new(db);
        let target = LikeTarget::Tweet("t1".to_string());
        assert!(repo.delete_link("u1", &target).await.unwrap());
        assert!(!repo.delete_link("u1", &target).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_likes_reports_rows() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 4,
            }])
            .into_connection();

        let removed = delete_likes(&db, likes_on(LikeTargetType::Comment, "c1"))
            .await
            .unwrap();
        assert_eq!(removed, 4);
    }

    #[tokio::test]
    async fn test_count_video_likes_for_owner() {
        let count = BTreeMap::from([("num_items".to_string(), Value::BigInt(Some(7)))]);
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[count]])
                .into_connection(),
        );

        let repo = LikeRepository::new(db);
        assert_eq!(repo.count_video_likes_for_owner("u1").await.unwrap(), 7);
    }
}
