//! Shared fixture for service tests: every service over one in-memory database.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use vidshare_common::NoOpStorage;
use vidshare_db::entities::like::{self, LikeTargetType};
use vidshare_db::entities::Like;
use vidshare_db::repositories::{
    CommentRepository, LikeRepository, PlaylistRepository, SubscriptionRepository,
    TweetRepository, UserRepository, VideoRepository, WatchHistoryRepository,
};
use vidshare_db::test_utils::TestDatabase;

use super::{
    AuthSession, CommentService, DashboardService, FileUpload, LikeService, MediaStore,
    PlaylistService, Populator, PublishVideoInput, RegisterInput, SubscriptionService,
    TweetService, UserService, VideoService, VideoView,
};

pub struct Fixture {
    pub db: TestDatabase,
    pub users: UserService,
    pub videos: VideoService,
    pub comments: CommentService,
    pub likes: LikeService,
    pub tweets: TweetService,
    pub playlists: PlaylistService,
    pub subscriptions: SubscriptionService,
    pub dashboard: DashboardService,
}

impl Fixture {
    pub async fn new() -> Self {
        let db = TestDatabase::in_memory().await.unwrap();
        let conn = Arc::clone(db.connection());

        let user_repo = UserRepository::new(Arc::clone(&conn));
        let video_repo = VideoRepository::new(Arc::clone(&conn));
        let comment_repo = CommentRepository::new(Arc::clone(&conn));
        let like_repo = LikeRepository::new(Arc::clone(&conn));
        let tweet_repo = TweetRepository::new(Arc::clone(&conn));
        let playlist_repo = PlaylistRepository::new(Arc::clone(&conn));
        let subscription_repo = SubscriptionRepository::new(Arc::clone(&conn));
        let history_repo = WatchHistoryRepository::new(Arc::clone(&conn));

        let media = MediaStore::new(Arc::new(NoOpStorage::new("http://cdn.test".to_string())));
        let populator = Populator::new(user_repo.clone(), video_repo.clone());

        Self {
            users: UserService::new(
                user_repo.clone(),
                subscription_repo.clone(),
                history_repo.clone(),
                populator.clone(),
                media.clone(),
            ),
            videos: VideoService::new(video_repo.clone(), history_repo, populator.clone(), media),
            comments: CommentService::new(
                comment_repo.clone(),
                video_repo.clone(),
                populator.clone(),
            ),
            likes: LikeService::new(
                like_repo.clone(),
                video_repo.clone(),
                comment_repo,
                tweet_repo.clone(),
                populator.clone(),
            ),
            tweets: TweetService::new(tweet_repo, user_repo.clone(), populator.clone()),
            playlists: PlaylistService::new(
                playlist_repo,
                video_repo.clone(),
                user_repo.clone(),
                populator.clone(),
            ),
            subscriptions: SubscriptionService::new(
                subscription_repo.clone(),
                user_repo,
                populator,
            ),
            dashboard: DashboardService::new(video_repo, like_repo, subscription_repo),
            db,
        }
    }

    /// Register a user whose email is the lowercased name at example.com.
    pub async fn register(&self, name: &str) -> AuthSession {
        self.users
            .register(RegisterInput {
                username: Some(name.to_string()),
                email: Some(format!("{}@example.com", name.to_lowercase())),
                full_name: Some(format!("{name} Example")),
                password: Some("password123".to_string()),
            })
            .await
            .unwrap()
    }

    /// Publish a small video owned by `owner_id`.
    pub async fn publish(&self, owner_id: &str, title: &str) -> VideoView {
        self.videos
            .publish(
                owner_id,
                PublishVideoInput {
                    title: Some(title.to_string()),
                    description: Some(format!("About {title}")),
                    duration: Some(12.5),
                    video_file: Some(upload("clip.mp4", "video/mp4")),
                    thumbnail: Some(upload("thumb.png", "image/png")),
                },
            )
            .await
            .unwrap()
    }

    /// Number of likes stored for a target.
    pub async fn like_count(&self, kind: LikeTargetType, target_id: &str) -> u64 {
        Like::find()
            .filter(like::Column::TargetType.eq(kind))
            .filter(like::Column::TargetId.eq(target_id))
            .count(self.db.connection().as_ref())
            .await
            .unwrap()
    }

    /// Publish a video and immediately unpublish it.
    pub async fn draft(&self, owner_id: &str, title: &str) -> VideoView {
        let video = self.publish(owner_id, title).await;
        self.videos.toggle_publish(&video.id, owner_id).await.unwrap()
    }
}

fn upload(file_name: &str, content_type: &str) -> FileUpload {
    FileUpload {
        file_name: file_name.to_string(),
        content_type: content_type.to_string(),
        data: b"bytes".to_vec(),
    }
}
