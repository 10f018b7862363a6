//! API middleware and shared state.

#![allow(missing_docs)]

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use sea_orm::DatabaseConnection;
use vidshare_common::StorageService;
use vidshare_common::config::PaginationConfig;
use vidshare_core::{
    CommentService, DashboardService, LikeService, MediaStore, PageQuery, PlaylistService,
    Populator, SubscriptionService, TweetService, UserService, VideoService,
};
use vidshare_db::repositories::{
    CommentRepository, LikeRepository, PageRequest, PlaylistRepository, SubscriptionRepository,
    TweetRepository, UserRepository, VideoRepository, WatchHistoryRepository,
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub video_service: VideoService,
    pub comment_service: CommentService,
    pub like_service: LikeService,
    pub tweet_service: TweetService,
    pub playlist_service: PlaylistService,
    pub subscription_service: SubscriptionService,
    pub dashboard_service: DashboardService,
    pub pagination: PaginationConfig,
}

impl AppState {
    /// Wire every repository and service over one connection pool.
    #[must_use]
    pub fn new(
        db: Arc<DatabaseConnection>,
        storage: StorageService,
        pagination: PaginationConfig,
    ) -> Self {
        let user_repo = UserRepository::new(Arc::clone(&db));
        let video_repo = VideoRepository::new(Arc::clone(&db));
        let comment_repo = CommentRepository::new(Arc::clone(&db));
        let like_repo = LikeRepository::new(Arc::clone(&db));
        let tweet_repo = TweetRepository::new(Arc::clone(&db));
        let playlist_repo = PlaylistRepository::new(Arc::clone(&db));
        let subscription_repo = SubscriptionRepository::new(Arc::clone(&db));
        let history_repo = WatchHistoryRepository::new(db);

        let media = MediaStore::new(storage);
        let populator = Populator::new(user_repo.clone(), video_repo.clone());

        Self {
            user_service: UserService::new(
                user_repo.clone(),
                subscription_repo.clone(),
                history_repo.clone(),
                populator.clone(),
                media.clone(),
            ),
            video_service: VideoService::new(
                video_repo.clone(),
                history_repo,
                populator.clone(),
                media,
            ),
            comment_service: CommentService::new(
                comment_repo.clone(),
                video_repo.clone(),
                populator.clone(),
            ),
            like_service: LikeService::new(
                like_repo.clone(),
                video_repo.clone(),
                comment_repo,
                tweet_repo.clone(),
                populator.clone(),
            ),
            tweet_service: TweetService::new(tweet_repo, user_repo.clone(), populator.clone()),
            playlist_service: PlaylistService::new(
                playlist_repo,
                video_repo.clone(),
                user_repo.clone(),
                populator.clone(),
            ),
            subscription_service: SubscriptionService::new(
                subscription_repo.clone(),
                user_repo,
                populator,
            ),
            dashboard_service: DashboardService::new(video_repo, like_repo, subscription_repo),
            pagination,
        }
    }

    /// Resolve raw `page` / `limit` parameters against the configured defaults.
    #[must_use]
    pub fn page(&self, query: &PageQuery) -> PageRequest {
        query.resolve(&self.pagination)
    }
}

/// Authentication middleware.
///
/// A valid bearer token puts the user into the request extensions; anything
/// else leaves the request anonymous and lets the extractors decide.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get(header::AUTHORIZATION)
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        match state.user_service.authenticate_by_token(token.trim()).await {
            Ok(user) => {
                req.extensions_mut().insert(user);
            }
            Err(e) => tracing::debug!(error = %e, "Rejected bearer token"),
        }
    }

    next.run(req).await
}
