//! Like endpoints.

use axum::{
    Router,
    extract::{Path, State},
    routing::{get, post},
};
use vidshare_common::AppResult;
use vidshare_core::{LikeToggle, LikedVideoView, PageQuery};
use vidshare_db::entities::like::LikeTargetType;
use vidshare_db::repositories::Paginated;

use crate::{
    extractors::{AuthUser, ValidQuery},
    middleware::AppState,
    response::ApiResponse,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/toggle/v/{video_id}", post(toggle_video_like))
        .route("/toggle/c/{comment_id}", post(toggle_comment_like))
        .route("/toggle/t/{tweet_id}", post(toggle_tweet_like))
        .route("/videos", get(liked_videos))
}

async fn toggle(
    state: &AppState,
    user_id: &str,
    kind: LikeTargetType,
    target_id: &str,
) -> AppResult<ApiResponse<LikeToggle>> {
    let outcome = state.like_service.toggle(user_id, kind, target_id).await?;
    let message = if outcome.liked {
        "Liked successfully"
    } else {
        "Unliked successfully"
    };
    Ok(ApiResponse::ok(outcome, message))
}

async fn toggle_video_like(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> AppResult<ApiResponse<LikeToggle>> {
    toggle(&state, &user.id, LikeTargetType::Video, &video_id).await
}

async fn toggle_comment_like(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
) -> AppResult<ApiResponse<LikeToggle>> {
    toggle(&state, &user.id, LikeTargetType::Comment, &comment_id).await
}

async fn toggle_tweet_like(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(tweet_id): Path<String>,
) -> AppResult<ApiResponse<LikeToggle>> {
    toggle(&state, &user.id, LikeTargetType::Tweet, &tweet_id).await
}

async fn liked_videos(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    ValidQuery(page): ValidQuery<PageQuery>,
) -> AppResult<ApiResponse<Paginated<LikedVideoView>>> {
    let videos = state
        .like_service
        .liked_videos(&user.id, state.page(&page))
        .await?;
    Ok(ApiResponse::ok(videos, "Liked videos fetched successfully"))
}
