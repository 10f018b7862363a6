//! Channel dashboard endpoints.

use axum::{Router, extract::State, routing::get};
use vidshare_common::AppResult;
use vidshare_core::{ChannelStats, PageQuery, VideoView};
use vidshare_db::repositories::Paginated;

use crate::{
    extractors::{AuthUser, ValidQuery},
    middleware::AppState,
    response::ApiResponse,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(channel_stats))
        .route("/videos", get(channel_videos))
}

async fn channel_stats(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<ChannelStats>> {
    let stats = state.dashboard_service.stats(&user.id).await?;
    Ok(ApiResponse::ok(stats, "Channel stats fetched successfully"))
}

async fn channel_videos(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    ValidQuery(page): ValidQuery<PageQuery>,
) -> AppResult<ApiResponse<Paginated<VideoView>>> {
    let videos = state
        .dashboard_service
        .videos(&user.id, state.page(&page))
        .await?;
    Ok(ApiResponse::ok(videos, "Channel videos fetched successfully"))
}
