//! Video endpoints.

use axum::{
    Router,
    extract::{Path, State},
    routing::{get, patch},
};
use vidshare_common::AppResult;
use vidshare_core::{
    PageQuery, PopulatedVideo, PublishVideoInput, UpdateVideoInput, VideoListParams, VideoView,
};
use vidshare_db::repositories::Paginated;

use crate::{
    extractors::{AuthUser, Form, MaybeAuthUser, ValidQuery},
    middleware::AppState,
    response::{ApiResponse, Empty},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_videos).post(publish_video))
        .route(
            "/{video_id}",
            get(get_video).patch(update_video).delete(delete_video),
        )
        .route("/toggle/publish/{video_id}", patch(toggle_publish))
}

async fn list_videos(
    viewer: MaybeAuthUser,
    State(state): State<AppState>,
    ValidQuery(page): ValidQuery<PageQuery>,
    ValidQuery(params): ValidQuery<VideoListParams>,
) -> AppResult<ApiResponse<Paginated<PopulatedVideo>>> {
    let videos = state
        .video_service
        .list(&params, state.page(&page), viewer.id())
        .await?;
    Ok(ApiResponse::ok(videos, "Videos fetched successfully"))
}

async fn publish_video(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    mut form: Form,
) -> AppResult<ApiResponse<VideoView>> {
    let input = PublishVideoInput {
        title: form.text("title"),
        description: form.text("description"),
        duration: form.text("duration").and_then(|d| d.trim().parse().ok()),
        video_file: form.take_file("videoFile"),
        thumbnail: form.take_file("thumbnail"),
    };

    let video = state.video_service.publish(&user.id, input).await?;
    Ok(ApiResponse::ok(video, "Video published successfully"))
}

async fn get_video(
    viewer: MaybeAuthUser,
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> AppResult<ApiResponse<PopulatedVideo>> {
    let video = state.video_service.get(&video_id, viewer.id()).await?;
    Ok(ApiResponse::ok(video, "Video fetched successfully"))
}

async fn update_video(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    mut form: Form,
) -> AppResult<ApiResponse<VideoView>> {
    let input = UpdateVideoInput {
        title: form.text("title"),
        description: form.text("description"),
        thumbnail: form.take_file("thumbnail"),
    };

    let video = state.video_service.update(&video_id, &user.id, input).await?;
    Ok(ApiResponse::ok(video, "Video updated successfully"))
}

async fn delete_video(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> AppResult<ApiResponse<Empty>> {
    state.video_service.delete(&video_id, &user.id).await?;
    Ok(ApiResponse::message("Video deleted successfully"))
}

async fn toggle_publish(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> AppResult<ApiResponse<VideoView>> {
    let video = state.video_service.toggle_publish(&video_id, &user.id).await?;
    Ok(ApiResponse::ok(video, "Publish status toggled successfully"))
}
