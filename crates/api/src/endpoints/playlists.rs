//! Playlist endpoints.

use axum::{
    Router,
    extract::{Path, State},
    routing::{get, patch, post},
};
use vidshare_common::AppResult;
use vidshare_core::{PageQuery, PlaylistInput, PlaylistView, PopulatedPlaylist};
use vidshare_db::repositories::Paginated;

use crate::{
    extractors::{AuthUser, MaybeAuthUser, ValidJson, ValidQuery},
    middleware::AppState,
    response::{ApiResponse, Empty},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_playlist))
        .route("/user/{user_id}", get(user_playlists))
        .route(
            "/{playlist_id}",
            get(get_playlist)
                .patch(update_playlist)
                .delete(delete_playlist),
        )
        .route("/add/{video_id}/{playlist_id}", patch(add_video))
        .route("/remove/{video_id}/{playlist_id}", patch(remove_video))
}

async fn create_playlist(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    ValidJson(input): ValidJson<PlaylistInput>,
) -> AppResult<ApiResponse<PlaylistView>> {
    let playlist = state.playlist_service.create(&user.id, input).await?;
    Ok(ApiResponse::ok(playlist, "Playlist created successfully"))
}

async fn user_playlists(
    viewer: MaybeAuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    ValidQuery(page): ValidQuery<PageQuery>,
) -> AppResult<ApiResponse<Paginated<PopulatedPlaylist>>> {
    let playlists = state
        .playlist_service
        .list_by_user(&user_id, viewer.id(), state.page(&page))
        .await?;
    Ok(ApiResponse::ok(playlists, "Playlists fetched successfully"))
}

async fn get_playlist(
    viewer: MaybeAuthUser,
    State(state): State<AppState>,
    Path(playlist_id): Path<String>,
) -> AppResult<ApiResponse<PopulatedPlaylist>> {
    let playlist = state.playlist_service.get(&playlist_id, viewer.id()).await?;
    Ok(ApiResponse::ok(playlist, "Playlist fetched successfully"))
}

async fn update_playlist(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(playlist_id): Path<String>,
    ValidJson(input): ValidJson<PlaylistInput>,
) -> AppResult<ApiResponse<PopulatedPlaylist>> {
    let playlist = state
        .playlist_service
        .update(&playlist_id, &user.id, input)
        .await?;
    Ok(ApiResponse::ok(playlist, "Playlist updated successfully"))
}

async fn delete_playlist(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(playlist_id): Path<String>,
) -> AppResult<ApiResponse<Empty>> {
    state.playlist_service.delete(&playlist_id, &user.id).await?;
    Ok(ApiResponse::message("Playlist deleted successfully"))
}

async fn add_video(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path((video_id, playlist_id)): Path<(String, String)>,
) -> AppResult<ApiResponse<PopulatedPlaylist>> {
    let playlist = state
        .playlist_service
        .add_video(&video_id, &playlist_id, &user.id)
        .await?;
    Ok(ApiResponse::ok(playlist, "Video added to playlist"))
}

async fn remove_video(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path((video_id, playlist_id)): Path<(String, String)>,
) -> AppResult<ApiResponse<PopulatedPlaylist>> {
    let playlist = state
        .playlist_service
        .remove_video(&video_id, &playlist_id, &user.id)
        .await?;
    Ok(ApiResponse::ok(playlist, "Video removed from playlist"))
}
