//! Comment endpoints.

use axum::{
    Router,
    extract::{Path, State},
    routing::{get, patch},
};
use vidshare_common::AppResult;
use vidshare_core::{CommentInput, CommentView, PageQuery, PopulatedComment};
use vidshare_db::repositories::Paginated;

use crate::{
    extractors::{AuthUser, MaybeAuthUser, ValidJson, ValidQuery},
    middleware::AppState,
    response::{ApiResponse, Empty},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{video_id}", get(list_comments).post(add_comment))
        .route("/c/{comment_id}", patch(update_comment).delete(delete_comment))
}

async fn list_comments(
    viewer: MaybeAuthUser,
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    ValidQuery(page): ValidQuery<PageQuery>,
) -> AppResult<ApiResponse<Paginated<PopulatedComment>>> {
    let comments = state
        .comment_service
        .list_for_video(&video_id, viewer.id(), state.page(&page))
        .await?;
    Ok(ApiResponse::ok(comments, "Comments fetched successfully"))
}

async fn add_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    ValidJson(input): ValidJson<CommentInput>,
) -> AppResult<ApiResponse<CommentView>> {
    let comment = state.comment_service.add(&video_id, &user.id, input).await?;
    Ok(ApiResponse::ok(comment, "Comment added successfully"))
}

async fn update_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
    ValidJson(input): ValidJson<CommentInput>,
) -> AppResult<ApiResponse<CommentView>> {
    let comment = state
        .comment_service
        .update(&comment_id, &user.id, input)
        .await?;
    Ok(ApiResponse::ok(comment, "Comment updated successfully"))
}

async fn delete_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
) -> AppResult<ApiResponse<Empty>> {
    state.comment_service.delete(&comment_id, &user.id).await?;
    Ok(ApiResponse::message("Comment deleted successfully"))
}
