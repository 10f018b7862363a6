//! User account and channel endpoints.

use axum::{
    Router,
    extract::{Path, State},
    routing::{get, patch, post},
};
use vidshare_common::AppResult;
use vidshare_core::{
    AuthSession, ChangePasswordInput, ChannelProfile, LoginInput, PageQuery, ProfileImage,
    ProfileView, RegisterInput, UpdateAccountInput, WatchedVideoView,
};
use vidshare_db::repositories::Paginated;

use crate::{
    extractors::{AuthUser, Form, MaybeAuthUser, ValidJson, ValidQuery},
    middleware::AppState,
    response::{ApiResponse, Empty},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/change-password", post(change_password))
        .route("/current-user", get(current_user))
        .route("/update-account", patch(update_account))
        .route("/avatar", patch(update_avatar))
        .route("/cover-image", patch(update_cover_image))
        .route("/c/{username}", get(channel_profile))
        .route("/history", get(watch_history))
}

async fn register(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<RegisterInput>,
) -> AppResult<ApiResponse<AuthSession>> {
    let session = state.user_service.register(input).await?;
    Ok(ApiResponse::ok(session, "User registered successfully"))
}

async fn login(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<LoginInput>,
) -> AppResult<ApiResponse<AuthSession>> {
    let session = state.user_service.login(input).await?;
    Ok(ApiResponse::ok(session, "User logged in successfully"))
}

async fn logout(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Empty>> {
    state.user_service.logout(&user.id).await?;
    Ok(ApiResponse::message("User logged out"))
}

async fn change_password(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    ValidJson(input): ValidJson<ChangePasswordInput>,
) -> AppResult<ApiResponse<AuthSession>> {
    let session = state.user_service.change_password(&user.id, input).await?;
    Ok(ApiResponse::ok(session, "Password changed successfully"))
}

async fn current_user(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<ProfileView>> {
    let profile = state.user_service.current_user(&user.id).await?;
    Ok(ApiResponse::ok(profile, "Current user fetched successfully"))
}

async fn update_account(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    ValidJson(input): ValidJson<UpdateAccountInput>,
) -> AppResult<ApiResponse<ProfileView>> {
    let profile = state.user_service.update_account(&user.id, input).await?;
    Ok(ApiResponse::ok(profile, "Account details updated successfully"))
}

async fn update_avatar(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    mut form: Form,
) -> AppResult<ApiResponse<ProfileView>> {
    let profile = state
        .user_service
        .update_image(&user.id, ProfileImage::Avatar, form.take_file("avatar"))
        .await?;
    Ok(ApiResponse::ok(profile, "Avatar updated successfully"))
}

async fn update_cover_image(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    mut form: Form,
) -> AppResult<ApiResponse<ProfileView>> {
    let profile = state
        .user_service
        .update_image(&user.id, ProfileImage::CoverImage, form.take_file("coverImage"))
        .await?;
    Ok(ApiResponse::ok(profile, "Cover image updated successfully"))
}

async fn channel_profile(
    viewer: MaybeAuthUser,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<ApiResponse<ChannelProfile>> {
    let channel = state
        .user_service
        .channel_profile(&username, viewer.id())
        .await?;
    Ok(ApiResponse::ok(channel, "Channel fetched successfully"))
}

async fn watch_history(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    ValidQuery(page): ValidQuery<PageQuery>,
) -> AppResult<ApiResponse<Paginated<WatchedVideoView>>> {
    let history = state
        .user_service
        .watch_history(&user.id, state.page(&page))
        .await?;
    Ok(ApiResponse::ok(history, "Watch history fetched successfully"))
}
