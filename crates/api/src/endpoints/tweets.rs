//! Tweet endpoints.

use axum::{
    Router,
    extract::{Path, State},
    routing::{get, patch, post},
};
use vidshare_common::AppResult;
use vidshare_core::{Owner, PageQuery, TweetInput, TweetView};
use vidshare_db::repositories::Paginated;

use crate::{
    extractors::{AuthUser, ValidJson, ValidQuery},
    middleware::AppState,
    response::{ApiResponse, Empty},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_tweet))
        .route("/user/{user_id}", get(user_tweets))
        .route("/{tweet_id}", patch(update_tweet).delete(delete_tweet))
}

async fn create_tweet(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    ValidJson(input): ValidJson<TweetInput>,
) -> AppResult<ApiResponse<TweetView>> {
    let tweet = state.tweet_service.create(&user.id, input).await?;
    Ok(ApiResponse::ok(tweet, "Tweet created successfully"))
}

async fn user_tweets(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    ValidQuery(page): ValidQuery<PageQuery>,
) -> AppResult<ApiResponse<Paginated<TweetView<Owner>>>> {
    let tweets = state
        .tweet_service
        .list_by_user(&user_id, state.page(&page))
        .await?;
    Ok(ApiResponse::ok(tweets, "Tweets fetched successfully"))
}

async fn update_tweet(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(tweet_id): Path<String>,
    ValidJson(input): ValidJson<TweetInput>,
) -> AppResult<ApiResponse<TweetView>> {
    let tweet = state.tweet_service.update(&tweet_id, &user.id, input).await?;
    Ok(ApiResponse::ok(tweet, "Tweet updated successfully"))
}

async fn delete_tweet(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(tweet_id): Path<String>,
) -> AppResult<ApiResponse<Empty>> {
    state.tweet_service.delete(&tweet_id, &user.id).await?;
    Ok(ApiResponse::message("Tweet deleted successfully"))
}
