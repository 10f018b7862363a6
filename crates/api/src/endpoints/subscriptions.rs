//! Subscription endpoints.

use axum::{
    Router,
    extract::{Path, State},
    routing::get,
};
use vidshare_common::AppResult;
use vidshare_core::{ChannelEntry, PageQuery, SubscriberEntry, SubscriptionToggle};
use vidshare_db::repositories::Paginated;

use crate::{
    extractors::{AuthUser, ValidQuery},
    middleware::AppState,
    response::ApiResponse,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/c/{channel_id}",
            get(channel_subscribers).post(toggle_subscription),
        )
        .route("/u/{subscriber_id}", get(subscribed_channels))
}

async fn toggle_subscription(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
) -> AppResult<ApiResponse<SubscriptionToggle>> {
    let outcome = state
        .subscription_service
        .toggle(&user.id, &channel_id)
        .await?;
    let message = if outcome.subscribed {
        "Subscribed successfully"
    } else {
        "Unsubscribed successfully"
    };
    Ok(ApiResponse::ok(outcome, message))
}

async fn channel_subscribers(
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
    ValidQuery(page): ValidQuery<PageQuery>,
) -> AppResult<ApiResponse<Paginated<SubscriberEntry>>> {
    let subscribers = state
        .subscription_service
        .subscribers(&channel_id, state.page(&page))
        .await?;
    Ok(ApiResponse::ok(subscribers, "Subscribers fetched successfully"))
}

async fn subscribed_channels(
    State(state): State<AppState>,
    Path(subscriber_id): Path<String>,
    ValidQuery(page): ValidQuery<PageQuery>,
) -> AppResult<ApiResponse<Paginated<ChannelEntry>>> {
    let channels = state
        .subscription_service
        .subscribed_channels(&subscriber_id, state.page(&page))
        .await?;
    Ok(ApiResponse::ok(channels, "Subscribed channels fetched successfully"))
}
