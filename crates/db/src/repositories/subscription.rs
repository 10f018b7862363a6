//! Subscription repository.

use std::sync::Arc;

use crate::conflict_or_db;
use crate::entities::{Subscription, subscription};
use crate::repositories::query::{PageRequest, Paginated, fetch_page};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};
use vidshare_common::{AppError, AppResult};

/// Subscription repository for database operations.
#[derive(Clone)]
pub struct SubscriptionRepository {
    db: Arc<DatabaseConnection>,
}

impl SubscriptionRepository {
    /// Create a new subscription repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a subscription by subscriber and channel.
    pub async fn find_by_pair(
        &self,
        subscriber_id: &str,
        channel_id: &str,
    ) -> AppResult<Option<subscription::Model>> {
        Subscription::find()
            .filter(subscription::Column::SubscriberId.eq(subscriber_id))
            .filter(subscription::Column::ChannelId.eq(channel_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check if a user is subscribed to a channel.
    pub async fn is_subscribed(&self, subscriber_id: &str, channel_id: &str) -> AppResult<bool> {
        Ok(self.find_by_pair(subscriber_id, channel_id).await?.is_some())
    }

    /// Insert a subscription. An existing pair is a conflict.
    pub async fn insert(
        &self,
        model: subscription::ActiveModel,
    ) -> AppResult<subscription::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| conflict_or_db(e, "Already subscribed"))
    }

    /// Delete a subscription by pair in a single statement.
    ///
    /// Returns whether a row was removed.
    pub async fn delete_by_pair(&self, subscriber_id: &str, channel_id: &str) -> AppResult<bool> {
        let result = Subscription::delete_many()
            .filter(subscription::Column::SubscriberId.eq(subscriber_id))
            .filter(subscription::Column::ChannelId.eq(channel_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }

    /// Count subscribers of a channel.
    pub async fn count_subscribers(&self, channel_id: &str) -> AppResult<u64> {
        Subscription::find()
            .filter(subscription::Column::ChannelId.eq(channel_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count channels a user is subscribed to.
    pub async fn count_subscribed_to(&self, subscriber_id: &str) -> AppResult<u64> {
        Subscription::find()
            .filter(subscription::Column::SubscriberId.eq(subscriber_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Page through the subscribers of a channel, most recent first.
    pub async fn find_page_subscribers(
        &self,
        channel_id: &str,
        page: PageRequest,
    ) -> AppResult<Paginated<subscription::Model>> {
        let query = Subscription::find()
            .filter(subscription::Column::ChannelId.eq(channel_id))
            .order_by_desc(subscription::Column::CreatedAt)
            .order_by_desc(subscription::Column::Id);

        fetch_page(self.db.as_ref(), query, page).await
    }

    /// Page through the channels a user is subscribed to, most recent first.
    pub async fn find_page_channels(
        &self,
        subscriber_id: &str,
        page: PageRequest,
    ) -> AppResult<Paginated<subscription::Model>> {
        let query = Subscription::find()
            .filter(subscription::Column::SubscriberId.eq(subscriber_id))
            .order_by_desc(subscription::Column::CreatedAt)
            .order_by_desc(subscription::Column::Id);

        fetch_page(self.db.as_ref(), query, page).await
    }
}
