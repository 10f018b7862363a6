//! Subscription service.

use chrono::Utc;
use sea_orm::Set;
use serde::Serialize;
use vidshare_common::{AppError, AppResult, IdGenerator, parse_id};
use vidshare_db::entities::subscription;
use vidshare_db::repositories::{
    PageRequest, Paginated, SubscriptionRepository, UserRepository,
};

use super::populate::Populator;
use super::toggle::{Toggled, toggle};
use super::views::{Owner, SubscriptionView};

/// Outcome of a subscription toggle.
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionToggle {
    pub subscribed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription: Option<SubscriptionView>,
}

/// Subscriber entry: the subscriber is populated, the channel stays an ID.
pub type SubscriberEntry = SubscriptionView<Owner, String>;

/// Subscribed-channel entry: the channel is populated, the subscriber stays an ID.
pub type ChannelEntry = SubscriptionView<String, Owner>;

/// Service for managing channel subscriptions.
#[derive(Clone)]
pub struct SubscriptionService {
    subscription_repo: SubscriptionRepository,
    user_repo: UserRepository,
    populator: Populator,
    id_gen: IdGenerator,
}

impl SubscriptionService {
    /// Create a new subscription service.
    #[must_use]
    pub const fn new(
        subscription_repo: SubscriptionRepository,
        user_repo: UserRepository,
        populator: Populator,
    ) -> Self {
        Self {
            subscription_repo,
            user_repo,
            populator,
            id_gen: IdGenerator::new(),
        }
    }

    /// Subscribe to the channel, or unsubscribe if already subscribed.
    pub async fn toggle(&self, actor_id: &str, channel_id: &str) -> AppResult<SubscriptionToggle> {
        let channel_id = parse_id(channel_id, "Channel")?;
        if channel_id == actor_id {
            return Err(AppError::BadRequest(
                "You cannot subscribe to your own channel".to_string(),
            ));
        }

        self.user_repo
            .find_by_id(&channel_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Channel does not exist".to_string()))?;

        let outcome = toggle(
            || self.subscription_repo.delete_by_pair(actor_id, &channel_id),
            || {
                self.subscription_repo
                    .insert(self.new_subscription(actor_id, &channel_id))
            },
        )
        .await?;

        tracing::debug!(
            subscriber_id = %actor_id,
            channel_id = %channel_id,
            subscribed = outcome.is_active(),
            "Subscription toggled"
        );

        Ok(match outcome {
            Toggled::Added(sub) => SubscriptionToggle {
                subscribed: true,
                subscription: Some(sub.into()),
            },
            Toggled::Removed => SubscriptionToggle {
                subscribed: false,
                subscription: None,
            },
        })
    }

    /// Page through a channel's subscribers.
    pub async fn subscribers(
        &self,
        channel_id: &str,
        page: PageRequest,
    ) -> AppResult<Paginated<SubscriberEntry>> {
        let channel_id = parse_id(channel_id, "Channel")?;
        let subs = self
            .subscription_repo
            .find_page_subscribers(&channel_id, page)
            .await?;

        let users = self
            .populator
            .users(subs.docs.iter().map(|s| s.subscriber_id.as_str()))
            .await?;

        Ok(subs.map(|s| {
            let subscriber = users.get(&s.subscriber_id);
            let channel = s.channel_id.clone();
            SubscriptionView::from(s).populated(subscriber, channel)
        }))
    }

    /// Page through the channels a user subscribes to.
    pub async fn subscribed_channels(
        &self,
        subscriber_id: &str,
        page: PageRequest,
    ) -> AppResult<Paginated<ChannelEntry>> {
        let subscriber_id = parse_id(subscriber_id, "Subscriber")?;
        let subs = self
            .subscription_repo
            .find_page_channels(&subscriber_id, page)
            .await?;

        let users = self
            .populator
            .users(subs.docs.iter().map(|s| s.channel_id.as_str()))
            .await?;

        Ok(subs.map(|s| {
            let channel = users.get(&s.channel_id);
            let subscriber = s.subscriber_id.clone();
            SubscriptionView::from(s).populated(subscriber, channel)
        }))
    }

    fn new_subscription(&self, subscriber_id: &str, channel_id: &str) -> subscription::ActiveModel {
        subscription::ActiveModel {
            id: Set(self.id_gen.generate()),
            subscriber_id: Set(subscriber_id.to_string()),
            channel_id: Set(channel_id.to_string()),
            created_at: Set(Utc::now().into()),
        }
    }
}
