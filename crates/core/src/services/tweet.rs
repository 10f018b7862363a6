//! Tweet service.

use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;
use vidshare_common::{AppResult, IdGenerator, parse_id};
use vidshare_db::entities::tweet;
use vidshare_db::repositories::{PageRequest, Paginated, TweetRepository, UserRepository};

use super::guard::ensure_owner;
use super::input::required_text;
use super::populate::Populator;
use super::views::{Owner, TweetView};

/// Input for creating or editing a tweet.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct TweetInput {
    #[validate(length(max = 280))]
    pub content: Option<String>,
}

/// Service for managing tweets.
#[derive(Clone)]
pub struct TweetService {
    tweet_repo: TweetRepository,
    user_repo: UserRepository,
    populator: Populator,
    id_gen: IdGenerator,
}

impl TweetService {
    /// Create a new tweet service.
    #[must_use]
    pub const fn new(
        tweet_repo: TweetRepository,
        user_repo: UserRepository,
            populator: Populator,
    ) -> Self {
        Self {
            tweet_repo,
            user_repo,
            populator,
            id_gen: IdGenerator::new(),
        }
    }

    /// Post a tweet.
    pub async fn create(&self, actor_id: &str, input: TweetInput) -> AppResult<TweetView> {
        let content = required_text(input.content.as_deref(), "Content")?;
        input.validate()?;

        let model = tweet::ActiveModel {
            id: Set(self.id_gen.generate()),
            content: Set(content),
            owner_id: Set(actor_id.to_string()),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        Ok(self.tweet_repo.create(model).await?.into())
    }

    /// Page through a user's tweets, newest first.
    pub async fn list_by_user(
        &self,
        user_id: &str,
        page: PageRequest,
    ) -> AppResult<Paginated<TweetView<Owner>>> {
        let user_id = parse_id(user_id, "User")?;
        let user = self.user_repo.get_by_id(&user_id).await?;

        let tweets = self.tweet_repo.find_page_by_owner(&user.id, page).await?;
        let owners = self
            .populator
            .users(tweets.docs.iter().map(|t| t.owner_id.as_str()))
            .await?;

        Ok(tweets.map(|t| {
            let owner = owners.get(&t.owner_id);
            TweetView::from(t).with_owner(owner)
        }))
    }

    /// Edit a tweet's content.
    pub async fn update(
        &self,
        tweet_id: &str,
        actor_id: &str,
        input: TweetInput,
    ) -> AppResult<TweetView> {
        let tweet_id = parse_id(tweet_id, "Tweet")?;
        let content = required_text(input.content.as_deref(), "Content")?;
        input.validate()?;

        let tweet = self.tweet_repo.get_by_id(&tweet_id).await?;
        ensure_owner(
            actor_id,
            &tweet.owner_id,
            "You are not authorized to update this tweet",
        )?;

        let mut active: tweet::ActiveModel = tweet.into();
        active.content = Set(content);
        active.updated_at = Set(Some(Utc::now().into()));

        Ok(self.tweet_repo.update(active).await?.into())
    }

    /// Delete a tweet and its likes.
    pub async fn delete(&self, tweet_id: &str, actor_id: &str) -> AppResult<()> {
        let tweet_id = parse_id(tweet_id, "Tweet")?;
        let tweet = self.tweet_repo.get_by_id(&tweet_id).await?;
        ensure_owner(
            actor_id,
            &tweet.owner_id,
            "You are not authorized to delete this tweet",
        )?;

        self.tweet_repo.delete(&tweet.id).await
    }
}
