//! JSON document shapes returned by the services.
//!
//! Every document is generic over its reference fields: the raw form carries
//! the referenced row's ID, the populated form carries the looked-up document
//! (or `null` when the referenced row is gone).

use sea_orm::prelude::DateTimeWithTimeZone;
use serde::Serialize;
use vidshare_db::entities::like::LikeTargetType;
use vidshare_db::entities::{comment, like, playlist, subscription, tweet, user, video};
use vidshare_db::repositories::UserSummary;

/// A populated user reference.
pub type Owner = Option<UserSummary>;

/// A video with its owner populated.
pub type PopulatedVideo = VideoView<Owner>;

/// A user's own profile. Never carries the password hash or token.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub avatar: Option<String>,
    pub cover_image: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl From<user::Model> for ProfileView {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            avatar: user.avatar_url,
            cover_image: user.cover_image_url,
            updated_at: user.updated_at.unwrap_or(user.created_at),
            created_at: user.created_at,
        }
    }
}

/// A channel page: public profile plus subscription counters.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChannelProfile {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub full_name: String,
    pub avatar: Option<String>,
    pub cover_image: Option<String>,
    pub subscribers_count: u64,
    pub channels_subscribed_to_count: u64,
    pub is_subscribed: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VideoView<O = String> {
    #[serde(rename = "_id")]
    pub id: String,
    pub video_file: String,
    pub thumbnail: String,
    pub title: String,
    pub description: String,
    pub duration: f64,
    pub views: i64,
    pub is_published: bool,
    pub owner: O,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl From<video::Model> for VideoView {
    fn from(video: video::Model) -> Self {
        Self {
            id: video.id,
            video_file: video.video_file_url,
            thumbnail: video.thumbnail_url,
            title: video.title,
            description: video.description,
            duration: video.duration,
            views: video.views,
            is_published: video.is_published,
            owner: video.owner_id,
            updated_at: video.updated_at.unwrap_or(video.created_at),
            created_at: video.created_at,
        }
    }
}

impl<O> VideoView<O> {
    /// Replace the owner reference.
    pub fn with_owner<P>(self, owner: P) -> VideoView<P> {
        VideoView {
            id: self.id,
            video_file: self.video_file,
            thumbnail: self.thumbnail,
            title: self.title,
            description: self.description,
            duration: self.duration,
            views: self.views,
            is_published: self.is_published,
            owner,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommentView<O = String, V = String> {
    #[serde(rename = "_id")]
    pub id: String,
    pub content: String,
    pub video: V,
    pub owner: O,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl From<comment::Model> for CommentView {
    fn from(comment: comment::Model) -> Self {
        Self {
            id: comment.id,
            content: comment.content,
            video: comment.video_id,
            owner: comment.owner_id,
            updated_at: comment.updated_at.unwrap_or(comment.created_at),
            created_at: comment.created_at,
        }
    }
}

impl<O, V> CommentView<O, V> {
    /// Replace both references.
    pub fn populated<P, W>(self, owner: P, video: W) -> CommentView<P, W> {
        CommentView {
            id: self.id,
            content: self.content,
            video,
            owner,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TweetView<O = String> {
    #[serde(rename = "_id")]
    pub id: String,
    pub content: String,
    pub owner: O,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl From<tweet::Model> for TweetView {
    fn from(tweet: tweet::Model) -> Self {
        Self {
            id: tweet.id,
            content: tweet.content,
            owner: tweet.owner_id,
            updated_at: tweet.updated_at.unwrap_or(tweet.created_at),
            created_at: tweet.created_at,
        }
    }
}

impl<O> TweetView<O> {
    /// Replace the owner reference.
    pub fn with_owner<P>(self, owner: P) -> TweetView<P> {
        TweetView {
            id: self.id,
            content: self.content,
            owner,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistView<O = String, V = String> {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub videos: Vec<V>,
    pub owner: O,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl PlaylistView {
    /// Raw playlist document with its video IDs in order.
    #[must_use]
    pub fn new(playlist: playlist::Model, video_ids: Vec<String>) -> Self {
        Self {
            id: playlist.id,
            name: playlist.name,
            description: playlist.description,
            videos: video_ids,
            owner: playlist.owner_id,
            updated_at: playlist.updated_at.unwrap_or(playlist.created_at),
            created_at: playlist.created_at,
        }
    }
}

impl<O, V> PlaylistView<O, V> {
    /// Replace the owner and the video list.
    pub fn populated<P, W>(self, owner: P, videos: Vec<W>) -> PlaylistView<P, W> {
        PlaylistView {
            id: self.id,
            name: self.name,
            description: self.description,
            videos,
            owner,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// A like, with exactly one of `video`, `comment` or `tweet` set.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LikeView {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tweet: Option<String>,
    pub liked_by: String,
    pub created_at: DateTimeWithTimeZone,
}

impl From<like::Model> for LikeView {
    fn from(like: like::Model) -> Self {
        let target = Some(like.target_id);
        let (video, comment, tweet) = match like.target_type {
            LikeTargetType::Video => (target, None, None),
            LikeTargetType::Comment => (None, target, None),
            LikeTargetType::Tweet => (None, None, target),
        };

        Self {
            id: like.id,
            video,
            comment,
            tweet,
            liked_by: like.liked_by_id,
            created_at: like.created_at,
        }
    }
}

/// An entry of the liked-videos listing.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LikedVideoView {
    #[serde(rename = "_id")]
    pub id: String,
    pub liked_by: String,
    pub video: Option<PopulatedVideo>,
    pub created_at: DateTimeWithTimeZone,
}

/// An entry of the watch history, most recent first.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WatchedVideoView {
    pub video: Option<PopulatedVideo>,
    pub watched_at: DateTimeWithTimeZone,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionView<S = String, C = String> {
    #[serde(rename = "_id")]
    pub id: String,
    pub subscriber: S,
    pub channel: C,
    pub created_at: DateTimeWithTimeZone,
}

impl From<subscription::Model> for SubscriptionView {
    fn from(sub: subscription::Model) -> Self {
        Self {
            id: sub.id,
            subscriber: sub.subscriber_id,
            channel: sub.channel_id,
            created_at: sub.created_at,
        }
    }
}

impl<S, C> SubscriptionView<S, C> {
    /// Replace both references.
    pub fn populated<T, D>(self, subscriber: T, channel: D) -> SubscriptionView<T, D> {
        SubscriptionView {
            id: self.id,
            subscriber,
            channel,
            created_at: self.created_at,
        }
    }
}
