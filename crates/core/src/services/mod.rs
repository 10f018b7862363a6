//! Business logic services.

#![allow(missing_docs)]

pub mod comment;
pub mod dashboard;
pub mod guard;
pub mod input;
pub mod like;
pub mod media;
pub mod playlist;
pub mod populate;
pub mod subscription;
pub mod toggle;
pub mod tweet;
pub mod user;
pub mod video;
pub mod views;

#[cfg(test)]
pub(crate) mod test_support;

pub use comment::{CommentInput, CommentService, PopulatedComment};
pub use dashboard::{ChannelStats, DashboardService};
pub use input::PageQuery;
pub use like::{LikeService, LikeToggle};
pub use media::{FileUpload, MediaStore};
pub use playlist::{PlaylistInput, PlaylistService, PopulatedPlaylist};
pub use populate::Populator;
pub use subscription::{ChannelEntry, SubscriberEntry, SubscriptionService, SubscriptionToggle};
pub use tweet::{TweetInput, TweetService};
pub use user::{
    AuthSession, ChangePasswordInput, LoginInput, ProfileImage, RegisterInput,
    UpdateAccountInput, UserService,
};
pub use video::{PublishVideoInput, UpdateVideoInput, VideoListParams, VideoService};
pub use views::{
    ChannelProfile, CommentView, LikeView, LikedVideoView, Owner, PlaylistView, PopulatedVideo,
    ProfileView, SubscriptionView, TweetView, VideoView, WatchedVideoView,
};
