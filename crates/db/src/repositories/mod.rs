//! Repository layer for database operations.

pub mod comment;
pub mod like;
pub mod playlist;
pub mod query;
pub mod subscription;
pub mod tweet;
pub mod user;
pub mod video;
pub mod watch_history;

pub use comment::CommentRepository;
pub use like::{LikeRepository, LikeTarget};
pub use playlist::PlaylistRepository;
pub use query::{PageRequest, Paginated, SortDirection, fetch_page};
pub use subscription::SubscriptionRepository;
pub use tweet::TweetRepository;
pub use user::{UserRepository, UserSummary};
pub use video::{VideoListFilter, VideoRepository, VideoSortKey};
pub use watch_history::WatchHistoryRepository;
