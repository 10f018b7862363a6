//! Channel dashboard: aggregate stats and the owner's full video list.

use serde::Serialize;
use vidshare_common::AppResult;
use vidshare_db::repositories::{
    LikeRepository, PageRequest, Paginated, SubscriptionRepository, VideoRepository,
};

use super::views::VideoView;

/// Totals shown on a channel dashboard.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStats {
    pub total_videos: u64,
    pub total_subscribers: u64,
    pub total_likes: u64,
    pub total_views: i64,
}

#[derive(Clone)]
pub struct DashboardService {
    video_repo: VideoRepository,
    like_repo: LikeRepository,
    subscription_repo: SubscriptionRepository,
}

impl DashboardService {
    #[must_use]
    pub const fn new(
        video_repo: VideoRepository,
        like_repo: LikeRepository,
        subscription_repo: SubscriptionRepository,
    ) -> Self {
        Self {
            video_repo,
            like_repo,
            subscription_repo,
        }
    }

    /// Stats for the caller's channel. Unpublished videos count too.
    pub async fn stats(&self, owner_id: &str) -> AppResult<ChannelStats> {
        let (total_videos, total_subscribers, total_likes, total_views) = futures::try_join!(
            self.video_repo.count_by_owner(owner_id),
            self.subscription_repo.count_subscribers(owner_id),
            self.like_repo.count_video_likes_for_owner(owner_id),
            self.video_repo.sum_views_by_owner(owner_id),
        )?;

        Ok(ChannelStats {
            total_videos,
            total_subscribers,
            total_likes,
            total_views,
        })
    }

    /// Every video the caller owns, published or not.
    pub async fn videos(&self, owner_id: &str, page: PageRequest) -> AppResult<Paginated<VideoView>> {
        let videos = self.video_repo.find_page_by_owner(owner_id, page).await?;
        Ok(videos.map(VideoView::from))
    }
}
