//! Batched reference lookups for listing documents.
//!
//! Each reference is resolved with one `IN (...)` query per page and collapsed to
//! the first match or `null`. Nested references (playlist → video → owner) are
//! resolved one level at a time.

use std::collections::{BTreeSet, HashMap};

use vidshare_common::AppResult;
use vidshare_db::entities::video;
use vidshare_db::repositories::{UserRepository, UserSummary, VideoRepository};

use super::views::{Owner, PopulatedVideo, VideoView};

#[derive(Clone)]
pub struct Populator {
    user_repo: UserRepository,
    video_repo: VideoRepository,
}

impl Populator {
    #[must_use]
    pub const fn new(user_repo: UserRepository, video_repo: VideoRepository) -> Self {
        Self {
            user_repo,
            video_repo,
        }
    }

    /// Public projections of the given users.
    pub async fn users<'a, I>(&self, ids: I) -> AppResult<UserLookup>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let ids = distinct(ids);
        Ok(UserLookup(self.user_repo.find_summaries(&ids).await?))
    }

    /// Owner-populated videos for the given IDs, limited to those `viewer_id`
    /// may see. Hidden drafts resolve like missing rows.
    pub async fn videos<'a, I>(&self, ids: I, viewer_id: Option<&str>) -> AppResult<VideoLookup>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let ids = distinct(ids);
        let videos = self.video_repo.find_by_ids(&ids).await?;
        self.owned_videos(videos.into_values().filter(|v| v.is_visible_to(viewer_id)))
            .await
    }

    /// Populate the owners of already-loaded videos.
    pub async fn owned_videos<I>(&self, videos: I) -> AppResult<VideoLookup>
    where
        I: IntoIterator<Item = video::Model>,
    {
        let videos: Vec<video::Model> = videos.into_iter().collect();
        let owners = self.users(videos.iter().map(|v| v.owner_id.as_str())).await?;

        let populated = videos
            .into_iter()
            .map(|v| {
                let owner = owners.get(&v.owner_id);
                (v.id.clone(), VideoView::from(v).with_owner(owner))
            })
            .collect();

        Ok(VideoLookup(populated))
    }
}

/// Result of a batched user lookup.
#[derive(Debug, Default)]
pub struct UserLookup(HashMap<String, UserSummary>);

impl UserLookup {
    /// The referenced user, or `None` when the row is gone.
    #[must_use]
    pub fn get(&self, id: &str) -> Owner {
        self.0.get(id).cloned()
    }
}

/// Result of a batched video lookup.
#[derive(Debug, Default)]
pub struct VideoLookup(HashMap<String, PopulatedVideo>);

impl VideoLookup {
    /// The referenced video, or `None` when the row is gone.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<PopulatedVideo> {
        self.0.get(id).cloned()
    }

    /// Resolve an ordered ID list, skipping IDs without a row.
    #[must_use]
    pub fn resolve(&self, ids: &[String]) -> Vec<PopulatedVideo> {
        ids.iter().filter_map(|id| self.get(id)).collect()
    }
}

fn distinct<'a, I>(ids: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    ids.into_iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(ToString::to_string)
        .collect()
}
