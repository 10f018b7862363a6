//! Video service.

use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;
use vidshare_common::{AppError, AppResult, IdGenerator, parse_id};
use vidshare_db::entities::{video, watch_history};
use vidshare_db::repositories::{
    PageRequest, Paginated, SortDirection, VideoListFilter, VideoRepository, VideoSortKey,
    WatchHistoryRepository,
};

use super::guard::ensure_owner;
use super::input::{optional_text, required_text};
use super::media::{FileUpload, MediaStore};
use super::populate::Populator;
use super::views::{PopulatedVideo, VideoView};

const NOT_OWNER: &str = "You are not the owner of this video";

/// Query parameters of the public video listing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoListParams {
    pub query: Option<String>,
    pub sort_by: Option<String>,
    pub sort_type: Option<String>,
    pub user_id: Option<String>,
}

/// A new video, as received from a multipart form.
#[derive(Debug, Default, Validate)]
pub struct PublishVideoInput {
    #[validate(length(max = 256))]
    pub title: Option<String>,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    /// Client-reported length in seconds, used when storage cannot probe it.
    pub duration: Option<f64>,
    pub video_file: Option<FileUpload>,
    pub thumbnail: Option<FileUpload>,
}

/// Changes to an existing video.
#[derive(Debug, Default, Validate)]
pub struct UpdateVideoInput {
    #[validate(length(max = 256))]
    pub title: Option<String>,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    pub thumbnail: Option<FileUpload>,
}

/// Service for managing videos.
#[derive(Clone)]
pub struct VideoService {
    video_repo: VideoRepository,
    history_repo: WatchHistoryRepository,
    populator: Populator,
    media: MediaStore,
    id_gen: IdGenerator,
}

impl VideoService {
    /// Create a new video service.
    #[must_use]
    pub const fn new(
        video_repo: VideoRepository,
        history_repo: WatchHistoryRepository,
        populator: Populator,
        media: MediaStore,
    ) -> Self {
        Self {
            video_repo,
            history_repo,
            populator,
            media,
            id_gen: IdGenerator::new(),
        }
    }

    /// Page through published videos, plus the caller's own unpublished ones
    /// when listing the caller's channel.
    pub async fn list(
        &self,
        params: &VideoListParams,
        page: PageRequest,
        viewer_id: Option<&str>,
    ) -> AppResult<Paginated<PopulatedVideo>> {
        let owner_id = optional_text(params.user_id.as_deref())
            .map(|id| parse_id(&id, "User"))
            .transpose()?;

        let viewer_id = match (&owner_id, viewer_id) {
            (Some(owner), Some(viewer)) if owner == viewer => Some(viewer.to_string()),
            _ => None,
        };

        let filter = VideoListFilter {
            query: optional_text(params.query.as_deref()),
            owner_id,
            viewer_id,
            sort: VideoSortKey::parse(params.sort_by.as_deref()),
            direction: SortDirection::parse(params.sort_type.as_deref()),
        };

        let videos = self.video_repo.find_page(&filter, page).await?;
        self.with_owners(videos).await
    }

    /// Upload both files and create the video.
    pub async fn publish(
        &self,
        owner_id: &str,
        input: PublishVideoInput,
    ) -> AppResult<VideoView> {
        let title = required_text(input.title.as_deref(), "Title")?;
        let description = required_text(input.description.as_deref(), "Description")?;
        input.validate()?;

        let video_file = input
            .video_file
            .and_then(FileUpload::non_empty)
            .ok_or_else(|| AppError::MissingField("Video file".to_string()))?;
        let thumbnail = input
            .thumbnail
            .and_then(FileUpload::non_empty)
            .ok_or_else(|| AppError::MissingField("Thumbnail file".to_string()))?;

        let stored_video = self.media.store(owner_id, &video_file).await?;
        let stored_thumbnail = match self.media.store(owner_id, &thumbnail).await {
            Ok(stored) => stored,
            Err(e) => {
                self.media.discard(&stored_video.key).await;
                return Err(e);
            }
        };

        let duration = stored_video
            .duration
            .or(input.duration)
            .filter(|d| d.is_finite() && *d >= 0.0)
            .unwrap_or(0.0);

        let model = video::ActiveModel {
            id: Set(self.id_gen.generate()),
            owner_id: Set(owner_id.to_string()),
            title: Set(title),
            description: Set(description),
            video_file_url: Set(stored_video.url.clone()),
            video_file_key: Set(stored_video.key.clone()),
            thumbnail_url: Set(stored_thumbnail.url.clone()),
            thumbnail_key: Set(stored_thumbnail.key.clone()),
            duration: Set(duration),
            views: Set(0),
            is_published: Set(true),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        match self.video_repo.create(model).await {
            Ok(video) => {
                tracing::info!(video_id = %video.id, owner_id = %owner_id, "Video published");
                Ok(video.into())
            }
            Err(e) => {
                self.media.discard(&stored_video.key).await;
                self.media.discard(&stored_thumbnail.key).await;
                Err(e)
            }
        }
    }

    /// A single video with its owner.
    ///
    /// Unpublished videos are only visible to their owner. Every other view
    /// counts towards `views`.
    pub async fn get(&self, video_id: &str, viewer_id: Option<&str>) -> AppResult<PopulatedVideo> {
        let video_id = parse_id(video_id, "Video")?;
        let mut video = self.video_repo.get_visible(&video_id, viewer_id).await?;

        let is_owner = viewer_id == Some(video.owner_id.as_str());

        if !is_owner {
            self.video_repo.increment_views(&video.id).await?;
            video.views += 1;
        }

        if let Some(viewer) = viewer_id {
            self.history_repo
                .record(watch_history::ActiveModel {
                    id: Set(self.id_gen.generate()),
                    user_id: Set(viewer.to_string()),
                    video_id: Set(video.id.clone()),
                    watched_at: Set(Utc::now().into()),
                })
                .await?;
        }

        let owners = self.populator.users([video.owner_id.as_str()]).await?;
        let owner = owners.get(&video.owner_id);
        Ok(VideoView::from(video).with_owner(owner))
    }

    /// Update title, description and/or thumbnail.
    pub async fn update(
        &self,
        video_id: &str,
        actor_id: &str,
        input: UpdateVideoInput,
    ) -> AppResult<VideoView> {
        let video_id = parse_id(video_id, "Video")?;
        let title = optional_text(input.title.as_deref());
        let description = optional_text(input.description.as_deref());
        let thumbnail = input.thumbnail.clone().and_then(FileUpload::non_empty);
        if title.is_none() && description.is_none() && thumbnail.is_none() {
            return Err(AppError::MissingField(
                "Title, description or thumbnail".to_string(),
            ));
        }
        input.validate()?;

        let video = self.video_repo.get_by_id(&video_id).await?;
        ensure_owner(actor_id, &video.owner_id, NOT_OWNER)?;

        let stored_thumbnail = match thumbnail {
            Some(upload) => Some(self.media.store(actor_id, &upload).await?),
            None => None,
        };
        let previous_thumbnail = video.thumbnail_key.clone();

        let mut active: video::ActiveModel = video.into();
        if let Some(title) = title {
            active.title = Set(title);
        }
        if let Some(description) = description {
            active.description = Set(description);
        }
        if let Some(stored) = &stored_thumbnail {
            active.thumbnail_url = Set(stored.url.clone());
            active.thumbnail_key = Set(stored.key.clone());
        }
        active.updated_at = Set(Some(Utc::now().into()));

        let updated = self.video_repo.update(active).await?;

        if stored_thumbnail.is_some() {
            self.media.discard(&previous_thumbnail).await;
        }

        Ok(updated.into())
    }

    /// Delete a video, its likes (and the likes of its comments) and its files.
    pub async fn delete(&self, video_id: &str, actor_id: &str) -> AppResult<()> {
        let video_id = parse_id(video_id, "Video")?;
        let video = self.video_repo.get_by_id(&video_id).await?;
        ensure_owner(actor_id, &video.owner_id, NOT_OWNER)?;

        self.video_repo.delete(&video.id).await?;

        self.media.discard(&video.video_file_key).await;
        self.media.discard(&video.thumbnail_key).await;

        tracing::info!(video_id = %video.id, "Video deleted");
        Ok(())
    }

    /// Flip the published flag.
    pub async fn toggle_publish(&self, video_id: &str, actor_id: &str) -> AppResult<VideoView> {
        let video_id = parse_id(video_id, "Video")?;
        let video = self.video_repo.get_by_id(&video_id).await?;
        ensure_owner(actor_id, &video.owner_id, NOT_OWNER)?;

        let is_published = !video.is_published;
        let mut active: video::ActiveModel = video.into();
        active.is_published = Set(is_published);
        active.updated_at = Set(Some(Utc::now().into()));

        Ok(self.video_repo.update(active).await?.into())
    }

    async fn with_owners(
        &self,
        videos: Paginated<video::Model>,
    ) -> AppResult<Paginated<PopulatedVideo>> {
        let owners = self
            .populator
            .users(videos.docs.iter().map(|v| v.owner_id.as_str()))
            .await?;

        Ok(videos.map(|v| {
            let owner = owners.get(&v.owner_id);
            VideoView::from(v).with_owner(owner)
        }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::CommentInput;
    use crate::services::test_support::Fixture;
    use vidshare_db::entities::like::LikeTargetType;

    fn params() -> VideoListParams {
        VideoListParams::default()
    }

    #[tokio::test]
    async fn test_publish_and_get_populates_owner() {
        let fx = Fixture::new().await;
        let alice = fx.register("Alice").await.user;
        let video = fx.publish(&alice.id, "Intro").await;

        let seen = fx.videos.get(&video.id, None).await.unwrap();
        let owner = seen.owner.unwrap();
        assert_eq!(owner.username, "Alice");
        assert_eq!(seen.views, 1);
    }

    #[tokio::test]
    async fn test_publish_requires_files() {
        let fx = Fixture::new().await;
        let alice = fx.register("Alice").await.user;

        let err = fx
            .videos
            .publish(
                &alice.id,
                PublishVideoInput {
                    title: Some("t".into()),
                    description: Some("d".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Video file is required");
    }

    #[tokio::test]
    async fn test_owner_views_do_not_count() {
        let fx = Fixture::new().await;
        let alice = fx.register("Alice").await.user;
        let bob = fx.register("Bob").await.user;
        let video = fx.publish(&alice.id, "Intro").await;

        fx.videos.get(&video.id, Some(&alice.id)).await.unwrap();
        fx.videos.get(&video.id, Some(&bob.id)).await.unwrap();
        let seen = fx.videos.get(&video.id, Some(&alice.id)).await.unwrap();

        assert_eq!(seen.views, 1);
    }

    #[tokio::test]
    async fn test_unpublished_hidden_from_others() {
        let fx = Fixture::new().await;
        let alice = fx.register("Alice").await.user;
        let bob = fx.register("Bob").await.user;
        let video = fx.publish(&alice.id, "Draft").await;

        let toggled = fx.videos.toggle_publish(&video.id, &alice.id).await.unwrap();
        assert!(!toggled.is_published);

        let err = fx.videos.get(&video.id, Some(&bob.id)).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(fx.videos.get(&video.id, Some(&alice.id)).await.is_ok());

        // Listing: hidden from the public, visible on the owner's own channel
        let public = fx
            .videos
            .list(&params(), PageRequest::default(), Some(&bob.id))
            .await
            .unwrap();
        assert_eq!(public.total_docs, 0);

        let own = fx
            .videos
            .list(
                &VideoListParams {
                    user_id: Some(alice.id.clone()),
                    ..params()
                },
                PageRequest::default(),
                Some(&alice.id),
            )
            .await
            .unwrap();
        assert_eq!(own.total_docs, 1);
    }

    #[tokio::test]
    async fn test_list_pages_are_disjoint() {
        let fx = Fixture::new().await;
        let alice = fx.register("Alice").await.user;
        for i in 0..25 {
            fx.publish(&alice.id, &format!("Video {i:02}")).await;
        }

        let sorted = VideoListParams {
            sort_by: Some("title".into()),
            sort_type: Some("asc".into()),
            ..params()
        };

        let all = fx
            .videos
            .list(&sorted, PageRequest::new(1, 100), None)
            .await
            .unwrap();
        let first = fx
            .videos
            .list(&sorted, PageRequest::new(1, 10), None)
            .await
            .unwrap();
        let second = fx
            .videos
            .list(&sorted, PageRequest::new(2, 10), None)
            .await
            .unwrap();

        let ids = |page: &Paginated<PopulatedVideo>| -> Vec<String> {
            page.docs.iter().map(|v| v.id.clone()).collect()
        };

        let mut union = ids(&first);
        union.extend(ids(&second));
        assert_eq!(union, ids(&all)[..20].to_vec());
        assert!(ids(&first).iter().all(|id| !ids(&second).contains(id)));
        assert_eq!(first.total_docs, 25);
        assert_eq!(all.docs[0].title, "Video 00");
    }

    #[tokio::test]
    async fn test_list_search_is_case_insensitive() {
        let fx = Fixture::new().await;
        let alice = fx.register("Alice").await.user;
        fx.publish(&alice.id, "Rust Ownership").await;
        fx.publish(&alice.id, "Cooking").await;

        let found = fx
            .videos
            .list(
                &VideoListParams {
                    query: Some("OWNER".into()),
                    ..params()
                },
                PageRequest::default(),
                None,
            )
            .await
            .unwrap();

        assert_eq!(found.total_docs, 1);
        assert_eq!(found.docs[0].title, "Rust Ownership");
    }

    #[tokio::test]
    async fn test_non_owner_cannot_modify() {
        let fx = Fixture::new().await;
        let alice = fx.register("Alice").await.user;
        let bob = fx.register("Bob").await.user;
        let video = fx.publish(&alice.id, "Intro").await;

        let err = fx
            .videos
            .update(
                &video.id,
                &bob.id,
                UpdateVideoInput {
                    title: Some("Hijacked".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let err = fx.videos.delete(&video.id, &bob.id).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let unchanged = fx.videos.get(&video.id, Some(&alice.id)).await.unwrap();
        assert_eq!(unchanged.title, "Intro");
    }

    #[tokio::test]
    async fn test_update_and_delete_by_owner() {
        let fx = Fixture::new().await;
        let alice = fx.register("Alice").await.user;
        let video = fx.publish(&alice.id, "Intro").await;

        let updated = fx
            .videos
            .update(
                &video.id,
                &alice.id,
                UpdateVideoInput {
                    description: Some("New description".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.title, "Intro");
        assert_eq!(updated.description, "New description");

        fx.likes
            .toggle(&alice.id, LikeTargetType::Video, &video.id)
            .await
            .unwrap();
        fx.videos.delete(&video.id, &alice.id).await.unwrap();

        let err = fx.videos.get(&video.id, None).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_clears_video_and_comment_likes() {
        let fx = Fixture::new().await;
        let alice = fx.register("Alice").await.user;
        let bob = fx.register("Bob").await.user;
        let video = fx.publish(&alice.id, "Intro").await;
        let comment = fx
            .comments
            .add(
                &video.id,
                &bob.id,
                CommentInput {
                    content: Some("Nice".into()),
                },
            )
            .await
            .unwrap();

        fx.likes
            .toggle(&bob.id, LikeTargetType::Video, &video.id)
            .await
            .unwrap();
        fx.likes
            .toggle(&alice.id, LikeTargetType::Comment, &comment.id)
            .await
            .unwrap();
        assert_eq!(fx.like_count(LikeTargetType::Video, &video.id).await, 1);
        assert_eq!(fx.like_count(LikeTargetType::Comment, &comment.id).await, 1);

        fx.videos.delete(&video.id, &alice.id).await.unwrap();

        assert_eq!(fx.like_count(LikeTargetType::Video, &video.id).await, 0);
        assert_eq!(fx.like_count(LikeTargetType::Comment, &comment.id).await, 0);
    }

    #[tokio::test]
    async fn test_invalid_video_id() {
        let fx = Fixture::new().await;
        let err = fx.videos.get("not-an-id", None).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid Video ID");
    }
}
