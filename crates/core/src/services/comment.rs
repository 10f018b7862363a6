//! Comment service.

use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;
use vidshare_common::{AppResult, IdGenerator, parse_id};
use vidshare_db::entities::comment;
use vidshare_db::repositories::{CommentRepository, PageRequest, Paginated, VideoRepository};

use super::guard::ensure_owner;
use super::input::required_text;
use super::populate::Populator;
use super::views::{CommentView, Owner, VideoView};

/// A comment with its owner and (unpopulated-owner) video.
pub type PopulatedComment = CommentView<Owner, Option<VideoView>>;

/// Input for creating or editing a comment.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CommentInput {
    #[validate(length(max = 2000))]
    pub content: Option<String>,
}

/// Service for managing comments.
#[derive(Clone)]
pub struct CommentService {
    comment_repo: CommentRepository,
    video_repo: VideoRepository,
    populator: Populator,
    id_gen: IdGenerator,
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub const fn new(
        comment_repo: CommentRepository,
        video_repo: VideoRepository,
            populator: Populator,
    ) -> Self {
        Self {
            comment_repo,
            video_repo,
            populator,
            id_gen: IdGenerator::new(),
        }
    }

    /// Page through the comments of a video, newest first.
    pub async fn list_for_video(
        &self,
        video_id: &str,
        viewer_id: Option<&str>,
        page: PageRequest,
    ) -> AppResult<Paginated<PopulatedComment>> {
        let video_id = parse_id(video_id, "Video")?;
        let video = self.video_repo.get_visible(&video_id, viewer_id).await?;

        let comments = self.comment_repo.find_page_by_video(&video.id, page).await?;
        let owners = self
            .populator
            .users(comments.docs.iter().map(|c| c.owner_id.as_str()))
            .await?;

        // Every comment on the page belongs to the same video
        let video = VideoView::from(video);
        Ok(comments.map(|c| {
            let owner = owners.get(&c.owner_id);
            let video = (c.video_id == video.id).then(|| video.clone());
            CommentView::from(c).populated(owner, video)
        }))
    }

    /// Comment on an existing video.
    pub async fn add(
        &self,
        video_id: &str,
        actor_id: &str,
        input: CommentInput,
    ) -> AppResult<CommentView> {
        let video_id = parse_id(video_id, "Video")?;
        let content = required_text(input.content.as_deref(), "Content")?;
        input.validate()?;

        let video = self.video_repo.get_visible(&video_id, Some(actor_id)).await?;

        let model = comment::ActiveModel {
            id: Set(self.id_gen.generate()),
            content: Set(content),
            video_id: Set(video.id),
            owner_id: Set(actor_id.to_string()),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        Ok(self.comment_repo.create(model).await?.into())
    }

    /// Edit a comment's content.
    pub async fn update(
        &self,
        comment_id: &str,
        actor_id: &str,
        input: CommentInput,
    ) -> AppResult<CommentView> {
        let comment_id = parse_id(comment_id, "Comment")?;
        let content = required_text(input.content.as_deref(), "Content")?;
        input.validate()?;

        let comment = self.comment_repo.get_by_id(&comment_id).await?;
        ensure_owner(
            actor_id,
            &comment.owner_id,
            "You are not authorized to update this comment",
        )?;

        let mut active: comment::ActiveModel = comment.into();
        active.content = Set(content);
        active.updated_at = Set(Some(Utc::now().into()));

        Ok(self.comment_repo.update(active).await?.into())
    }

    /// Delete a comment and its likes.
    pub async fn delete(&self, comment_id: &str, actor_id: &str) -> AppResult<()> {
        let comment_id = parse_id(comment_id, "Comment")?;
        let comment = self.comment_repo.get_by_id(&comment_id).await?;
        ensure_owner(
            actor_id,
            &comment.owner_id,
            "You are not authorized to delete this comment",
        )?;

        self.comment_repo.delete(&comment.id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::test_support::Fixture;
    use vidshare_common::AppError;

    fn content(text: &str) -> CommentInput {
        CommentInput {
            content: Some(text.to_string()),
        }
    }

    #[tokio::test]
    async fn test_comment_lifecycle() {
        let fx = Fixture::new().await;
        let u = fx.register("Alice").await.user;
        let u2 = fx.register("Bob").await.user;
        let video = fx.publish(&u.id, "Intro").await;

        let created = fx.comments.add(&video.id, &u.id, content("hi")).await.unwrap();
        assert_eq!(created.owner, u.id);
        assert_eq!(created.content, "hi");

        let err = fx
            .comments
            .update(&created.id, &u2.id, content("hacked"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let listed = fx
            .comments
            .list_for_video(&video.id, None, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(listed.docs[0].content, "hi");
        assert_eq!(listed.docs[0].owner.as_ref().unwrap().username, "Alice");
        assert_eq!(listed.docs[0].video.as_ref().unwrap().id, video.id);

        fx.comments.delete(&created.id, &u.id).await.unwrap();

        let listed = fx
            .comments
            .list_for_video(&video.id, None, PageRequest::default())
            .await
            .unwrap();
        assert!(listed.docs.iter().all(|c| c.id != created.id));
        assert_eq!(listed.total_docs, 0);
    }

    #[tokio::test]
    async fn test_blank_content_is_missing() {
        let fx = Fixture::new().await;
        let u = fx.register("Alice").await.user;
        let video = fx.publish(&u.id, "Intro").await;

        let err = fx
            .comments
            .add(&video.id, &u.id, content("   "))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Content is required");
    }

    #[tokio::test]
    async fn test_comment_on_missing_video() {
        let fx = Fixture::new().await;
        let u = fx.register("Alice").await.user;
        let missing = IdGenerator::new().generate();

        let err = fx
            .comments
            .add(&missing, &u.id, content("hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_missing_comment_is_not_found_before_forbidden() {
        let fx = Fixture::new().await;
        let u = fx.register("Alice").await.user;
        let missing = IdGenerator::new().generate();

        let err = fx
            .comments
            .update(&missing, &u.id, content("hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_draft_comments_are_owner_only() {
        let fx = Fixture::new().await;
        let alice = fx.register("Alice").await.user;
        let bob = fx.register("Bob").await.user;
        let draft = fx.draft(&bob.id, "Secret").await;

        fx.comments.add(&draft.id, &bob.id, content("note")).await.unwrap();

        for viewer in [None, Some(alice.id.as_str())] {
            let err = fx
                .comments
                .list_for_video(&draft.id, viewer, PageRequest::default())
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::NotFound(_)));
        }
        let err = fx
            .comments
            .add(&draft.id, &alice.id, content("hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let own = fx
            .comments
            .list_for_video(&draft.id, Some(&bob.id), PageRequest::default())
            .await
            .unwrap();
        assert_eq!(own.total_docs, 1);
    }
}
