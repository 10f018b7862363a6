//! Like service.

use chrono::Utc;
use sea_orm::Set;
use serde::Serialize;
use vidshare_common::{AppResult, IdGenerator, parse_id};
use vidshare_db::entities::like::{self, LikeTargetType};
use vidshare_db::repositories::{
    CommentRepository, LikeRepository, LikeTarget, PageRequest, Paginated, TweetRepository,
    VideoRepository,
};

use super::populate::Populator;
use super::toggle::{Toggled, toggle};
use super::views::{LikeView, LikedVideoView};

/// Outcome of a like toggle.
#[derive(Debug, Clone, Serialize)]
pub struct LikeToggle {
    pub liked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub like: Option<LikeView>,
}

/// Service for managing likes.
#[derive(Clone)]
pub struct LikeService {
    like_repo: LikeRepository,
    video_repo: VideoRepository,
    comment_repo: CommentRepository,
    tweet_repo: TweetRepository,
    populator: Populator,
    id_gen: IdGenerator,
}

impl LikeService {
    /// Create a new like service.
    #[must_use]
    pub const fn new(
        like_repo: LikeRepository,
        video_repo: VideoRepository,
        comment_repo: CommentRepository,
        tweet_repo: TweetRepository,
        populator: Populator,
    ) -> Self {
        Self {
            like_repo,
            video_repo,
            comment_repo,
            tweet_repo,
            populator,
            id_gen: IdGenerator::new(),
        }
    }

    /// Like the target, or remove the like if there is one.
    pub async fn toggle(
        &self,
        actor_id: &str,
        kind: LikeTargetType,
        target_id: &str,
    ) -> AppResult<LikeToggle> {
        let target = self.resolve_target(actor_id, kind, target_id).await?;

        let outcome = toggle(
            || self.like_repo.delete_link(actor_id, &target),
            || self.like_repo.insert(self.new_like(actor_id, &target)),
        )
        .await?;

        tracing::debug!(
            actor_id = %actor_id,
            target_id = %target.id(),
            liked = outcome.is_active(),
            "Like toggled"
        );

        Ok(match outcome {
            Toggled::Added(like) => LikeToggle {
                liked: true,
                like: Some(like.into()),
            },
            Toggled::Removed => LikeToggle {
                liked: false,
                like: None,
            },
        })
    }

    /// Page through the videos the user liked, most recent like first.
    pub async fn liked_videos(
        &self,
        user_id: &str,
        page: PageRequest,
    ) -> AppResult<Paginated<LikedVideoView>> {
        let likes = self.like_repo.find_page_video_likes(user_id, page).await?;
        let videos = self
            .populator
            .videos(likes.docs.iter().map(|l| l.target_id.as_str()), Some(user_id))
            .await?;

        Ok(likes.map(|l| LikedVideoView {
            video: videos.get(&l.target_id),
            id: l.id,
            liked_by: l.liked_by_id,
            created_at: l.created_at,
        }))
    }

    async fn resolve_target(
        &self,
        actor_id: &str,
        kind: LikeTargetType,
        raw_id: &str,
    ) -> AppResult<LikeTarget> {
        let id = parse_id(raw_id, label(kind))?;

        // Target must exist and, for videos and their comments, be visible
        match kind {
            LikeTargetType::Video => {
                self.video_repo.get_visible(&id, Some(actor_id)).await?;
            }
            LikeTargetType::Comment => {
                let comment = self.comment_repo.get_by_id(&id).await?;
                self.video_repo
                    .get_visible(&comment.video_id, Some(actor_id))
                    .await?;
            }
            LikeTargetType::Tweet => {
                self.tweet_repo.get_by_id(&id).await?;
            }
        }

        Ok(target_of(kind, id))
    }

    fn new_like(&self, actor_id: &str, target: &LikeTarget) -> like::ActiveModel {
        like::ActiveModel {
            id: Set(self.id_gen.generate()),
            target_type: Set(target.kind()),
            target_id: Set(target.id().to_string()),
            liked_by_id: Set(actor_id.to_string()),
            created_at: Set(Utc::now().into()),
        }
    }
}

const fn label(kind: LikeTargetType) -> &'static str {
    match kind {
        LikeTargetType::Video => "Video",
        LikeTargetType::Comment => "Comment",
        LikeTargetType::Tweet => "Tweet",
    }
}

fn target_of(kind: LikeTargetType, id: String) -> LikeTarget {
    match kind {
        LikeTargetType::Video => LikeTarget::Video(id),
        LikeTargetType::Comment => LikeTarget::Comment(id),
        LikeTargetType::Tweet => LikeTarget::Tweet(id),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::test_support::Fixture;
    use vidshare_common::AppError;

    #[tokio::test]
    async fn test_toggle_like_twice_restores_count() {
        let fx = Fixture::new().await;
        let alice = fx.register("Alice").await.user;
        let bob = fx.register("Bob").await.user;
        let video = fx.publish(&alice.id, "Intro").await;

        let before = fx.like_count(LikeTargetType::Video, &video.id).await;

        let first = fx
            .likes
            .toggle(&bob.id, LikeTargetType::Video, &video.id)
            .await
            .unwrap();
        assert!(first.liked);
        assert_eq!(first.like.as_ref().unwrap().video.as_deref(), Some(video.id.as_str()));
        assert_eq!(
            fx.like_count(LikeTargetType::Video, &video.id).await,
            before + 1
        );

        let second = fx
            .likes
            .toggle(&bob.id, LikeTargetType::Video, &video.id)
            .await
            .unwrap();
        assert!(!second.liked);
        assert!(second.like.is_none());
        assert_eq!(
            fx.like_count(LikeTargetType::Video, &video.id).await,
            before
        );
    }

    #[tokio::test]
    async fn test_concurrent_toggles_leave_at_most_one_like() {
        let fx = Fixture::new().await;
        let alice = fx.register("Alice").await.user;
        let video = fx.publish(&alice.id, "Intro").await;

        let (a, b, c) = tokio::join!(
            fx.likes.toggle(&alice.id, LikeTargetType::Video, &video.id),
            fx.likes.toggle(&alice.id, LikeTargetType::Video, &video.id),
            fx.likes.toggle(&alice.id, LikeTargetType::Video, &video.id),
        );
        let liked = [a.unwrap(), b.unwrap(), c.unwrap()]
            .iter()
            .filter(|t| t.liked)
            .count();

        let count = fx.like_count(LikeTargetType::Video, &video.id).await;
        assert!(count <= 1);
        // Three toggles starting from "not liked" end "liked"
        assert_eq!(liked, 2);
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_toggle_missing_or_invalid_target() {
        let fx = Fixture::new().await;
        let alice = fx.register("Alice").await.user;

        let err = fx
            .likes
            .toggle(&alice.id, LikeTargetType::Tweet, "nope")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid Tweet ID");

        let missing = IdGenerator::new().generate();
        let err = fx
            .likes
            .toggle(&alice.id, LikeTargetType::Comment, &missing)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_liked_videos_populates_video_and_owner() {
        let fx = Fixture::new().await;
        let alice = fx.register("Alice").await.user;
        let bob = fx.register("Bob").await.user;
        let video = fx.publish(&alice.id, "Intro").await;

        fx.likes
            .toggle(&bob.id, LikeTargetType::Video, &video.id)
            .await
            .unwrap();

        let liked = fx
            .likes
            .liked_videos(&bob.id, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(liked.total_docs, 1);

        let entry = &liked.docs[0];
        let liked_video = entry.video.as_ref().unwrap();
        assert_eq!(liked_video.id, video.id);
        assert_eq!(liked_video.owner.as_ref().unwrap().username, "Alice");
    }

    #[tokio::test]
    async fn test_drafts_cannot_be_liked_by_others() {
        let fx = Fixture::new().await;
        let alice = fx.register("Alice").await.user;
        let bob = fx.register("Bob").await.user;
        let draft = fx.draft(&bob.id, "Secret").await;
        let comment = fx
            .comments
            .add(
                &draft.id,
                &bob.id,
                crate::services::CommentInput {
                    content: Some("note".into()),
                },
            )
            .await
            .unwrap();

        let err = fx
            .likes
            .toggle(&alice.id, LikeTargetType::Video, &draft.id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        let err = fx
            .likes
            .toggle(&alice.id, LikeTargetType::Comment, &comment.id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        assert!(fx
            .likes
            .toggle(&bob.id, LikeTargetType::Video, &draft.id)
            .await
            .unwrap()
            .liked);
        assert_eq!(fx.like_count(LikeTargetType::Video, &draft.id).await, 1);
    }

    #[tokio::test]
    async fn test_liked_videos_skip_unpublished() {
        let fx = Fixture::new().await;
        let alice = fx.register("Alice").await.user;
        let bob = fx.register("Bob").await.user;
        let video = fx.publish(&bob.id, "Soon hidden").await;

        fx.likes
            .toggle(&alice.id, LikeTargetType::Video, &video.id)
            .await
            .unwrap();
        fx.videos.toggle_publish(&video.id, &bob.id).await.unwrap();

        let liked = fx
            .likes
            .liked_videos(&alice.id, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(liked.total_docs, 0);
        assert!(liked.docs.is_empty());
    }
}
