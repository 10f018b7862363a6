//! Playlist service.

use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;
use vidshare_common::{AppError, AppResult, IdGenerator, parse_id};
use vidshare_db::entities::playlist;
use vidshare_db::repositories::{
    PageRequest, Paginated, PlaylistRepository, UserRepository, VideoRepository,
};

use super::guard::ensure_owner;
use super::input::{optional_text, required_text};
use super::populate::Populator;
use super::views::{Owner, PlaylistView, PopulatedVideo};

const NOT_OWNER: &str = "You are not the owner of this playlist";

/// A playlist with its owner, videos and video owners populated.
pub type PopulatedPlaylist = PlaylistView<Owner, PopulatedVideo>;

/// Input for creating or editing a playlist.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct PlaylistInput {
    #[validate(length(max = 128))]
    pub name: Option<String>,
    #[validate(length(max = 2048))]
    pub description: Option<String>,
}

/// Service for managing playlists.
#[derive(Clone)]
pub struct PlaylistService {
    playlist_repo: PlaylistRepository,
    video_repo: VideoRepository,
    user_repo: UserRepository,
    populator: Populator,
    id_gen: IdGenerator,
}

impl PlaylistService {
    /// Create a new playlist service.
    #[must_use]
    pub const fn new(
        playlist_repo: PlaylistRepository,
        video_repo: VideoRepository,
        user_repo: UserRepository,
        populator: Populator,
    ) -> Self {
        Self {
            playlist_repo,
            video_repo,
            user_repo,
            populator,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create an empty playlist.
    pub async fn create(&self, actor_id: &str, input: PlaylistInput) -> AppResult<PlaylistView> {
        let name = required_text(input.name.as_deref(), "Name")?;
        let description = required_text(input.description.as_deref(), "Description")?;
        input.validate()?;

        let model = playlist::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(name),
            description: Set(description),
            owner_id: Set(actor_id.to_string()),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let playlist = self.playlist_repo.create(model).await?;
        Ok(PlaylistView::new(playlist, Vec::new()))
    }

    /// Page through a user's playlists.
    pub async fn list_by_user(
        &self,
        user_id: &str,
        viewer_id: Option<&str>,
        page: PageRequest,
    ) -> AppResult<Paginated<PopulatedPlaylist>> {
        let user_id = parse_id(user_id, "User")?;
        let user = self.user_repo.get_by_id(&user_id).await?;

        let playlists = self.playlist_repo.find_page_by_owner(&user.id, page).await?;
        self.populate(playlists, viewer_id).await
    }

    /// A single playlist. Drafts `viewer_id` may not see are left out.
    pub async fn get(
        &self,
        playlist_id: &str,
        viewer_id: Option<&str>,
    ) -> AppResult<PopulatedPlaylist> {
        let playlist_id = parse_id(playlist_id, "Playlist")?;
        let playlist = self.playlist_repo.get_by_id(&playlist_id).await?;
        self.populate_one(playlist, viewer_id).await
    }

    /// Rename and/or re-describe a playlist.
    pub async fn update(
        &self,
        playlist_id: &str,
        actor_id: &str,
        input: PlaylistInput,
    ) -> AppResult<PopulatedPlaylist> {
        let playlist_id = parse_id(playlist_id, "Playlist")?;
        let name = optional_text(input.name.as_deref());
        let description = optional_text(input.description.as_deref());
        if name.is_none() && description.is_none() {
            return Err(AppError::MissingField("Name or description".to_string()));
        }
        input.validate()?;

        let playlist = self.playlist_repo.get_by_id(&playlist_id).await?;
        ensure_owner(actor_id, &playlist.owner_id, NOT_OWNER)?;

        let mut active: playlist::ActiveModel = playlist.into();
        if let Some(name) = name {
            active.name = Set(name);
        }
        if let Some(description) = description {
            active.description = Set(description);
        }
        active.updated_at = Set(Some(Utc::now().into()));

        let updated = self.playlist_repo.update(active).await?;
        self.populate_one(updated, Some(actor_id)).await
    }

    /// Delete a playlist.
    pub async fn delete(&self, playlist_id: &str, actor_id: &str) -> AppResult<()> {
        let playlist_id = parse_id(playlist_id, "Playlist")?;
        let playlist = self.playlist_repo.get_by_id(&playlist_id).await?;
        ensure_owner(actor_id, &playlist.owner_id, NOT_OWNER)?;

        self.playlist_repo.delete(&playlist.id).await
    }

    /// Append a video to a playlist. The same video may be added again.
    pub async fn add_video(
        &self,
        video_id: &str,
        playlist_id: &str,
        actor_id: &str,
    ) -> AppResult<PopulatedPlaylist> {
        let video_id = parse_id(video_id, "Video")?;
        let playlist_id = parse_id(playlist_id, "Playlist")?;

        let playlist = self.playlist_repo.get_by_id(&playlist_id).await?;
        let video = self.video_repo.get_visible(&video_id, Some(actor_id)).await?;
        ensure_owner(actor_id, &playlist.owner_id, NOT_OWNER)?;

        self.playlist_repo
            .append_video(self.id_gen.generate(), &playlist.id, &video.id)
            .await?;

        self.populate_one(playlist, Some(actor_id)).await
    }

    /// Remove every occurrence of a video from a playlist.
    pub async fn remove_video(
        &self,
        video_id: &str,
        playlist_id: &str,
        actor_id: &str,
    ) -> AppResult<PopulatedPlaylist> {
        let video_id = parse_id(video_id, "Video")?;
        let playlist_id = parse_id(playlist_id, "Playlist")?;

        let playlist = self.playlist_repo.get_by_id(&playlist_id).await?;
        ensure_owner(actor_id, &playlist.owner_id, NOT_OWNER)?;

        let removed = self.playlist_repo.remove_video(&playlist.id, &video_id).await?;
        tracing::debug!(playlist_id = %playlist.id, video_id = %video_id, removed, "Removed playlist entries");

        self.populate_one(playlist, Some(actor_id)).await
    }

    async fn populate_one(
        &self,
        playlist: playlist::Model,
        viewer_id: Option<&str>,
    ) -> AppResult<PopulatedPlaylist> {
        let page = Paginated::new(vec![playlist], 1, PageRequest::new(1, 1));
        let populated = self.populate(page, viewer_id).await?;
        populated
            .docs
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Internal("Playlist vanished while populating".to_string()))
    }

    async fn populate(
        &self,
        playlists: Paginated<playlist::Model>,
        viewer_id: Option<&str>,
    ) -> AppResult<Paginated<PopulatedPlaylist>> {
        let ids: Vec<String> = playlists.docs.iter().map(|p| p.id.clone()).collect();
        let mut entries = self.playlist_repo.find_video_ids(&ids).await?;

        let owners = self
            .populator
            .users(playlists.docs.iter().map(|p| p.owner_id.as_str()))
            .await?;
        let videos = self
            .populator
            .videos(entries.values().flatten().map(String::as_str), viewer_id)
            .await?;

        Ok(playlists.map(|p| {
            let video_ids = entries.remove(&p.id).unwrap_or_default();
            let owner = owners.get(&p.owner_id);
            let resolved = videos.resolve(&video_ids);
            PlaylistView::new(p, video_ids).populated(owner, resolved)
        }))
    }
}
