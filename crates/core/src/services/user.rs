//! User service: accounts, access tokens and channel profiles.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;
use vidshare_common::{AppError, AppResult, IdGenerator};
use vidshare_db::entities::user;
use vidshare_db::repositories::{
    PageRequest, Paginated, SubscriptionRepository, UserRepository, WatchHistoryRepository,
};

use super::input::{optional_text, required_text};
use super::media::{FileUpload, MediaStore};
use super::populate::Populator;
use super::views::{ChannelProfile, ProfileView, WatchedVideoView};

/// Service for managing users.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    subscription_repo: SubscriptionRepository,
    history_repo: WatchHistoryRepository,
    populator: Populator,
    media: MediaStore,
    id_gen: IdGenerator,
}

/// Input for registering a new user.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    #[validate(length(max = 64))]
    pub username: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(length(max = 256))]
    pub full_name: Option<String>,

    #[validate(length(min = 8, max = 128))]
    pub password: Option<String>,
}

/// Input for logging in with a username or an email.
#[derive(Debug, Default, Deserialize)]
pub struct LoginInput {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Input for updating account details.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountInput {
    #[validate(length(max = 256))]
    pub full_name: Option<String>,

    #[validate(email)]
    pub email: Option<String>,
}

/// Input for changing the caller's password.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordInput {
    pub old_password: Option<String>,

    #[validate(length(min = 8, max = 128))]
    pub new_password: Option<String>,
}

/// A profile together with a fresh access token.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub user: ProfileView,
    pub access_token: String,
}

/// Which profile image an upload replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileImage {
    Avatar,
    CoverImage,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(
        user_repo: UserRepository,
        subscription_repo: SubscriptionRepository,
        history_repo: WatchHistoryRepository,
        populator: Populator,
        media: MediaStore,
    ) -> Self {
        Self {
            user_repo,
            subscription_repo,
            history_repo,
            populator,
            media,
            id_gen: IdGenerator::new(),
        }
    }

    /// Register a new user and sign them in.
    pub async fn register(&self, input: RegisterInput) -> AppResult<AuthSession> {
        let username = required_text(input.username.as_deref(), "Username")?;
        let email = required_text(input.email.as_deref(), "Email")?.to_lowercase();
        let full_name = required_text(input.full_name.as_deref(), "Full name")?;
        let password = required_text(input.password.as_deref(), "Password")?;
        input.validate()?;

        if self.user_repo.find_by_username(&username).await?.is_some()
            || self.user_repo.find_by_email(&email).await?.is_some()
        {
            return Err(AppError::Conflict(
                "User with email or username already exists".to_string(),
            ));
        }

        let password_hash = hash_password(&password)?;
        let token = self.id_gen.generate_token();

        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            username_lower: Set(username.to_lowercase()),
            username: Set(username),
            email: Set(email),
            full_name: Set(full_name),
            avatar_url: Set(None),
            avatar_key: Set(None),
            cover_image_url: Set(None),
            cover_image_key: Set(None),
            password_hash: Set(password_hash),
            token: Set(Some(token.clone())),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let user = self.user_repo.create(model).await?;
        tracing::info!(user_id = %user.id, username = %user.username, "User registered");

        Ok(AuthSession {
            user: user.into(),
            access_token: token,
        })
    }

    /// Check credentials and issue a new access token.
    pub async fn login(&self, input: LoginInput) -> AppResult<AuthSession> {
        let password = required_text(input.password.as_deref(), "Password")?;

        let user = match (
            optional_text(input.username.as_deref()),
            optional_text(input.email.as_deref()),
        ) {
            (Some(username), _) => self.user_repo.find_by_username(&username).await?,
            (None, Some(email)) => self.user_repo.find_by_email(&email.to_lowercase()).await?,
            (None, None) => return Err(AppError::MissingField("Username or email".to_string())),
        }
        .ok_or(AppError::Unauthorized)?;

        if !verify_password(&password, &user.password_hash)? {
            return Err(AppError::Unauthorized);
        }

        let access_token = self.regenerate_token(user.clone()).await?;

        Ok(AuthSession {
            user: user.into(),
            access_token,
        })
    }

    /// Invalidate the user's current access token.
    pub async fn logout(&self, user_id: &str) -> AppResult<()> {
        let user = self.user_repo.get_by_id(user_id).await?;
        self.regenerate_token(user).await?;
        Ok(())
    }

    /// Replace the password after checking the current one.
    ///
    /// The access token is rotated, so other sessions are signed out.
    pub async fn change_password(
        &self,
        user_id: &str,
        input: ChangePasswordInput,
    ) -> AppResult<AuthSession> {
        let old_password = required_text(input.old_password.as_deref(), "Old password")?;
        let new_password = required_text(input.new_password.as_deref(), "New password")?;
        input.validate()?;

        let user = self.user_repo.get_by_id(user_id).await?;
        if !verify_password(&old_password, &user.password_hash)? {
            return Err(AppError::BadRequest("Invalid old password".to_string()));
        }

        let new_token = self.id_gen.generate_token();
        let mut active: user::ActiveModel = user.into();
        active.password_hash = Set(hash_password(&new_password)?);
        active.token = Set(Some(new_token.clone()));
        active.updated_at = Set(Some(Utc::now().into()));

        let user = self.user_repo.update(active).await?;
        tracing::info!(user_id = %user.id, "Password changed");

        Ok(AuthSession {
            user: user.into(),
            access_token: new_token,
        })
    }

    /// Videos the user has opened, most recently watched first.
    pub async fn watch_history(
        &self,
        user_id: &str,
        page: PageRequest,
    ) -> AppResult<Paginated<WatchedVideoView>> {
        let entries = self.history_repo.find_page_by_user(user_id, page).await?;
        let videos = self
            .populator
            .videos(entries.docs.iter().map(|e| e.video_id.as_str()), Some(user_id))
            .await?;

        Ok(entries.map(|e| WatchedVideoView {
            video: videos.get(&e.video_id),
            watched_at: e.watched_at,
        }))
    }

    /// Authenticate a user by access token.
    pub async fn authenticate_by_token(&self, token: &str) -> AppResult<user::Model> {
        self.user_repo
            .find_by_token(token)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    /// The caller's own profile.
    pub async fn current_user(&self, user_id: &str) -> AppResult<ProfileView> {
        Ok(self.user_repo.get_by_id(user_id).await?.into())
    }

    /// Update full name and/or email.
    pub async fn update_account(
        &self,
        user_id: &str,
        input: UpdateAccountInput,
    ) -> AppResult<ProfileView> {
        let full_name = optional_text(input.full_name.as_deref());
        let email = optional_text(input.email.as_deref()).map(|e| e.to_lowercase());
        if full_name.is_none() && email.is_none() {
            return Err(AppError::MissingField("Full name or email".to_string()));
        }
        input.validate()?;

        let user = self.user_repo.get_by_id(user_id).await?;
        let mut active: user::ActiveModel = user.into();
        if let Some(full_name) = full_name {
            active.full_name = Set(full_name);
        }
        if let Some(email) = email {
            active.email = Set(email);
        }
        active.updated_at = Set(Some(Utc::now().into()));

        Ok(self.user_repo.update(active).await?.into())
    }

    /// Replace the avatar or cover image, deleting the previous object.
    pub async fn update_image(
        &self,
        user_id: &str,
        kind: ProfileImage,
        upload: Option<FileUpload>,
    ) -> AppResult<ProfileView> {
        let field = match kind {
            ProfileImage::Avatar => "Avatar file",
            ProfileImage::CoverImage => "Cover image file",
        };
        let upload = upload
            .and_then(FileUpload::non_empty)
            .ok_or_else(|| AppError::MissingField(field.to_string()))?;

        let user = self.user_repo.get_by_id(user_id).await?;
        let stored = self.media.store(user_id, &upload).await?;

        let previous_key = match kind {
            ProfileImage::Avatar => user.avatar_key.clone(),
            ProfileImage::CoverImage => user.cover_image_key.clone(),
        };

        let mut active: user::ActiveModel = user.into();
        match kind {
            ProfileImage::Avatar => {
                active.avatar_url = Set(Some(stored.url));
                active.avatar_key = Set(Some(stored.key));
            }
            ProfileImage::CoverImage => {
                active.cover_image_url = Set(Some(stored.url));
                active.cover_image_key = Set(Some(stored.key));
            }
        }
        active.updated_at = Set(Some(Utc::now().into()));

        let updated = self.user_repo.update(active).await?;

        if let Some(key) = previous_key {
            self.media.discard(&key).await;
        }

        Ok(updated.into())
    }

    /// Public channel page of `username`, as seen by `viewer_id`.
    pub async fn channel_profile(
        &self,
        username: &str,
        viewer_id: Option<&str>,
    ) -> AppResult<ChannelProfile> {
        let username = required_text(Some(username), "Username")?;

        let user = self
            .user_repo
            .find_by_username(&username)
            .await?
            .ok_or_else(|| AppError::NotFound("Channel does not exist".to_string()))?;

        let subscribers_count = self.subscription_repo.count_subscribers(&user.id).await?;
        let channels_subscribed_to_count =
            self.subscription_repo.count_subscribed_to(&user.id).await?;
        let is_subscribed = match viewer_id {
            Some(viewer) => self.subscription_repo.is_subscribed(viewer, &user.id).await?,
            None => false,
        };

        Ok(ChannelProfile {
            id: user.id,
            username: user.username,
            full_name: user.full_name,
            avatar: user.avatar_url,
            cover_image: user.cover_image_url,
            subscribers_count,
            channels_subscribed_to_count,
            is_subscribed,
        })
    }

    async fn regenerate_token(&self, user: user::Model) -> AppResult<String> {
        let new_token = self.id_gen.generate_token();

        let mut active: user::ActiveModel = user.into();
        active.token = Set(Some(new_token.clone()));
        active.updated_at = Set(Some(Utc::now().into()));

        self.user_repo.update(active).await?;

        Ok(new_token)
    }
}

/// Hash a password using Argon2.
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
