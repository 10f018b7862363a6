//! User repository.

use std::collections::HashMap;
use std::sync::Arc;

use crate::conflict_or_db;
use crate::entities::{User, user};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, QueryFilter,
    QuerySelect,
};
use serde::Serialize;
use vidshare_common::{AppError, AppResult};

/// The public projection of a user embedded in other documents.
///
/// Never carries the email, password hash or access token.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult, Serialize)]
pub struct UserSummary {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    #[serde(rename = "fullName")]
    pub full_name: String,
    #[serde(rename = "avatar")]
    pub avatar_url: Option<String>,
}

impl From<&user::Model> for UserSummary {
    fn from(user: &user::Model) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            full_name: user.full_name.clone(),
            avatar_url: user.avatar_url.clone(),
        }
    }
}

/// User repository for database operations.
#[derive(Clone)]
pub struct UserRepository {
    db: Arc<DatabaseConnection>,
}

impl UserRepository {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<user::Model>> {
        User::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<user::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("User does not exist".to_string()))
    }

    /// Find a user by username (case-insensitive).
    pub async fn find_by_username(&self, username: &str) -> AppResult<Option<user::Model>> {
        User::find()
            .filter(user::Column::UsernameLower.eq(username.to_lowercase()))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user by email.
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<user::Model>> {
        User::find()
            .filter(user::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user by access token.
    pub async fn find_by_token(&self, token: &str) -> AppResult<Option<user::Model>> {
        User::find()
            .filter(user::Column::Token.eq(token))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Fetch the public projection of every listed user in one query.
    ///
    /// IDs without a row are simply absent from the map.
    pub async fn find_summaries(&self, ids: &[String]) -> AppResult<HashMap<String, UserSummary>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = User::find()
            .select_only()
            .column(user::Column::Id)
            .column(user::Column::Username)
            .column(user::Column::FullName)
            .column(user::Column::AvatarUrl)
            .filter(user::Column::Id.is_in(ids.to_vec()))
            .into_model::<UserSummary>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(|u| (u.id.clone(), u)).collect())
    }

    /// Create a new user. A taken username or email is a conflict.
    pub async fn create(&self, model: user::ActiveModel) -> AppResult<user::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| conflict_or_db(e, "User with email or username already exists"))
    }

    /// Update a user.
    pub async fn update(&self, model: user::ActiveModel) -> AppResult<user::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| conflict_or_db(e, "Email is already in use"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_user(id: &str, username: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: username.to_string(),
            username_lower: username.to_lowercase(),
            email: format!("{}@example.com", username.to_lowercase()),
            full_name: format!("{username} Example"),
            avatar_url: Some(format!("/files/{id}.png")),
            avatar_key: Some(format!("{id}.png")),
            cover_image_url: None,
            cover_image_key: None,
            password_hash: "hash".to_string(),
            token: Some("token".to_string()),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_id_found() {
        let user = create_test_user("u1", "Alice");
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user.clone()]])
                .into_connection(),
        );

        let repo = UserRepository::new(db);
        let result = repo.find_by_id("u1").await.unwrap();

        assert_eq!(result.unwrap().username, "Alice");
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let repo = UserRepository::new(db);
        let err = repo.get_by_id("missing").await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_find_summaries_projects_public_fields() {
        let alice = create_test_user("u1", "Alice");
        let bob = create_test_user("u2", "Bob");
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[alice, bob]])
                .into_connection(),
        );

        let repo = UserRepository::new(db);
        let summaries = repo
            .find_summaries(&["u1".to_string(), "u2".to_string()])
            .await
            .unwrap();

        assert_eq!(summaries.len(), 2);
        let json = serde_json::to_value(&summaries["u1"]).unwrap();
        assert_eq!(json["_id"], "u1");
        assert_eq!(json["fullName"], "Alice Example");
        assert_eq!(json["avatar"], "/files/u1.png");
        assert!(json.get("email").is_none());
        assert!(json.get("password_hash").is_none());
    }

    #[tokio::test]
    async fn test_find_summaries_empty_skips_query() {
        // No query results appended: any query would fail
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let repo = UserRepository::new(db);
        assert!(repo.find_summaries(&[]).await.unwrap().is_empty());
    }
}
