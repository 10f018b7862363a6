//! Video entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// An uploaded video. `owner_id` never changes after creation.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "video")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub owner_id: String,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    pub video_file_url: String,

    /// Storage key of the video file.
    pub video_file_key: String,

    pub thumbnail_url: String,

    pub thumbnail_key: String,

    /// Length in seconds, as reported by storage.
    pub duration: f64,

    #[sea_orm(default_value = 0)]
    pub views: i64,

    #[sea_orm(default_value = true)]
    pub is_published: bool,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Owner,
    #[sea_orm(has_many = "super::comment::Entity")]
    Comments,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Published videos are public; drafts are only visible to their owner.
    #[must_use]
    pub fn is_visible_to(&self, viewer_id: Option<&str>) -> bool {
        self.is_published || viewer_id == Some(self.owner_id.as_str())
    }
}
