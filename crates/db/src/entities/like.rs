//! Like entity.
//!
//! A like points at exactly one video, comment or tweet. The target is stored as
//! a `(target_type, target_id)` pair rather than three nullable columns, and the
//! unique index on `(liked_by_id, target_type, target_id)` keeps at most one like
//! per user and target.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of entity a like points at.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum LikeTargetType {
    #[sea_orm(string_value = "video")]
    Video,
    #[sea_orm(string_value = "comment")]
    Comment,
    #[sea_orm(string_value = "tweet")]
    Tweet,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "like")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub target_type: LikeTargetType,

    /// ID of the video, comment or tweet (no foreign key, see module docs)
    pub target_id: String,

    pub liked_by_id: String,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::LikedById",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    LikedBy,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LikedBy.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
