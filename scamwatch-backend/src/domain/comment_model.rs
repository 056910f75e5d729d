// scamwatch-backend/src/domain/comment_model.rs

use super::entity_kind::EntityKind;
use super::moderation_status::ModerationStatus;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// アラートに付くコメント
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "alert_comments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub alert_id: Uuid,

    pub author_id: Uuid,

    #[sea_orm(column_type = "Text")]
    pub content: String,

    pub status: ModerationStatus,

    #[sea_orm(nullable)]
    pub moderator_id: Option<Uuid>,

    #[sea_orm(column_type = "Text", nullable)]
    pub moderator_notes: Option<String>,

    pub is_active: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    /// 書き込みごとに増える楽観ロック用の版番号
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::alert_model::Entity",
        from = "Column::AlertId",
        to = "super::alert_model::Column::Id",
        on_delete = "Cascade"
    )]
    Alert,
}

impl Related<super::alert_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Alert.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

crate::impl_moderated_record!(
    Model,
    EntityKind::Comment,
    owner = author_id,
    parent = alert_id
);
