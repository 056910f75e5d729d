// scamwatch-backend/src/domain/role_change_request_model.rs

use super::entity_kind::EntityKind;
use super::moderation_status::ModerationStatus;
use super::role_model::Role;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// ロール変更申請
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "role_change_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub user_id: Uuid,

    pub requested_role: Role,

    #[sea_orm(column_type = "Text")]
    pub reason: String,

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
        belongs_to = "super::user_model::Entity",
        from = "Column::UserId",
        to = "super::user_model::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

crate::impl_moderated_record!(Model, EntityKind::RoleChangeRequest, owner = user_id);
