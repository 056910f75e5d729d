// scamwatch-backend/src/domain/alert_model.rs

use super::entity_kind::EntityKind;
use super::moderation_status::ModerationStatus;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// アラートの深刻度
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    #[sea_orm(string_value = "low")]
    Low,
    #[sea_orm(string_value = "medium")]
    Medium,
    #[sea_orm(string_value = "high")]
    High,
    #[sea_orm(string_value = "critical")]
    Critical,
}

impl Default for AlertSeverity {
    fn default() -> Self {
        Self::Medium
    }
}

/// 警察官・管理者が発信する詐欺警報
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "scam_alerts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub created_by: Uuid,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    pub severity: AlertSeverity,

    #[sea_orm(nullable)]
    pub region: Option<String>,

    #[sea_orm(nullable)]
    pub expires_at: Option<DateTime<Utc>>,

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
    #[sea_orm(has_many = "super::comment_model::Entity")]
    Comments,
}

impl Related<super::comment_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

crate::impl_moderated_record!(
    Model,
    EntityKind::Alert,
    owner = created_by,
    expires = expires_at
);
