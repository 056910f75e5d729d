// scamwatch-backend/src/domain/report_model.rs

use super::entity_kind::EntityKind;
use super::moderation_status::ModerationStatus;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 詐欺被害の通報
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "scam_reports")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub reporter_id: Uuid,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    pub scam_type: String,

    #[sea_orm(nullable)]
    pub scammer_contact: Option<String>,

    #[sea_orm(nullable)]
    pub amount_lost_cents: Option<i64>,

    #[sea_orm(nullable)]
    pub incident_date: Option<DateTime<Utc>>,

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
        from = "Column::ReporterId",
        to = "super::user_model::Column::Id"
    )]
    Reporter,
}

impl Related<super::user_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reporter.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

crate::impl_moderated_record!(Model, EntityKind::Report, owner = reporter_id);
