// scamwatch-backend/src/domain/case_model.rs

use super::entity_kind::EntityKind;
use super::moderation_status::ModerationStatus;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 法的案件
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "legal_cases")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub officer_id: Uuid,

    #[sea_orm(unique)]
    pub case_number: String,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    #[sea_orm(nullable)]
    pub victim_name: Option<String>,

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
    #[sea_orm(has_many = "super::case_document_model::Entity")]
    Documents,

    #[sea_orm(has_many = "super::case_evidence_model::Entity")]
    Evidence,
}

impl Related<super::case_document_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Documents.def()
    }
}

impl Related<super::case_evidence_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Evidence.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

crate::impl_moderated_record!(Model, EntityKind::Case, owner = officer_id);
