// scamwatch-backend/src/domain/case_document_model.rs

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 案件に添付される書類のメタデータ（ファイル本体は外部ストレージ）
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "case_documents")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub case_id: Uuid,

    pub uploaded_by: Uuid,

    pub file_name: String,

    pub file_size: i64,

    pub mime_type: String,

    pub file_uri: String,

    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::case_model::Entity",
        from = "Column::CaseId",
        to = "super::case_model::Column::Id"
    )]
    Case,
}

impl Related<super::case_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Case.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
