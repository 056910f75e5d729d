// scamwatch-backend/src/repository/case_cascade_repository.rs

use crate::domain::case_document_model::{self, Entity as CaseDocumentEntity};
use crate::domain::case_evidence_model::{self, Entity as CaseEvidenceEntity};
use crate::domain::case_model::{self, Entity as CaseEntity};
use crate::domain::moderation_status::ModerationStatus;
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DatabaseTransaction, DbConn, DbErr, EntityTrait, QueryFilter, TransactionTrait,
};
use serde::Serialize;
use uuid::Uuid;

/// 連鎖削除で消えた子レコードの件数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CascadeOutcome {
    pub documents_removed: u64,
    pub evidence_removed: u64,
}

/// 案件と子レコード（書類・証拠品）を一括で削除するインターフェース
///
/// 実装は全体を一つのトランザクションで行い、途中で失敗した場合は
/// 案件も子レコードも呼び出し前の状態のまま残すこと。
#[async_trait]
pub trait CascadeRepository: Send + Sync {
    async fn delete_case_with_children(
        &self,
        case_id: Uuid,
        expected_status: ModerationStatus,
        expected_version: i32,
    ) -> AppResult<CascadeOutcome>;
}

pub struct SeaOrmCascadeRepository {
    db: DbConn,
}

impl SeaOrmCascadeRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    async fn delete_children(
        txn: &DatabaseTransaction,
        case_id: Uuid,
    ) -> Result<CascadeOutcome, DbErr> {
        let evidence = CaseEvidenceEntity::delete_many()
            .filter(case_evidence_model::Column::CaseId.eq(case_id))
            .exec(txn)
            .await?;
        let documents = CaseDocumentEntity::delete_many()
            .filter(case_document_model::Column::CaseId.eq(case_id))
            .exec(txn)
            .await?;

        Ok(CascadeOutcome {
            documents_removed: documents.rows_affected,
            evidence_removed: evidence.rows_affected,
        })
    }
}

#[async_trait]
impl CascadeRepository for SeaOrmCascadeRepository {
    async fn delete_case_with_children(
        &self,
        case_id: Uuid,
        expected_status: ModerationStatus,
        expected_version: i32,
    ) -> AppResult<CascadeOutcome> {
        let txn = self.db.begin().await?;

        let outcome = match Self::delete_children(&txn, case_id).await {
            Ok(outcome) => outcome,
            Err(e) => {
                txn.rollback().await?;
                return Err(AppError::CascadeFailure(format!(
                    "Failed to delete children of case {}: {}",
                    case_id, e
                )));
            }
        };

        let deleted = match CaseEntity::delete_many()
            .filter(case_model::Column::Id.eq(case_id))
            .filter(case_model::Column::Status.eq(expected_status))
            .filter(case_model::Column::Version.eq(expected_version))
            .exec(&txn)
            .await
        {
            Ok(result) => result.rows_affected,
            Err(e) => {
                txn.rollback().await?;
                return Err(AppError::CascadeFailure(format!(
                    "Failed to delete case {}: {}",
                    case_id, e
                )));
            }
        };

        if deleted == 0 {
            // 読み取り後に案件が書き換えられていたので子レコードの削除ごと取り消す
            txn.rollback().await?;
            return Err(AppError::Conflict(format!(
                "case {} was modified concurrently",
                case_id
            )));
        }

        txn.commit().await?;
        Ok(outcome)
    }
}
