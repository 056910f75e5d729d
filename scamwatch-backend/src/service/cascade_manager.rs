// scamwatch-backend/src/service/cascade_manager.rs

use crate::domain::moderation_status::ModerationStatus;
use crate::error::{AppError, AppResult};
use crate::log_with_context;
use crate::repository::case_cascade_repository::{CascadeOutcome, CascadeRepository};
use std::sync::Arc;
use uuid::Uuid;

/// 案件と子レコードの連鎖削除
pub struct CascadeManager {
    repo: Arc<dyn CascadeRepository>,
}

impl CascadeManager {
    pub fn new(repo: Arc<dyn CascadeRepository>) -> Self {
        Self { repo }
    }

    /// 子レコードを消してから案件を消す。失敗時は何も消えない
    pub async fn delete_with_children(
        &self,
        case_id: Uuid,
        expected_status: ModerationStatus,
        expected_version: i32,
    ) -> AppResult<CascadeOutcome> {
        log_with_context!(
            tracing::Level::DEBUG,
            "Deleting case with children",
            "case_id" => case_id,
            "expected_status" => expected_status,
            "expected_version" => expected_version
        );

        match self
            .repo
            .delete_case_with_children(case_id, expected_status, expected_version)
            .await
        {
            Ok(outcome) => {
                log_with_context!(
                    tracing::Level::INFO,
                    "Case deleted with children",
                    "case_id" => case_id,
                    "documents_removed" => outcome.documents_removed,
                    "evidence_removed" => outcome.evidence_removed
                );
                Ok(outcome)
            }
            Err(e @ AppError::Conflict(_)) => {
                log_with_context!(
                    tracing::Level::WARN,
                    "Case changed before cascade delete",
                    "case_id" => case_id
                );
                Err(e)
            }
            Err(e) => {
                log_with_context!(
                    tracing::Level::ERROR,
                    "Cascade delete failed",
                    "case_id" => case_id,
                    "error" => &e
                );
                Err(e)
            }
        }
    }
}
