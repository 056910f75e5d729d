// scamwatch-backend/src/repository/case_file_repository.rs

use crate::domain::case_document_model::{self, Entity as CaseDocumentEntity};
use crate::domain::case_evidence_model::{self, Entity as CaseEvidenceEntity};
use crate::error::AppResult;
use crate::repository::moderated_repository::mark_all_set;
use async_trait::async_trait;
use sea_orm::{ColumnTrait, DbConn, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder};
use uuid::Uuid;

/// 案件の書類・証拠品メタデータの永続化インターフェース
#[async_trait]
pub trait CaseFileRepository: Send + Sync {
    async fn insert_document(
        &self,
        document: case_document_model::Model,
    ) -> AppResult<case_document_model::Model>;

    async fn insert_evidence(
        &self,
        evidence: case_evidence_model::Model,
    ) -> AppResult<case_evidence_model::Model>;

    async fn find_document(&self, id: Uuid) -> AppResult<Option<case_document_model::Model>>;

    async fn find_evidence(&self, id: Uuid) -> AppResult<Option<case_evidence_model::Model>>;

    async fn list_documents(&self, case_id: Uuid) -> AppResult<Vec<case_document_model::Model>>;

    async fn list_evidence(&self, case_id: Uuid) -> AppResult<Vec<case_evidence_model::Model>>;

    /// 削除できた場合は true
    async fn delete_document(&self, id: Uuid) -> AppResult<bool>;

    async fn delete_evidence(&self, id: Uuid) -> AppResult<bool>;
}

pub struct SeaOrmCaseFileRepository {
    db: DbConn,
}

impl SeaOrmCaseFileRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CaseFileRepository for SeaOrmCaseFileRepository {
    async fn insert_document(
        &self,
        document: case_document_model::Model,
    ) -> AppResult<case_document_model::Model> {
        let active = mark_all_set(document.clone().into_active_model());
        CaseDocumentEntity::insert(active)
            .exec_without_returning(&self.db)
            .await?;
        Ok(document)
    }

    async fn insert_evidence(
        &self,
        evidence: case_evidence_model::Model,
    ) -> AppResult<case_evidence_model::Model> {
        let active = mark_all_set(evidence.clone().into_active_model());
        CaseEvidenceEntity::insert(active)
            .exec_without_returning(&self.db)
            .await?;
        Ok(evidence)
    }

    async fn find_document(&self, id: Uuid) -> AppResult<Option<case_document_model::Model>> {
        Ok(CaseDocumentEntity::find_by_id(id).one(&self.db).await?)
    }

    async fn find_evidence(&self, id: Uuid) -> AppResult<Option<case_evidence_model::Model>> {
        Ok(CaseEvidenceEntity::find_by_id(id).one(&self.db).await?)
    }

    async fn list_documents(&self, case_id: Uuid) -> AppResult<Vec<case_document_model::Model>> {
        Ok(CaseDocumentEntity::find()
            .filter(case_document_model::Column::CaseId.eq(case_id))
            .order_by_asc(case_document_model::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    async fn list_evidence(&self, case_id: Uuid) -> AppResult<Vec<case_evidence_model::Model>> {
        Ok(CaseEvidenceEntity::find()
            .filter(case_evidence_model::Column::CaseId.eq(case_id))
            .order_by_asc(case_evidence_model::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    async fn delete_document(&self, id: Uuid) -> AppResult<bool> {
        let result = CaseDocumentEntity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn delete_evidence(&self, id: Uuid) -> AppResult<bool> {
        let result = CaseEvidenceEntity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}
