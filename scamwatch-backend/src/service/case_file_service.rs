// scamwatch-backend/src/service/case_file_service.rs

use crate::domain::case_document_model::Model as CaseDocument;
use crate::domain::case_evidence_model::Model as CaseEvidence;
use crate::domain::case_model::Model as LegalCase;
use crate::domain::entity_kind::EntityKind;
use crate::domain::record_filter::{ListingPredicate, RecordFilter};
use crate::domain::role_model::Principal;
use crate::error::{AppError, AppResult};
use crate::log_with_context;
use crate::repository::case_file_repository::CaseFileRepository;
use crate::repository::moderated_repository::ModeratedRepository;
use crate::service::ownership_guard::{enforce, MutationAction};
use crate::service::visibility_filter::scope_for;
use crate::service::workflow_engine::require_principal;
use crate::shared::dto::case_file_dto::{AttachDocumentInput, AttachEvidenceInput};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// 案件の書類・証拠品の登録と削除
///
/// 添付・削除は案件の編集として扱い、案件を編集できる者だけが行える。
pub struct CaseFileService {
    cases: Arc<dyn ModeratedRepository<LegalCase>>,
    files: Arc<dyn CaseFileRepository>,
}

impl CaseFileService {
    pub fn new(
        cases: Arc<dyn ModeratedRepository<LegalCase>>,
        files: Arc<dyn CaseFileRepository>,
    ) -> Self {
        Self { cases, files }
    }

    pub async fn attach_document(
        &self,
        principal: Option<&Principal>,
        case_id: Uuid,
        input: AttachDocumentInput,
    ) -> AppResult<CaseDocument> {
        let principal = require_principal(principal)?;
        input.validate()?;
        self.editable_case(principal, case_id).await?;

        let document = CaseDocument {
            id: Uuid::new_v4(),
            case_id,
            uploaded_by: principal.id,
            file_name: input.file_name.trim().to_string(),
            file_size: input.file_size,
            mime_type: input.mime_type,
            file_uri: input.file_uri,
            created_at: Utc::now(),
        };
        let document = self.files.insert_document(document).await?;

        log_with_context!(
            tracing::Level::INFO,
            "Case document attached",
            "case_id" => case_id,
            "document_id" => document.id,
            "uploaded_by" => principal.id
        );

        Ok(document)
    }

    pub async fn attach_evidence(
        &self,
        principal: Option<&Principal>,
        case_id: Uuid,
        input: AttachEvidenceInput,
    ) -> AppResult<CaseEvidence> {
        let principal = require_principal(principal)?;
        input.validate()?;
        self.editable_case(principal, case_id).await?;

        let evidence = CaseEvidence {
            id: Uuid::new_v4(),
            case_id,
            submitted_by: principal.id,
            file_name: input.file_name.trim().to_string(),
            file_size: input.file_size,
            mime_type: input.mime_type,
            file_uri: input.file_uri,
            description: input.description,
            created_at: Utc::now(),
        };
        let evidence = self.files.insert_evidence(evidence).await?;

        log_with_context!(
            tracing::Level::INFO,
            "Case evidence attached",
            "case_id" => case_id,
            "evidence_id" => evidence.id,
            "submitted_by" => principal.id
        );

        Ok(evidence)
    }

    pub async fn list_documents(
        &self,
        principal: Option<&Principal>,
        case_id: Uuid,
    ) -> AppResult<Vec<CaseDocument>> {
        self.visible_case(principal, case_id).await?;
        self.files.list_documents(case_id).await
    }

    pub async fn list_evidence(
        &self,
        principal: Option<&Principal>,
        case_id: Uuid,
    ) -> AppResult<Vec<CaseEvidence>> {
        self.visible_case(principal, case_id).await?;
        self.files.list_evidence(case_id).await
    }

    pub async fn remove_document(
        &self,
        principal: Option<&Principal>,
        case_id: Uuid,
        document_id: Uuid,
    ) -> AppResult<()> {
        let principal = require_principal(principal)?;
        self.editable_case(principal, case_id).await?;

        let belongs = self
            .files
            .find_document(document_id)
            .await?
            .is_some_and(|doc| doc.case_id == case_id);
        if !belongs || !self.files.delete_document(document_id).await? {
            return Err(AppError::NotFound(format!(
                "Document with id {} not found",
                document_id
            )));
        }

        log_with_context!(
            tracing::Level::INFO,
            "Case document removed",
            "case_id" => case_id,
            "document_id" => document_id
        );
        Ok(())
    }

    pub async fn remove_evidence(
        &self,
        principal: Option<&Principal>,
        case_id: Uuid,
        evidence_id: Uuid,
    ) -> AppResult<()> {
        let principal = require_principal(principal)?;
        self.editable_case(principal, case_id).await?;

        let belongs = self
            .files
            .find_evidence(evidence_id)
            .await?
            .is_some_and(|ev| ev.case_id == case_id);
        if !belongs || !self.files.delete_evidence(evidence_id).await? {
            return Err(AppError::NotFound(format!(
                "Evidence with id {} not found",
                evidence_id
            )));
        }

        log_with_context!(
            tracing::Level::INFO,
            "Case evidence removed",
            "case_id" => case_id,
            "evidence_id" => evidence_id
        );
        Ok(())
    }

    async fn visible_case(&self, principal: Option<&Principal>, case_id: Uuid) -> AppResult<LegalCase> {
        let scope = scope_for(principal, EntityKind::Case)?;
        let predicate = ListingPredicate::new(scope, RecordFilter::default(), Utc::now());
        self.cases
            .find_by_id(case_id)
            .await?
            .filter(|case| predicate.scope_allows(case))
            .ok_or_else(|| AppError::NotFound(format!("Case with id {} not found", case_id)))
    }

    async fn editable_case(&self, principal: &Principal, case_id: Uuid) -> AppResult<LegalCase> {
        let case = self.visible_case(Some(principal), case_id).await?;
        enforce(principal, &case, MutationAction::Edit)?;
        Ok(case)
    }
}
