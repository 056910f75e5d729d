// scamwatch-backend/src/service/workflow_engine.rs

use crate::domain::entity_kind::KindDescriptor;
use crate::domain::moderated_record::{ModeratedRecord, ModerationState};
use crate::domain::moderation_status::ModerationStatus;
use crate::domain::record_filter::{ListingPredicate, RecordFilter};
use crate::domain::role_model::{can_create, Principal};
use crate::error::{AppError, AppResult};
use crate::log_with_context;
use crate::repository::case_cascade_repository::CascadeOutcome;
use crate::repository::moderated_repository::ModeratedRepository;
use crate::service::cascade_manager::CascadeManager;
use crate::service::moderation_ledger::{self as ledger, ModerationEntry};
use crate::service::ownership_guard::{enforce, DenyReason, MutationAction};
use crate::service::visibility_filter::{build_filter, scope_for, ParentGate};
use crate::shared::dto::record_input::{NewRecord, RecordPatch};
use crate::shared::validation::normalize_notes;
use chrono::Utc;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// ステータスごとの件数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub pending: u64,
    pub approved: u64,
    pub rejected: u64,
    pub closed: u64,
}

impl StatusCounts {
    pub fn total(&self) -> u64 {
        self.pending + self.approved + self.rejected + self.closed
    }
}

/// pending / approved / rejected のライフサイクルを種別共通で扱うエンジン
///
/// 書き込みはすべて読み取り時のステータスと版番号を条件にした条件付き書き込みで行う。
/// 競合した操作は `AppError::Conflict` で失敗し、先に確定した結果を上書きしない。
pub struct WorkflowEngine<M: ModeratedRecord> {
    repo: Arc<dyn ModeratedRepository<M>>,
    cascade: Option<Arc<CascadeManager>>,
    parent: Option<Arc<dyn ParentGate>>,
}

impl<M: ModeratedRecord> WorkflowEngine<M> {
    pub fn new(repo: Arc<dyn ModeratedRepository<M>>) -> Self {
        Self {
            repo,
            cascade: None,
            parent: None,
        }
    }

    /// 子レコードを持つ種別の削除に使う
    pub fn with_cascade(mut self, cascade: Arc<CascadeManager>) -> Self {
        self.cascade = Some(cascade);
        self
    }

    /// 親レコードが見えない子レコードは存在しないものとして扱う
    pub fn with_parent_gate(mut self, gate: Arc<dyn ParentGate>) -> Self {
        self.parent = Some(gate);
        self
    }

    pub fn descriptor(&self) -> &'static KindDescriptor {
        M::KIND.descriptor()
    }

    // --- 読み取り ---

    pub async fn list(
        &self,
        principal: Option<&Principal>,
        filter: RecordFilter,
    ) -> AppResult<Vec<M>> {
        let predicate = build_filter(principal, M::KIND, filter, Utc::now())?;

        // 親を指定した一覧は親が見えなければ親ごと存在しない扱い
        if let (Some(gate), Some(parent_id)) = (&self.parent, predicate.filter.parent_id) {
            if !gate.parent_visible(principal, parent_id).await? {
                return Err(AppError::NotFound(format!(
                    "Parent record with id {} not found",
                    parent_id
                )));
            }
        }

        let records = self.repo.find_matching(&predicate).await?;
        let records = self.retain_visible_parents(principal, records).await?;

        log_with_context!(
            tracing::Level::DEBUG,
            "Listed records",
            "kind" => M::KIND,
            "count" => records.len()
        );

        Ok(records
            .into_iter()
            .map(|record| ledger::redact(principal, record))
            .collect())
    }

    /// 閲覧できないレコードは存在しないものとして扱う
    pub async fn get(&self, principal: Option<&Principal>, id: Uuid) -> AppResult<M> {
        let record = self.find_visible(principal, id).await?;
        Ok(ledger::redact(principal, record))
    }

    pub async fn moderation_info(
        &self,
        principal: Option<&Principal>,
        id: Uuid,
    ) -> AppResult<ModerationEntry> {
        let principal = require_principal(principal)?;
        let record = self.find_visible(Some(principal), id).await?;
        ledger::read(Some(principal), &record)
    }

    pub async fn status_counts(&self, principal: Option<&Principal>) -> AppResult<StatusCounts> {
        let principal = require_principal(principal)?;
        if !principal.is_admin() {
            return Err(AppError::Forbidden(
                DenyReason::AdminOnly.message().to_string(),
            ));
        }

        Ok(StatusCounts {
            pending: self.repo.count_by_status(ModerationStatus::Pending).await?,
            approved: self.repo.count_by_status(ModerationStatus::Approved).await?,
            rejected: self.repo.count_by_status(ModerationStatus::Rejected).await?,
            closed: self.repo.count_by_status(ModerationStatus::Closed).await?,
        })
    }

    // --- 書き込み ---

    pub async fn create<I: NewRecord<M>>(
        &self,
        principal: Option<&Principal>,
        input: I,
    ) -> AppResult<M> {
        let principal = require_principal(principal)?;
        let descriptor = self.descriptor();

        if !can_create(principal.role, M::KIND) {
            return Err(AppError::Forbidden(format!(
                "Role {} cannot create {} records",
                principal.role,
                M::KIND
            )));
        }

        input.validate()?;

        if descriptor.single_pending_per_owner
            && self.repo.count_pending_for_owner(principal.id).await? > 0
        {
            return Err(AppError::ValidationError(format!(
                "A pending {} already exists for this user",
                M::KIND
            )));
        }

        let state = if !descriptor.moderated {
            ModerationState::approved_by(None)
        } else if principal.is_admin() && descriptor.auto_approve_for_admin {
            ModerationState::approved_by(Some(principal.id))
        } else {
            ModerationState::pending()
        };

        let record = input.into_record(Uuid::new_v4(), principal.id, state, Utc::now());
        let created = self.repo.insert(record).await?;

        log_with_context!(
            tracing::Level::INFO,
            "Record created",
            "kind" => M::KIND,
            "record_id" => created.id(),
            "owner_id" => principal.id,
            "status" => created.status()
        );

        Ok(created)
    }

    pub async fn edit<P: RecordPatch<M>>(
        &self,
        principal: Option<&Principal>,
        id: Uuid,
        patch: P,
    ) -> AppResult<M> {
        let principal = require_principal(principal)?;
        patch.validate()?;
        if patch.is_empty() {
            return Err(AppError::ValidationError("No fields to update".to_string()));
        }

        let mut record = self.find_visible(Some(principal), id).await?;
        enforce(principal, &record, MutationAction::Edit)?;

        let expected = record.status();
        let descriptor = self.descriptor();
        patch.apply_to(&mut record);

        // 所有者による再編集は再審査に戻す
        let resets = !principal.is_admin()
            && descriptor.moderated
            && descriptor.re_edit_resets_status
            && expected.can_reset_to_pending();
        if resets {
            record.set_moderation(ledger::clear(&record.moderation()));
        }
        record.touch(Utc::now());

        let updated = self.repo.compare_and_set(record, expected).await?;

        log_with_context!(
            tracing::Level::INFO,
            "Record updated",
            "kind" => M::KIND,
            "record_id" => id,
            "previous_status" => expected,
            "status" => updated.status()
        );

        Ok(updated)
    }

    pub async fn approve(
        &self,
        principal: Option<&Principal>,
        id: Uuid,
        notes: Option<&str>,
    ) -> AppResult<M> {
        let (record, expected) = self.prepare_approval(principal, id, notes).await?;
        let approved = self.repo.compare_and_set(record, expected).await?;

        log_with_context!(
            tracing::Level::INFO,
            "Record approved",
            "kind" => M::KIND,
            "record_id" => id,
            "moderator_id" => approved.moderation().moderator_id,
            "previous_status" => expected
        );

        Ok(approved)
    }

    /// 承認後のレコードと読み取り時のステータスを返す（書き込みは呼び出し側）
    ///
    /// 承認と同じトランザクションで別の書き込みを行う場合に使う。
    pub async fn prepare_approval(
        &self,
        principal: Option<&Principal>,
        id: Uuid,
        notes: Option<&str>,
    ) -> AppResult<(M, ModerationStatus)> {
        let admin = self.require_moderator(principal)?;
        let mut record = self.find_required(id).await?;
        enforce(admin, &record, MutationAction::Moderate)?;

        let expected = record.status();
        record.set_moderation(ledger::record_approval(&record.moderation(), admin));
        record.touch(Utc::now());

        if normalize_notes(notes).is_some() {
            log_with_context!(
                tracing::Level::DEBUG,
                "Approval notes are not retained",
                "kind" => M::KIND,
                "record_id" => id
            );
        }

        Ok((record, expected))
    }

    pub async fn reject(
        &self,
        principal: Option<&Principal>,
        id: Uuid,
        notes: &str,
    ) -> AppResult<M> {
        let admin = self.require_moderator(principal)?;
        let mut record = self.find_required(id).await?;
        enforce(admin, &record, MutationAction::Moderate)?;

        let expected = record.status();
        let state = ledger::record_rejection(&record.moderation(), admin, notes)?;
        record.set_moderation(state);
        record.touch(Utc::now());

        let rejected = self.repo.compare_and_set(record, expected).await?;

        log_with_context!(
            tracing::Level::INFO,
            "Record rejected",
            "kind" => M::KIND,
            "record_id" => id,
            "moderator_id" => admin.id,
            "previous_status" => expected
        );

        Ok(rejected)
    }

    pub async fn toggle_active(
        &self,
        principal: Option<&Principal>,
        id: Uuid,
        is_active: bool,
    ) -> AppResult<M> {
        let principal = require_principal(principal)?;
        let mut record = self.find_visible(Some(principal), id).await?;
        enforce(principal, &record, MutationAction::ToggleActive)?;

        let mut state = record.moderation();
        if state.is_active == is_active {
            return Ok(record);
        }

        let expected = state.status;
        state.is_active = is_active;
        record.set_moderation(state);
        record.touch(Utc::now());

        let updated = self.repo.compare_and_set(record, expected).await?;

        log_with_context!(
            tracing::Level::INFO,
            "Record active flag changed",
            "kind" => M::KIND,
            "record_id" => id,
            "is_active" => is_active
        );

        Ok(updated)
    }

    /// 子レコードを持つ種別は連鎖削除になる
    pub async fn delete(
        &self,
        principal: Option<&Principal>,
        id: Uuid,
    ) -> AppResult<Option<CascadeOutcome>> {
        let principal = require_principal(principal)?;
        let record = self.find_visible(Some(principal), id).await?;
        enforce(principal, &record, MutationAction::Delete)?;

        let expected = record.status();
        let version = record.version();
        let outcome = if self.descriptor().has_children() {
            let cascade = self.cascade.as_ref().ok_or_else(|| {
                AppError::InternalServerError(format!(
                    "No cascade manager configured for {}",
                    M::KIND
                ))
            })?;
            Some(cascade.delete_with_children(id, expected, version).await?)
        } else {
            self.repo.delete_if_unchanged(id, expected, version).await?;
            None
        };

        log_with_context!(
            tracing::Level::INFO,
            "Record deleted",
            "kind" => M::KIND,
            "record_id" => id,
            "deleted_by" => principal.id
        );

        Ok(outcome)
    }

    // --- 内部 ---

    fn require_moderator<'a>(&self, principal: Option<&'a Principal>) -> AppResult<&'a Principal> {
        let principal = require_principal(principal)?;
        if !self.descriptor().moderated {
            return Err(AppError::Forbidden(
                DenyReason::KindNotModerated.message().to_string(),
            ));
        }
        if !principal.is_admin() {
            return Err(AppError::Forbidden(
                DenyReason::AdminOnly.message().to_string(),
            ));
        }
        Ok(principal)
    }

    async fn find_required(&self, id: Uuid) -> AppResult<M> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found::<M>(id))
    }

    /// 閲覧上限と親レコードの可視性を満たすレコードのみ返す
    async fn find_visible(&self, principal: Option<&Principal>, id: Uuid) -> AppResult<M> {
        let scope = scope_for(principal, M::KIND)?;
        let predicate = ListingPredicate::new(scope, RecordFilter::default(), Utc::now());
        let record = self
            .repo
            .find_by_id(id)
            .await?
            .filter(|record| predicate.scope_allows(record))
            .ok_or_else(|| not_found::<M>(id))?;

        if let (Some(gate), Some(parent_id)) = (&self.parent, record.parent_id()) {
            if !gate.parent_visible(principal, parent_id).await? {
                return Err(not_found::<M>(id));
            }
        }
        Ok(record)
    }

    async fn retain_visible_parents(
        &self,
        principal: Option<&Principal>,
        records: Vec<M>,
    ) -> AppResult<Vec<M>> {
        let Some(gate) = &self.parent else {
            return Ok(records);
        };

        let mut checked: HashMap<Uuid, bool> = HashMap::new();
        let mut visible = Vec::with_capacity(records.len());
        for record in records {
            let Some(parent_id) = record.parent_id() else {
                visible.push(record);
                continue;
            };
            let allowed = match checked.get(&parent_id) {
                Some(allowed) => *allowed,
                None => {
                    let allowed = gate.parent_visible(principal, parent_id).await?;
                    checked.insert(parent_id, allowed);
                    allowed
                }
            };
            if allowed {
                visible.push(record);
            }
        }
        Ok(visible)
    }
}

fn not_found<M: ModeratedRecord>(id: Uuid) -> AppError {
    AppError::NotFound(format!("{} with id {} not found", M::KIND, id))
}

/// 書き込み操作はプリンシパル必須
pub fn require_principal(principal: Option<&Principal>) -> AppResult<&Principal> {
    principal.ok_or_else(|| {
        AppError::Unauthenticated("Authentication is required for this operation".to_string())
    })
}
