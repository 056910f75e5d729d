// scamwatch-backend/src/service/moderation_ledger.rs

use crate::domain::moderated_record::{ModeratedRecord, ModerationState};
use crate::domain::moderation_status::ModerationStatus;
use crate::domain::role_model::Principal;
use crate::error::{AppError, AppResult};
use crate::shared::validation::{normalize_notes, record};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// レコードに付くモデレーション情報
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModerationEntry {
    pub status: ModerationStatus,
    pub moderator_id: Option<Uuid>,
    pub moderator_notes: Option<String>,
}

impl From<ModerationState> for ModerationEntry {
    fn from(state: ModerationState) -> Self {
        Self {
            status: state.status,
            moderator_id: state.moderator_id,
            moderator_notes: state.moderator_notes,
        }
    }
}

/// 承認: モデレーターを記録し、過去のメモは消す
pub fn record_approval(state: &ModerationState, admin: &Principal) -> ModerationState {
    ModerationState {
        status: ModerationStatus::Approved,
        moderator_id: Some(admin.id),
        moderator_notes: None,
        is_active: state.is_active,
    }
}

/// 却下: メモ必須（最大 `record::NOTES_MAX_LENGTH` 文字）
pub fn record_rejection(
    state: &ModerationState,
    admin: &Principal,
    notes: &str,
) -> AppResult<ModerationState> {
    let notes = normalize_notes(Some(notes)).ok_or_else(|| {
        AppError::ValidationError("Moderator notes are required when rejecting".to_string())
    })?;
    if notes.chars().count() as u64 > record::NOTES_MAX_LENGTH {
        return Err(AppError::ValidationError(format!(
            "Moderator notes must be at most {} characters",
            record::NOTES_MAX_LENGTH
        )));
    }

    Ok(ModerationState {
        status: ModerationStatus::Rejected,
        moderator_id: Some(admin.id),
        moderator_notes: Some(notes),
        is_active: state.is_active,
    })
}

/// 所有者の再編集でpendingに戻す
pub fn clear(state: &ModerationState) -> ModerationState {
    ModerationState {
        status: ModerationStatus::Pending,
        moderator_id: None,
        moderator_notes: None,
        is_active: state.is_active,
    }
}

/// モデレーション情報を読めるのは管理者と所有者のみ
pub fn can_read<M: ModeratedRecord>(principal: Option<&Principal>, record: &M) -> bool {
    principal.is_some_and(|p| p.is_admin() || record.is_owned_by(p.id))
}

pub fn read<M: ModeratedRecord>(
    principal: Option<&Principal>,
    record: &M,
) -> AppResult<ModerationEntry> {
    if principal.is_none() {
        return Err(AppError::Unauthenticated(
            "Authentication is required to read moderation details".to_string(),
        ));
    }
    if !can_read(principal, record) {
        return Err(AppError::Forbidden(
            "Moderation details are visible only to administrators and the owner".to_string(),
        ));
    }
    Ok(record.moderation().into())
}

/// 閲覧者に見せないモデレーター情報を取り除く
pub fn redact<M: ModeratedRecord>(principal: Option<&Principal>, mut record: M) -> M {
    if can_read(principal, &record) {
        return record;
    }
    let mut state = record.moderation();
    if state.moderator_id.is_none() && state.moderator_notes.is_none() {
        return record;
    }
    state.moderator_id = None;
    state.moderator_notes = None;
    record.set_moderation(state);
    record
}
