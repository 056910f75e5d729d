// scamwatch-backend/src/service/ownership_guard.rs

use crate::domain::moderated_record::ModeratedRecord;
use crate::domain::moderation_status::ModerationStatus;
use crate::domain::role_model::Principal;
use crate::error::{AppError, AppResult};
use crate::log_with_context;
use serde::Serialize;

/// レコードに対する変更操作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationAction {
    Edit,
    Delete,
    Moderate,
    ToggleActive,
}

impl MutationAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Edit => "edit",
            Self::Delete => "delete",
            Self::Moderate => "moderate",
            Self::ToggleActive => "toggle_active",
        }
    }
}

/// 拒否理由コード
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    AdminOnly,
    KindNotModerated,
    NotOwner,
    ApprovedImmutable,
    RejectedImmutable,
    NotPending,
    RecordClosed,
    ApprovalFinal,
}

impl DenyReason {
    pub fn message(&self) -> &'static str {
        match self {
            Self::AdminOnly => "Only administrators may perform this action",
            Self::KindNotModerated => "This kind of record is not subject to moderation",
            Self::NotOwner => "Only the owner may modify this record",
            Self::ApprovedImmutable => "Approved records cannot be modified by their owner",
            Self::RejectedImmutable => "Rejected records cannot be modified by their owner",
            Self::NotPending => "Only pending records can be deleted by their owner",
            Self::RecordClosed => "Closed records cannot be modified",
            Self::ApprovalFinal => "Approved records of this kind cannot be moderated again",
        }
    }
}

/// 権限判定の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub allowed: bool,
    pub reason: Option<DenyReason>,
}

impl Decision {
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    pub fn deny(reason: DenyReason) -> Self {
        Self {
            allowed: false,
            reason: Some(reason),
        }
    }

    /// 拒否の場合は Forbidden に変換
    pub fn into_result(self) -> AppResult<()> {
        match self.reason {
            Some(reason) if !self.allowed => Err(AppError::Forbidden(reason.message().to_string())),
            _ => Ok(()),
        }
    }
}

/// プリンシパルがレコードに対して操作できるかを判定する
pub fn can_mutate<M: ModeratedRecord>(
    principal: &Principal,
    record: &M,
    action: MutationAction,
) -> Decision {
    let descriptor = M::KIND.descriptor();
    let status = record.status();

    match action {
        MutationAction::Moderate => {
            if !principal.is_admin() {
                return Decision::deny(DenyReason::AdminOnly);
            }
            if !descriptor.moderated {
                return Decision::deny(DenyReason::KindNotModerated);
            }
            if status == ModerationStatus::Closed {
                return Decision::deny(DenyReason::RecordClosed);
            }
            // ロール変更のように承認が外部に効果を持つ種別は承認で確定する
            if status == ModerationStatus::Approved && descriptor.approval_is_final {
                return Decision::deny(DenyReason::ApprovalFinal);
            }
            return Decision::allow();
        }
        MutationAction::ToggleActive => {
            if !principal.is_admin() {
                return Decision::deny(DenyReason::AdminOnly);
            }
            return Decision::allow();
        }
        MutationAction::Edit | MutationAction::Delete => {}
    }

    // 管理者はすべてのレコードを編集・削除できる
    if principal.is_admin() {
        return Decision::allow();
    }

    if !record.is_owned_by(principal.id) {
        return Decision::deny(DenyReason::NotOwner);
    }

    // モデレーションのない種別は所有者が常に操作できる
    if !descriptor.moderated {
        return Decision::allow();
    }

    match (action, status) {
        (_, ModerationStatus::Pending) => Decision::allow(),
        (_, ModerationStatus::Closed) => Decision::deny(DenyReason::RecordClosed),
        (MutationAction::Delete, _) => Decision::deny(DenyReason::NotPending),
        (_, ModerationStatus::Approved) => {
            if descriptor.forbid_edit_when_approved_for_non_admin {
                Decision::deny(DenyReason::ApprovedImmutable)
            } else {
                Decision::allow()
            }
        }
        (_, ModerationStatus::Rejected) => {
            if descriptor.allow_edit_when_rejected {
                Decision::allow()
            } else {
                Decision::deny(DenyReason::RejectedImmutable)
            }
        }
    }
}

/// 判定して拒否なら WARN を出して Forbidden を返す
pub fn enforce<M: ModeratedRecord>(
    principal: &Principal,
    record: &M,
    action: MutationAction,
) -> AppResult<()> {
    let decision = can_mutate(principal, record, action);
    if let Some(reason) = decision.reason {
        log_with_context!(
            tracing::Level::WARN,
            "Mutation denied",
            "kind" => M::KIND,
            "record_id" => record.id(),
            "principal_id" => principal.id,
            "action" => action.as_str(),
            "reason" => reason
        );
    }
    decision.into_result()
}
