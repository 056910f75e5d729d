// scamwatch-backend/src/service/visibility_filter.rs

use crate::domain::alert_model::Model as Alert;
use crate::domain::entity_kind::{Audience, EntityKind};
use crate::domain::moderation_status::ModerationStatus;
use crate::domain::record_filter::{ListingPredicate, RecordFilter, VisibilityScope};
use crate::domain::role_model::{Principal, Role};
use crate::error::{AppError, AppResult};
use crate::repository::moderated_repository::ModeratedRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// ロールと種別から閲覧上限を決める
///
/// 未認証の読み取りは公開読み取りを許可する種別に限り、公開済みレコードのみ。
pub fn scope_for(principal: Option<&Principal>, kind: EntityKind) -> AppResult<VisibilityScope> {
    let descriptor = kind.descriptor();

    let Some(principal) = principal else {
        if descriptor.public_read {
            return Ok(VisibilityScope::Published);
        }
        return Err(AppError::Unauthenticated(format!(
            "Authentication is required to read {} records",
            kind
        )));
    };

    let scope = match (principal.role, descriptor.audience) {
        (Role::Admin, _) => VisibilityScope::Unrestricted,
        (Role::Officer, Audience::Investigative) => VisibilityScope::Unrestricted,
        (Role::Officer, Audience::Shared) => VisibilityScope::OwnOrPublished(principal.id),
        (Role::Officer, Audience::OwnerScoped) => VisibilityScope::OwnOnly(principal.id),
        (Role::User, Audience::Investigative) => VisibilityScope::OwnOnly(principal.id),
        (Role::User, Audience::Shared) => VisibilityScope::Published,
        (Role::User, Audience::OwnerScoped) => VisibilityScope::OwnOnly(principal.id),
    };
    Ok(scope)
}

/// 閲覧上限と呼び出し側の条件を合成する
///
/// 呼び出し側の条件は常に AND で結合されるため上限を広げることはない。
/// 上限の外側だけを明示的に要求した場合は Forbidden を返す。
pub fn build_filter(
    principal: Option<&Principal>,
    kind: EntityKind,
    caller_filter: RecordFilter,
    now: DateTime<Utc>,
) -> AppResult<ListingPredicate> {
    let scope = scope_for(principal, kind)?;

    match scope {
        VisibilityScope::Published => {
            if let Some(status) = caller_filter.status {
                if status != ModerationStatus::Approved {
                    return Err(AppError::Forbidden(format!(
                        "Listing {} records with status {} is not permitted",
                        kind, status
                    )));
                }
            }
            if caller_filter.is_active == Some(false) {
                return Err(AppError::Forbidden(format!(
                    "Listing inactive {} records is not permitted",
                    kind
                )));
            }
        }
        VisibilityScope::OwnOnly(owner) => {
            if let Some(requested) = caller_filter.owner_id {
                if requested != owner {
                    return Err(AppError::Forbidden(format!(
                        "Listing other users' {} records is not permitted",
                        kind
                    )));
                }
            }
        }
        // 自分のもの OR 公開済みの場合は AND 合成による絞り込みで十分
        VisibilityScope::OwnOrPublished(_) | VisibilityScope::Unrestricted => {}
    }

    Ok(ListingPredicate::new(scope, caller_filter, now))
}

/// 子レコードの可視性を親レコードの可視性で絞るための判定
#[async_trait]
pub trait ParentGate: Send + Sync {
    async fn parent_visible(&self, principal: Option<&Principal>, parent_id: Uuid)
        -> AppResult<bool>;
}

/// コメントの親アラートが閲覧上限の内側にあるか
pub struct AlertParentGate {
    alerts: Arc<dyn ModeratedRepository<Alert>>,
}

impl AlertParentGate {
    pub fn new(alerts: Arc<dyn ModeratedRepository<Alert>>) -> Self {
        Self { alerts }
    }
}

#[async_trait]
impl ParentGate for AlertParentGate {
    async fn parent_visible(
        &self,
        principal: Option<&Principal>,
        parent_id: Uuid,
    ) -> AppResult<bool> {
        let scope = scope_for(principal, EntityKind::Alert)?;
        let predicate = ListingPredicate::new(scope, RecordFilter::default(), Utc::now());
        Ok(self
            .alerts
            .find_by_id(parent_id)
            .await?
            .is_some_and(|alert| predicate.scope_allows(&alert)))
    }
}
