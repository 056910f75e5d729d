// scamwatch-backend/src/domain/record_filter.rs

use super::moderated_record::ModeratedRecord;
use super::moderation_status::ModerationStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 100;

/// 呼び出し側が指定する一覧の絞り込み条件
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFilter {
    pub status: Option<ModerationStatus>,
    pub owner_id: Option<Uuid>,
    pub is_active: Option<bool>,
    /// コメントの場合はアラートID
    pub parent_id: Option<Uuid>,
    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl RecordFilter {
    pub fn with_status(mut self, status: ModerationStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_owner(mut self, owner_id: Uuid) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    pub fn with_parent(mut self, parent_id: Uuid) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// ページサイズを制限（過大なページサイズを防止）
    pub fn page_size(&self) -> u64 {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    pub fn page_offset(&self) -> u64 {
        self.offset.unwrap_or(0)
    }
}

/// ロールごとの閲覧上限
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityScope {
    Unrestricted,
    OwnOnly(Uuid),
    /// 承認済みかつ有効（期限切れを除く）
    Published,
    OwnOrPublished(Uuid),
}

/// 閲覧上限と呼び出し側の条件を AND で合成した一覧条件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingPredicate {
    pub scope: VisibilityScope,
    pub filter: RecordFilter,
    pub now: DateTime<Utc>,
}

impl ListingPredicate {
    pub fn new(scope: VisibilityScope, filter: RecordFilter, now: DateTime<Utc>) -> Self {
        Self { scope, filter, now }
    }

    /// 閲覧上限のみの判定（単一レコード取得にも使う）
    pub fn scope_allows<M: ModeratedRecord>(&self, record: &M) -> bool {
        match self.scope {
            VisibilityScope::Unrestricted => true,
            VisibilityScope::OwnOnly(owner) => record.is_owned_by(owner),
            VisibilityScope::Published => record.is_published(self.now),
            VisibilityScope::OwnOrPublished(owner) => {
                record.is_owned_by(owner) || record.is_published(self.now)
            }
        }
    }

    pub fn matches<M: ModeratedRecord>(&self, record: &M) -> bool {
        if !self.scope_allows(record) {
            return false;
        }

        let state = record.moderation();
        let filter = &self.filter;
        filter.status.map_or(true, |s| state.status == s)
            && filter.owner_id.map_or(true, |o| record.owner_id() == o)
            && filter.is_active.map_or(true, |a| state.is_active == a)
            && filter
                .parent_id
                .map_or(true, |p| record.parent_id() == Some(p))
            && filter
                .created_after
                .map_or(true, |after| record.created_at() > after)
            && filter
                .created_before
                .map_or(true, |before| record.created_at() < before)
    }
}
