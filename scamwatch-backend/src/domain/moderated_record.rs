// scamwatch-backend/src/domain/moderated_record.rs

use super::entity_kind::EntityKind;
use super::moderation_status::ModerationStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// モデレーション関連のフィールド一式
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModerationState {
    pub status: ModerationStatus,
    pub moderator_id: Option<Uuid>,
    pub moderator_notes: Option<String>,
    pub is_active: bool,
}

impl ModerationState {
    pub fn pending() -> Self {
        Self {
            status: ModerationStatus::Pending,
            moderator_id: None,
            moderator_notes: None,
            is_active: true,
        }
    }

    pub fn approved_by(moderator_id: Option<Uuid>) -> Self {
        Self {
            status: ModerationStatus::Approved,
            moderator_id,
            moderator_notes: None,
            is_active: true,
        }
    }
}

/// 全種別に共通するモデレーション対象レコードの形
///
/// 各エンティティの `Model` がこれを実装し、ワークフローエンジンは
/// この trait だけを通してレコードを扱う。
pub trait ModeratedRecord: Clone + Send + Sync + 'static {
    const KIND: EntityKind;

    fn id(&self) -> Uuid;
    fn owner_id(&self) -> Uuid;
    fn moderation(&self) -> ModerationState;
    fn set_moderation(&mut self, state: ModerationState);
    fn expires_at(&self) -> Option<DateTime<Utc>> {
        None
    }
    /// 親レコード（コメントの場合はアラート）
    fn parent_id(&self) -> Option<Uuid> {
        None
    }
    fn created_at(&self) -> DateTime<Utc>;
    fn touch(&mut self, now: DateTime<Utc>);

    /// 読み取り時点の版番号。条件付き書き込みはこの値が一致するときだけ成功する
    fn version(&self) -> i32;
    fn set_version(&mut self, version: i32);

    fn status(&self) -> ModerationStatus {
        self.moderation().status
    }

    fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner_id() == user_id
    }

    /// 承認済みかつ有効で、期限切れでない
    fn is_published(&self, now: DateTime<Utc>) -> bool {
        let state = self.moderation();
        state.status == ModerationStatus::Approved
            && state.is_active
            && self.expires_at().map_or(true, |expires| expires > now)
    }
}

/// モデルに `ModeratedRecord` を実装するためのマクロ
///
/// 対象モデルは `id`, `owner_id`, `status`, `moderator_id`, `moderator_notes`,
/// `is_active`, `created_at`, `updated_at`, `version` フィールドを持つこと。
#[macro_export]
macro_rules! impl_moderated_record {
    ($model:ty, $kind:expr, owner = $owner:ident $(, expires = $expires:ident)? $(, parent = $parent:ident)? $(,)?) => {
        impl $crate::domain::moderated_record::ModeratedRecord for $model {
            const KIND: $crate::domain::entity_kind::EntityKind = $kind;

            fn id(&self) -> uuid::Uuid {
                self.id
            }

            fn owner_id(&self) -> uuid::Uuid {
                self.$owner
            }

            fn moderation(&self) -> $crate::domain::moderated_record::ModerationState {
                $crate::domain::moderated_record::ModerationState {
                    status: self.status,
                    moderator_id: self.moderator_id,
                    moderator_notes: self.moderator_notes.clone(),
                    is_active: self.is_active,
                }
            }

            fn set_moderation(&mut self, state: $crate::domain::moderated_record::ModerationState) {
                self.status = state.status;
                self.moderator_id = state.moderator_id;
                self.moderator_notes = state.moderator_notes;
                self.is_active = state.is_active;
            }

            $(
            fn expires_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
                self.$expires
            }
            )?

            $(
            fn parent_id(&self) -> Option<uuid::Uuid> {
                Some(self.$parent)
            }
            )?

            fn created_at(&self) -> chrono::DateTime<chrono::Utc> {
                self.created_at
            }

            fn touch(&mut self, now: chrono::DateTime<chrono::Utc>) {
                self.updated_at = now;
            }

            fn version(&self) -> i32 {
                self.version
            }

            fn set_version(&mut self, version: i32) {
                self.version = version;
            }
        }
    };
}
