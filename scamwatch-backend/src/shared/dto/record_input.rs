// scamwatch-backend/src/shared/dto/record_input.rs

use crate::domain::moderated_record::{ModerationState, ModeratedRecord};
use chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

/// 作成リクエストからレコードを組み立てる
pub trait NewRecord<M: ModeratedRecord>: Validate + Send {
    fn into_record(self, id: Uuid, owner_id: Uuid, state: ModerationState, now: DateTime<Utc>)
        -> M;
}

/// 更新リクエストを既存レコードに適用する
pub trait RecordPatch<M: ModeratedRecord>: Validate + Send {
    fn apply_to(self, record: &mut M);

    /// 変更フィールドが一つもないか
    fn is_empty(&self) -> bool;
}
