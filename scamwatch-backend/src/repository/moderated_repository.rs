// scamwatch-backend/src/repository/moderated_repository.rs

use crate::domain::moderated_record::ModeratedRecord;
use crate::domain::moderation_status::ModerationStatus;
use crate::domain::record_filter::{ListingPredicate, VisibilityScope};
use crate::domain::{
    alert_model, case_model, comment_model, report_model, role_change_request_model,
};
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{entity::*, query::*, ActiveValue, Condition, DbConn, IntoActiveModel};
use sea_orm::{Iterable, PaginatorTrait, QueryFilter, QueryOrder};
use std::marker::PhantomData;
use uuid::Uuid;

/// モデレーション対象レコードの永続化インターフェース
///
/// 更新と削除は読み取り時のステータスと版番号を条件にした条件付き書き込みで、
/// 保存済みのレコードがその後に書き換えられていれば `AppError::Conflict` を返す。
#[async_trait]
pub trait ModeratedRepository<M: ModeratedRecord>: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<M>>;

    async fn find_matching(&self, predicate: &ListingPredicate) -> AppResult<Vec<M>>;

    async fn insert(&self, record: M) -> AppResult<M>;

    /// `record.version()` は読み取り時の版。成功すると版を一つ進めたレコードを返す
    async fn compare_and_set(&self, record: M, expected: ModerationStatus) -> AppResult<M>;

    async fn delete_if_unchanged(
        &self,
        id: Uuid,
        expected: ModerationStatus,
        version: i32,
    ) -> AppResult<()>;

    async fn count_pending_for_owner(&self, owner_id: Uuid) -> AppResult<u64>;

    async fn count_by_status(&self, status: ModerationStatus) -> AppResult<u64>;
}

/// SeaORMエンティティとモデレーション列の対応付け
pub trait ModeratedEntity: EntityTrait {
    type Active: ActiveModelTrait<Entity = Self> + ActiveModelBehavior + From<Self::Model> + Send;

    fn id_column() -> Self::Column;
    fn owner_column() -> Self::Column;
    fn status_column() -> Self::Column;
    fn is_active_column() -> Self::Column;
    fn created_at_column() -> Self::Column;
    fn version_column() -> Self::Column;

    fn expires_at_column() -> Option<Self::Column> {
        None
    }

    fn parent_column() -> Option<Self::Column> {
        None
    }
}

macro_rules! impl_moderated_entity {
    ($module:ident, owner = $owner:ident $(, expires = $expires:ident)? $(, parent = $parent:ident)? $(,)?) => {
        impl ModeratedEntity for $module::Entity {
            type Active = $module::ActiveModel;

            fn id_column() -> Self::Column {
                $module::Column::Id
            }

            fn owner_column() -> Self::Column {
                $module::Column::$owner
            }

            fn status_column() -> Self::Column {
                $module::Column::Status
            }

            fn is_active_column() -> Self::Column {
                $module::Column::IsActive
            }

            fn created_at_column() -> Self::Column {
                $module::Column::CreatedAt
            }

            fn version_column() -> Self::Column {
                $module::Column::Version
            }

            $(
            fn expires_at_column() -> Option<Self::Column> {
                Some($module::Column::$expires)
            }
            )?

            $(
            fn parent_column() -> Option<Self::Column> {
                Some($module::Column::$parent)
            }
            )?
        }
    };
}

impl_moderated_entity!(report_model, owner = ReporterId);
impl_moderated_entity!(alert_model, owner = CreatedBy, expires = ExpiresAt);
impl_moderated_entity!(case_model, owner = OfficerId);
impl_moderated_entity!(comment_model, owner = AuthorId, parent = AlertId);
impl_moderated_entity!(role_change_request_model, owner = UserId);

/// 全カラムを Set 扱いにする（Model から変換した ActiveModel は Unchanged のため）
pub(crate) fn mark_all_set<A: ActiveModelTrait>(mut active: A) -> A {
    for column in <A::Entity as EntityTrait>::Column::iter() {
        if let ActiveValue::Unchanged(value) = active.get(column) {
            active.set(column, value);
        }
    }
    active
}

fn published_condition<E: ModeratedEntity>(now: DateTime<Utc>) -> Condition {
    let mut condition = Condition::all()
        .add(E::status_column().eq(ModerationStatus::Approved))
        .add(E::is_active_column().eq(true));

    if let Some(expires_at) = E::expires_at_column() {
        condition = condition.add(
            Condition::any()
                .add(expires_at.is_null())
                .add(expires_at.gt(now)),
        );
    }

    condition
}

/// 一覧条件をSQLの条件式に変換する
pub fn predicate_condition<E: ModeratedEntity>(predicate: &ListingPredicate) -> Condition {
    let scope = match predicate.scope {
        VisibilityScope::Unrestricted => Condition::all(),
        VisibilityScope::OwnOnly(owner) => Condition::all().add(E::owner_column().eq(owner)),
        VisibilityScope::Published => published_condition::<E>(predicate.now),
        VisibilityScope::OwnOrPublished(owner) => Condition::any()
            .add(E::owner_column().eq(owner))
            .add(published_condition::<E>(predicate.now)),
    };

    let filter = &predicate.filter;
    let mut conditions = Condition::all().add(scope);

    if let Some(status) = filter.status {
        conditions = conditions.add(E::status_column().eq(status));
    }
    if let Some(owner_id) = filter.owner_id {
        conditions = conditions.add(E::owner_column().eq(owner_id));
    }
    if let Some(is_active) = filter.is_active {
        conditions = conditions.add(E::is_active_column().eq(is_active));
    }
    if let Some(parent_id) = filter.parent_id {
        conditions = match E::parent_column() {
            Some(column) => conditions.add(column.eq(parent_id)),
            // 親を持たない種別に親IDを指定した場合は何も一致しない
            None => conditions.add(E::id_column().is_null()),
        };
    }
    if let Some(created_after) = filter.created_after {
        conditions = conditions.add(E::created_at_column().gt(created_after));
    }
    if let Some(created_before) = filter.created_before {
        conditions = conditions.add(E::created_at_column().lt(created_before));
    }

    conditions
}

pub struct SeaOrmModeratedRepository<E> {
    db: DbConn,
    _entity: PhantomData<fn() -> E>,
}

impl<E> SeaOrmModeratedRepository<E> {
    pub fn new(db: DbConn) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }
}

#[async_trait]
impl<E> ModeratedRepository<E::Model> for SeaOrmModeratedRepository<E>
where
    E: ModeratedEntity,
    E::Model: ModeratedRecord + IntoActiveModel<E::Active>,
{
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<E::Model>> {
        Ok(E::find()
            .filter(E::id_column().eq(id))
            .one(&self.db)
            .await?)
    }

    async fn find_matching(&self, predicate: &ListingPredicate) -> AppResult<Vec<E::Model>> {
        let records = E::find()
            .filter(predicate_condition::<E>(predicate))
            .order_by_desc(E::created_at_column())
            .limit(predicate.filter.page_size())
            .offset(predicate.filter.page_offset())
            .all(&self.db)
            .await?;
        Ok(records)
    }

    async fn insert(&self, record: E::Model) -> AppResult<E::Model> {
        let active = mark_all_set(E::Active::from(record.clone()));
        E::insert(active).exec_without_returning(&self.db).await?;
        Ok(record)
    }

    async fn compare_and_set(
        &self,
        mut record: E::Model,
        expected: ModerationStatus,
    ) -> AppResult<E::Model> {
        let id = record.id();
        let read_version = record.version();
        record.set_version(read_version + 1);
        let active = mark_all_set(E::Active::from(record.clone()));

        // 読み取り後に誰も書き込んでいない場合のみ書き込む
        let result = E::update_many()
            .set(active)
            .filter(E::id_column().eq(id))
            .filter(E::status_column().eq(expected))
            .filter(E::version_column().eq(read_version))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::Conflict(format!(
                "{} {} was modified concurrently",
                <E::Model as ModeratedRecord>::KIND,
                id
            )));
        }
        Ok(record)
    }

    async fn delete_if_unchanged(
        &self,
        id: Uuid,
        expected: ModerationStatus,
        version: i32,
    ) -> AppResult<()> {
        let result = E::delete_many()
            .filter(E::id_column().eq(id))
            .filter(E::status_column().eq(expected))
            .filter(E::version_column().eq(version))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::Conflict(format!(
                "{} {} was modified concurrently",
                <E::Model as ModeratedRecord>::KIND,
                id
            )));
        }
        Ok(())
    }

    async fn count_pending_for_owner(&self, owner_id: Uuid) -> AppResult<u64> {
        Ok(E::find()
            .filter(E::owner_column().eq(owner_id))
            .filter(E::status_column().eq(ModerationStatus::Pending))
            .count(&self.db)
            .await?)
    }

    async fn count_by_status(&self, status: ModerationStatus) -> AppResult<u64> {
        Ok(E::find()
            .filter(E::status_column().eq(status))
            .count(&self.db)
            .await?)
    }
}
