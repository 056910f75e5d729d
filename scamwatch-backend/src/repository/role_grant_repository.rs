// scamwatch-backend/src/repository/role_grant_repository.rs

use crate::domain::moderated_record::ModeratedRecord;
use crate::domain::moderation_status::ModerationStatus;
use crate::domain::role_change_request_model::{
    self, ActiveModel as RequestActiveModel, Entity as RequestEntity, Model as RoleChangeRequest,
};
use crate::domain::user_model::{self, ActiveModel as UserActiveModel, Entity as UserEntity};
use crate::error::{AppError, AppResult};
use crate::repository::moderated_repository::mark_all_set;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, DbConn, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};

/// ロール変更申請の承認とロール付与をまとめて確定するインターフェース
///
/// 実装は両方を一つのトランザクションで書き込み、どちらかが失敗した場合は
/// 申請もユーザーも呼び出し前の状態のまま残すこと。
#[async_trait]
pub trait RoleGrantRepository: Send + Sync {
    /// `approved` は承認状態に書き換えた申請（版番号は読み取り時のまま）
    async fn approve_and_assign(
        &self,
        approved: RoleChangeRequest,
        expected: ModerationStatus,
    ) -> AppResult<(RoleChangeRequest, user_model::Model)>;
}

pub struct SeaOrmRoleGrantRepository {
    db: DbConn,
}

impl SeaOrmRoleGrantRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    async fn write(
        txn: &DatabaseTransaction,
        mut request: RoleChangeRequest,
        expected: ModerationStatus,
    ) -> AppResult<(RoleChangeRequest, user_model::Model)> {
        let read_version = request.version;
        request.version = read_version + 1;

        let result = RequestEntity::update_many()
            .set(mark_all_set(RequestActiveModel::from(request.clone())))
            .filter(role_change_request_model::Column::Id.eq(request.id))
            .filter(role_change_request_model::Column::Status.eq(expected))
            .filter(role_change_request_model::Column::Version.eq(read_version))
            .exec(txn)
            .await?;
        if result.rows_affected == 0 {
            return Err(AppError::Conflict(format!(
                "{} {} was modified concurrently",
                RoleChangeRequest::KIND,
                request.id
            )));
        }

        let user = UserEntity::find_by_id(request.user_id)
            .one(txn)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("User with id {} not found", request.user_id))
            })?;

        let mut active: UserActiveModel = user.into();
        active.role = Set(request.requested_role);
        active.updated_at = Set(Utc::now());
        let user = active.update(txn).await?;

        Ok((request, user))
    }
}

#[async_trait]
impl RoleGrantRepository for SeaOrmRoleGrantRepository {
    async fn approve_and_assign(
        &self,
        approved: RoleChangeRequest,
        expected: ModerationStatus,
    ) -> AppResult<(RoleChangeRequest, user_model::Model)> {
        let txn = self.db.begin().await?;

        match Self::write(&txn, approved, expected).await {
            Ok(written) => {
                txn.commit().await?;
                Ok(written)
            }
            Err(e) => {
                txn.rollback().await?;
                Err(e)
            }
        }
    }
}
