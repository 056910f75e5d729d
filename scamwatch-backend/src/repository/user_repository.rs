// scamwatch-backend/src/repository/user_repository.rs

use crate::domain::role_model::{Principal, Role};
use crate::domain::user_model::{self, ActiveModel as UserActiveModel, Entity as UserEntity};
use crate::error::AppResult;
use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DbConn, EntityTrait, Set};
use uuid::Uuid;

/// ユーザー（プリンシパル）の永続化インターフェース
///
/// ロールの変更は申請の承認と同時に `RoleGrantRepository` が行う。
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<user_model::Model>>;

    /// 有効なユーザーのみプリンシパルとして解決する
    async fn resolve_principal(&self, id: Uuid) -> AppResult<Option<Principal>> {
        Ok(self
            .find_by_id(id)
            .await?
            .and_then(|user| user.to_principal()))
    }
}

pub struct SeaOrmUserRepository {
    db: DbConn,
}

impl SeaOrmUserRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        email: &str,
        display_name: &str,
        role: Role,
    ) -> AppResult<user_model::Model> {
        let user = UserActiveModel {
            email: Set(email.to_string()),
            display_name: Set(display_name.to_string()),
            role: Set(role),
            ..<UserActiveModel as sea_orm::ActiveModelBehavior>::new()
        };
        Ok(user.insert(&self.db).await?)
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<user_model::Model>> {
        Ok(UserEntity::find_by_id(id).one(&self.db).await?)
    }
}
