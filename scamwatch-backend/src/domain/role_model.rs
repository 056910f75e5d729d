// scamwatch-backend/src/domain/role_model.rs

use super::entity_kind::EntityKind;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// ロールを表すenum
///
/// 旧実装では 1/2/3 の数値リテラルがファイルごとに異なる意味で使われていたため、
/// 数値との変換は [`Role::from_legacy_code`] の一箇所に閉じ込める。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "officer")]
    Officer,
    #[sea_orm(string_value = "user")]
    User,
}

impl Role {
    /// ロール名を文字列として取得
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Officer => "officer",
            Role::User => "user",
        }
    }

    /// 文字列からロールを解析（不明な値は最小権限の User）
    pub fn parse_or_least(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "admin" => Role::Admin,
            "officer" => Role::Officer,
            _ => Role::User,
        }
    }

    /// 旧数値コードからの変換（1=Admin, 2=Officer, 3=User、それ以外は User）
    pub fn from_legacy_code(code: i32) -> Self {
        match code {
            1 => Role::Admin,
            2 => Role::Officer,
            _ => Role::User,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn is_officer(&self) -> bool {
        matches!(self, Role::Officer)
    }

    /// 権限レベルを数値で取得（高いほど強い権限）
    pub fn permission_level(&self) -> u8 {
        match self {
            Role::Admin => 100,
            Role::Officer => 50,
            Role::User => 10,
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 認証済みのアクター
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: Uuid,
    pub role: Role,
}

impl Principal {
    pub fn new(id: Uuid, role: Role) -> Self {
        Self { id, role }
    }

    pub fn admin(id: Uuid) -> Self {
        Self::new(id, Role::Admin)
    }

    pub fn officer(id: Uuid) -> Self {
        Self::new(id, Role::Officer)
    }

    pub fn user(id: Uuid) -> Self {
        Self::new(id, Role::User)
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// プリンシパルのロールを取得（未設定なら最小権限）
pub fn role_of(principal: Option<&Principal>) -> Role {
    principal.map(|p| p.role).unwrap_or_default()
}

/// 指定ロールがその種別のレコードを作成できるか
pub fn can_create(role: Role, kind: EntityKind) -> bool {
    kind.descriptor().creator_roles.contains(&role)
}

/// 承認・却下は全種別で管理者のみ
pub fn can_moderate(role: Role, kind: EntityKind) -> bool {
    match role {
        Role::Admin => kind.descriptor().moderated,
        Role::Officer | Role::User => false,
    }
}

/// 所有者やステータスに関係なく全件を閲覧できるか
pub fn can_view_all(role: Role, kind: EntityKind) -> bool {
    match role {
        Role::Admin => true,
        Role::Officer => matches!(kind, EntityKind::Report),
        Role::User => false,
    }
}
