// scamwatch-backend/src/domain/entity_kind.rs

use super::role_model::Role;
use serde::{Deserialize, Serialize};

/// モデレーション対象の種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Report,
    Alert,
    Case,
    Comment,
    RoleChangeRequest,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Report => "report",
            Self::Alert => "alert",
            Self::Case => "case",
            Self::Comment => "comment",
            Self::RoleChangeRequest => "role_change_request",
        }
    }

    pub fn all() -> [Self; 5] {
        [
            Self::Report,
            Self::Alert,
            Self::Case,
            Self::Comment,
            Self::RoleChangeRequest,
        ]
    }

    /// 種別ごとのポリシー記述子
    pub fn descriptor(&self) -> &'static KindDescriptor {
        match self {
            Self::Report => &REPORT_DESCRIPTOR,
            Self::Alert => &ALERT_DESCRIPTOR,
            Self::Case => &CASE_DESCRIPTOR,
            Self::Comment => &COMMENT_DESCRIPTOR,
            Self::RoleChangeRequest => &ROLE_CHANGE_REQUEST_DESCRIPTOR,
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 一覧で誰に何が見えるかの分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    /// 公開済み（承認済みかつ有効）のレコードを共有する種別。Officerは自分のものも見える
    Shared,
    /// 捜査対象となる種別。Officerは全件、Userは自分のもののみ
    Investigative,
    /// 所有者本人のみが見える種別
    OwnerScoped,
}

/// 親レコードと一緒に削除される子レコードの種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChildKind {
    Document,
    Evidence,
}

impl ChildKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Evidence => "evidence",
        }
    }
}

/// 種別ごとのワークフロー・アクセスポリシー
#[derive(Debug, Clone)]
pub struct KindDescriptor {
    pub kind: EntityKind,
    /// 作成できるロール
    pub creator_roles: &'static [Role],
    /// 承認・却下のワークフローを持つか（false の場合は作成時点で公開）
    pub moderated: bool,
    pub auto_approve_for_admin: bool,
    /// 非管理者の所有者が承認済み・却下済みレコードを編集したとき pending に戻すか
    pub re_edit_resets_status: bool,
    /// 非管理者の所有者による承認済みレコードの編集を禁止するか
    pub forbid_edit_when_approved_for_non_admin: bool,
    /// 再申請のために却下済みレコードの編集を許可するか
    pub allow_edit_when_rejected: bool,
    /// 未認証の読み取りを許可するか
    pub public_read: bool,
    /// 所有者ごとに pending を一件までに制限するか
    pub single_pending_per_owner: bool,
    /// 承認済みレコードの再モデレーションを禁止するか（承認に副作用がある種別）
    pub approval_is_final: bool,
    pub audience: Audience,
    pub child_cascades: &'static [ChildKind],
}

impl KindDescriptor {
    pub fn has_children(&self) -> bool {
        !self.child_cascades.is_empty()
    }
}

pub static REPORT_DESCRIPTOR: KindDescriptor = KindDescriptor {
    kind: EntityKind::Report,
    creator_roles: &[Role::Admin, Role::Officer, Role::User],
    moderated: true,
    auto_approve_for_admin: true,
    // 通報はユーザーが編集してもステータスを変えない
    re_edit_resets_status: false,
    forbid_edit_when_approved_for_non_admin: false,
    allow_edit_when_rejected: true,
    public_read: false,
    single_pending_per_owner: false,
    approval_is_final: false,
    audience: Audience::Investigative,
    child_cascades: &[],
};

pub static ALERT_DESCRIPTOR: KindDescriptor = KindDescriptor {
    kind: EntityKind::Alert,
    creator_roles: &[Role::Admin, Role::Officer],
    moderated: true,
    auto_approve_for_admin: true,
    re_edit_resets_status: true,
    forbid_edit_when_approved_for_non_admin: true,
    allow_edit_when_rejected: true,
    public_read: true,
    single_pending_per_owner: false,
    approval_is_final: false,
    audience: Audience::Shared,
    child_cascades: &[],
};

pub static CASE_DESCRIPTOR: KindDescriptor = KindDescriptor {
    kind: EntityKind::Case,
    creator_roles: &[Role::Admin, Role::Officer],
    moderated: true,
    auto_approve_for_admin: true,
    re_edit_resets_status: true,
    forbid_edit_when_approved_for_non_admin: true,
    allow_edit_when_rejected: true,
    public_read: false,
    single_pending_per_owner: false,
    approval_is_final: false,
    audience: Audience::Shared,
    child_cascades: &[ChildKind::Document, ChildKind::Evidence],
};

pub static COMMENT_DESCRIPTOR: KindDescriptor = KindDescriptor {
    kind: EntityKind::Comment,
    creator_roles: &[Role::Admin, Role::Officer, Role::User],
    moderated: false,
    auto_approve_for_admin: false,
    re_edit_resets_status: false,
    forbid_edit_when_approved_for_non_admin: false,
    allow_edit_when_rejected: false,
    public_read: false,
    single_pending_per_owner: false,
    approval_is_final: false,
    audience: Audience::Shared,
    child_cascades: &[],
};

pub static ROLE_CHANGE_REQUEST_DESCRIPTOR: KindDescriptor = KindDescriptor {
    kind: EntityKind::RoleChangeRequest,
    creator_roles: &[Role::User],
    moderated: true,
    auto_approve_for_admin: false,
    re_edit_resets_status: false,
    forbid_edit_when_approved_for_non_admin: true,
    allow_edit_when_rejected: false,
    public_read: false,
    single_pending_per_owner: true,
    approval_is_final: true,
    audience: Audience::OwnerScoped,
    child_cascades: &[],
};
