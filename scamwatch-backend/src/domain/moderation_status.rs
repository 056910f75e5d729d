// scamwatch-backend/src/domain/moderation_status.rs

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// モデレーション状態を表すenum
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum ModerationStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
    /// 集計にのみ現れる予約状態。この状態を生成する遷移は存在しない
    #[sea_orm(string_value = "closed")]
    Closed,
}

impl ModerationStatus {
    /// 文字列からModerationStatusに変換
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }

    /// ModerationStatusを文字列として取得
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Closed => "closed",
        }
    }

    /// すべてのステータスを取得
    pub fn all() -> Vec<Self> {
        vec![Self::Pending, Self::Approved, Self::Rejected, Self::Closed]
    }

    /// モデレーション済みか（承認または却下）
    pub fn is_moderated(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }

    /// 承認・却下による遷移が可能か
    ///
    /// 同じ状態への遷移は冪等な再実行として扱う。pending への戻しは
    /// 承認・却下ではなく所有者の再編集でのみ起こる。
    pub fn can_moderate_to(&self, new_status: Self) -> bool {
        match (self, new_status) {
            (Self::Closed, _) => false,
            (_, Self::Approved | Self::Rejected) => true,
            _ => false,
        }
    }

    /// 再編集によって pending に戻せるか
    pub fn can_reset_to_pending(&self) -> bool {
        self.is_moderated()
    }
}

impl std::fmt::Display for ModerationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
